use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::delivery::{MailSettings, WebhookSettings};
use crate::judgement::TolerancePolicy;

/// 전달 협력자 설정. 미설정(None)이면 해당 전달 수단을 쓰지 않는다.
///
/// 세션 상태에 숨어 있던 자격 증명 캐시를 명시적 설정 객체로 바꾼
/// 형태다. 저장/해제는 설정 메뉴에서만 일어나고 핵심 계산은 이
/// 값을 읽지 않는다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub webhook: Option<WebhookSettings>,
    pub mail: Option<MailSettings>,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// UI 언어 코드 (ja/en)
    pub language: String,
    /// 합부 판정 범위 정책
    pub tolerance_policy: TolerancePolicy,
    /// 기록지 템플릿 경로. 없으면 빈 워크북으로 대체한다.
    pub template_path: String,
    pub delivery: DeliverySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "ja".to_string(),
            tolerance_policy: TolerancePolicy::default(),
            template_path: "気密試験記録.xlsx".to_string(),
            delivery: DeliverySettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    let path = Path::new("config.toml");
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write("config.toml", content)?;
    Ok(())
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(self)
    }

    /// 저장된 웹훅 설정을 해제한다.
    pub fn clear_webhook(&mut self) {
        self.delivery.webhook = None;
    }

    /// 저장된 메일 설정을 해제한다.
    pub fn clear_mail(&mut self) {
        self.delivery.mail = None;
    }
}
