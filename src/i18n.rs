use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const WARN_PREFIX: &str = "general.warn_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_NEW_RECORD: &str = "main_menu.new_record";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_DELIVERY: &str = "main_menu.delivery";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const ENTRY_HEADING: &str = "entry.heading";
    pub const PROMPT_SYSTEM_NAME: &str = "entry.system_name";
    pub const PROMPT_TARGET_TEST_PRESSURE: &str = "entry.target_test_pressure";
    pub const PROMPT_TEST_RANGE: &str = "entry.test_range";
    pub const PROMPT_TEST_MEDIUM: &str = "entry.test_medium";
    pub const PROMPT_HOLDING_DURATION: &str = "entry.holding_duration";
    pub const PROMPT_GAUGE_NO: &str = "entry.gauge_no";
    pub const PROMPT_MEASUREMENT_LOCATION: &str = "entry.measurement_location";
    pub const PROMPT_TESTER: &str = "entry.tester";
    pub const ENTRY_START_HEADING: &str = "entry.start_heading";
    pub const ENTRY_END_HEADING: &str = "entry.end_heading";
    pub const PROMPT_DATE: &str = "entry.date";
    pub const PROMPT_HOUR: &str = "entry.hour";
    pub const PROMPT_MINUTE: &str = "entry.minute";
    pub const ENTRY_MEASURE_HEADING: &str = "entry.measure_heading";
    pub const PROMPT_START_PRESSURE: &str = "entry.start_pressure";
    pub const PROMPT_START_TEMPERATURE: &str = "entry.start_temperature";
    pub const PROMPT_END_PRESSURE: &str = "entry.end_pressure";
    pub const PROMPT_END_TEMPERATURE: &str = "entry.end_temperature";
    pub const ERROR_INVALID_DATE: &str = "error.invalid_date";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_CORRECTED: &str = "result.corrected";
    pub const RESULT_DELTA: &str = "result.delta";
    pub const RESULT_BAND: &str = "result.band";
    pub const RESULT_VERDICT: &str = "result.verdict";
    pub const WARN_NOT_FINITE: &str = "result.not_finite";

    pub const RECORD_SAVED: &str = "record.saved";
    pub const PROMPT_SEND_WEBHOOK: &str = "record.send_webhook";
    pub const PROMPT_SEND_MAIL: &str = "record.send_mail";
    pub const DELIVERY_WEBHOOK_OK: &str = "record.webhook_ok";
    pub const DELIVERY_MAIL_OK: &str = "record.mail_ok";
    pub const DELIVERY_FAILED: &str = "record.delivery_failed";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_POLICY: &str = "settings.current_policy";
    pub const SETTINGS_POLICY_OPTIONS: &str = "settings.policy_options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_LANGUAGE_OPTIONS: &str = "settings.language_options";

    pub const DELIVERY_HEADING: &str = "delivery.heading";
    pub const DELIVERY_OPTIONS: &str = "delivery.options";
    pub const PROMPT_WEBHOOK_URL: &str = "delivery.webhook_url";
    pub const PROMPT_SMTP_SERVER: &str = "delivery.smtp_server";
    pub const PROMPT_SMTP_USER: &str = "delivery.smtp_user";
    pub const PROMPT_SMTP_PASSWORD: &str = "delivery.smtp_password";
    pub const PROMPT_MAIL_FROM: &str = "delivery.mail_from";
    pub const PROMPT_MAIL_TO: &str = "delivery.mail_to";
    pub const DELIVERY_CLEARED: &str = "delivery.cleared";
    pub const DELIVERY_SAVED: &str = "delivery.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ja,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ja
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ja/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ja로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 영어 번역이 없으면 일본어 문자열로 폴백한다.
    pub fn t(&self, key: &str) -> &'static str {
        if let Some(ref map) = self.overrides {
            if let Some(v) = map.get(key) {
                return Box::leak(v.clone().into_boxed_str());
            }
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ja(key)),
            Language::Ja => ja(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "ja".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ja" => Some("ja".into()),
        "ja-jp" => Some("ja-jp".into()),
        "en" => Some("en".into()),
        "en-us" => Some("en-us".into()),
        "en-uk" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ja") => Some("ja".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ja" => Some("ja".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    if let Ok(lang) = std::env::var("LANG") {
        if let Some(code) = normalize_locale_string(&lang) {
            return Some(code);
        }
    }
    if let Ok(lang) = std::env::var("LC_ALL") {
        if let Some(code) = normalize_locale_string(&lang) {
            return Some(code);
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., ja-jp)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., ja)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "ja-jp" | "ja" => parse_toml_to_map(include_str!("../locales/ja-jp.toml")),
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        _ => None,
    }
}

fn ja(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "エラー",
        WARN_PREFIX => "警告",
        APP_EXIT => "アプリを終了します。",
        MAIN_MENU_TITLE => "\n=== 気密試験記録 ===",
        MAIN_MENU_NEW_RECORD => "1) 記録入力・判定",
        MAIN_MENU_SETTINGS => "2) 設定",
        MAIN_MENU_DELIVERY => "3) 送信設定",
        MAIN_MENU_EXIT => "0) 終了",
        PROMPT_MENU_SELECT => "メニュー選択: ",
        INVALID_SELECTION_RETRY => "入力が正しくありません。もう一度選択してください。",
        ENTRY_HEADING => "\n-- 記録入力 --",
        PROMPT_SYSTEM_NAME => "系統名: ",
        PROMPT_TARGET_TEST_PRESSURE => "試験圧力 (MPa): ",
        PROMPT_TEST_RANGE => "試験範囲: ",
        PROMPT_TEST_MEDIUM => "試験媒体: ",
        PROMPT_HOLDING_DURATION => "放置時間 (h): ",
        PROMPT_GAUGE_NO => "使用圧力計機器No.: ",
        PROMPT_MEASUREMENT_LOCATION => "測定場所: ",
        PROMPT_TESTER => "試験実施者: ",
        ENTRY_START_HEADING => "-- 開始日時 --",
        ENTRY_END_HEADING => "-- 終了日時 --",
        PROMPT_DATE => "日付 (YYYY-MM-DD): ",
        PROMPT_HOUR => "時 (0-23): ",
        PROMPT_MINUTE => "分 (0-59): ",
        ENTRY_MEASURE_HEADING => "-- 測定値入力 --",
        PROMPT_START_PRESSURE => "開始圧力 (MPa) 例 0.0799: ",
        PROMPT_START_TEMPERATURE => "開始温度 (℃) 例 27.2: ",
        PROMPT_END_PRESSURE => "終了圧力 (MPa) 例 0.0815: ",
        PROMPT_END_TEMPERATURE => "終了温度 (℃) 例 29.8: ",
        ERROR_INVALID_DATE => "日付の形式が正しくありません。",
        RESULT_HEADING => "\n-- 計算結果（ボイル・シャルルの法則に基づく補正）--",
        RESULT_CORRECTED => "補正後終了圧力 P2_corr:",
        RESULT_DELTA => "圧力変化量 ΔP:",
        RESULT_BAND => "判定範囲:",
        RESULT_VERDICT => "判定結果:",
        WARN_NOT_FINITE => "計算結果が数値になりません。終了温度を確認してください。",
        RECORD_SAVED => "記録を保存しました:",
        PROMPT_SEND_WEBHOOK => "Webhookで送信しますか? (y/N): ",
        PROMPT_SEND_MAIL => "メールで送信しますか? (y/N): ",
        DELIVERY_WEBHOOK_OK => "Webhook送信が完了しました。",
        DELIVERY_MAIL_OK => "メール送信が完了しました。",
        DELIVERY_FAILED => "送信に失敗しました(記録ファイルは保存済み):",
        SETTINGS_HEADING => "\n-- 設定 --",
        SETTINGS_CURRENT_POLICY => "現在の判定範囲ポリシー:",
        SETTINGS_POLICY_OPTIONS => "1) 開始圧力の±1%  2) 固定±0.001 MPa",
        SETTINGS_PROMPT_CHANGE => "変更する番号(キャンセルはEnter): ",
        SETTINGS_INVALID => "入力が正しくないため変更しません。",
        SETTINGS_SAVED => "設定を変更しました:",
        SETTINGS_CURRENT_LANGUAGE => "現在の言語:",
        SETTINGS_LANGUAGE_OPTIONS => "1) 日本語  2) English",
        DELIVERY_HEADING => "\n-- 送信設定 --",
        DELIVERY_OPTIONS => "1) Webhook設定  2) Webhook解除  3) メール設定  4) メール解除",
        PROMPT_WEBHOOK_URL => "Webhook URL: ",
        PROMPT_SMTP_SERVER => "SMTPサーバー: ",
        PROMPT_SMTP_USER => "SMTPユーザー名: ",
        PROMPT_SMTP_PASSWORD => "SMTPパスワード: ",
        PROMPT_MAIL_FROM => "送信元アドレス: ",
        PROMPT_MAIL_TO => "送信先アドレス: ",
        DELIVERY_CLEARED => "送信設定を解除しました。",
        DELIVERY_SAVED => "送信設定を保存しました。",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        WARN_PREFIX => "Warning",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Airtightness Test Record ===",
        MAIN_MENU_NEW_RECORD => "1) Enter & judge a record",
        MAIN_MENU_SETTINGS => "2) Settings",
        MAIN_MENU_DELIVERY => "3) Delivery settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ENTRY_HEADING => "\n-- Record Entry --",
        PROMPT_SYSTEM_NAME => "System name: ",
        PROMPT_TARGET_TEST_PRESSURE => "Test pressure (MPa): ",
        PROMPT_TEST_RANGE => "Test range: ",
        PROMPT_TEST_MEDIUM => "Test medium: ",
        PROMPT_HOLDING_DURATION => "Holding duration (h): ",
        PROMPT_GAUGE_NO => "Pressure gauge No.: ",
        PROMPT_MEASUREMENT_LOCATION => "Measurement location: ",
        PROMPT_TESTER => "Tester: ",
        ENTRY_START_HEADING => "-- Start date/time --",
        ENTRY_END_HEADING => "-- End date/time --",
        PROMPT_DATE => "Date (YYYY-MM-DD): ",
        PROMPT_HOUR => "Hour (0-23): ",
        PROMPT_MINUTE => "Minute (0-59): ",
        ENTRY_MEASURE_HEADING => "-- Measurements --",
        PROMPT_START_PRESSURE => "Start pressure (MPa) e.g. 0.0799: ",
        PROMPT_START_TEMPERATURE => "Start temperature (C) e.g. 27.2: ",
        PROMPT_END_PRESSURE => "End pressure (MPa) e.g. 0.0815: ",
        PROMPT_END_TEMPERATURE => "End temperature (C) e.g. 29.8: ",
        ERROR_INVALID_DATE => "Invalid date format.",
        RESULT_HEADING => "\n-- Result (Boyle-Charles temperature compensation) --",
        RESULT_CORRECTED => "Corrected end pressure P2_corr:",
        RESULT_DELTA => "Pressure change ΔP:",
        RESULT_BAND => "Tolerance band:",
        RESULT_VERDICT => "Verdict:",
        WARN_NOT_FINITE => "Calculation did not yield a number. Check the end temperature.",
        RECORD_SAVED => "Record saved:",
        PROMPT_SEND_WEBHOOK => "Send via webhook? (y/N): ",
        PROMPT_SEND_MAIL => "Send via mail? (y/N): ",
        DELIVERY_WEBHOOK_OK => "Webhook delivery finished.",
        DELIVERY_MAIL_OK => "Mail delivery finished.",
        DELIVERY_FAILED => "Delivery failed (record file already saved):",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_POLICY => "Current tolerance policy:",
        SETTINGS_POLICY_OPTIONS => "1) ±1% of start pressure  2) fixed ±0.001 MPa",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; nothing changed.",
        SETTINGS_SAVED => "Settings changed:",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_LANGUAGE_OPTIONS => "1) 日本語  2) English",
        DELIVERY_HEADING => "\n-- Delivery Settings --",
        DELIVERY_OPTIONS => "1) Set webhook  2) Clear webhook  3) Set mail  4) Clear mail",
        PROMPT_WEBHOOK_URL => "Webhook URL: ",
        PROMPT_SMTP_SERVER => "SMTP server: ",
        PROMPT_SMTP_USER => "SMTP username: ",
        PROMPT_SMTP_PASSWORD => "SMTP password: ",
        PROMPT_MAIL_FROM => "From address: ",
        PROMPT_MAIL_TO => "To address: ",
        DELIVERY_CLEARED => "Delivery settings cleared.",
        DELIVERY_SAVED => "Delivery settings saved.",
        _ => return None,
    })
}
