//! 완성된 기록지를 외부로 전달하는 협력자 모음.
//!
//! 핵심 계산은 이 모듈의 상태를 읽지 않는다. 설정 객체는 호출 시점에
//! 명시적으로 전달되고, 실패는 경고로 처리되어 이미 생성된 기록지를
//! 무효화하지 않는다.

pub mod mail;
pub mod webhook;

use serde::{Deserialize, Serialize};

/// xlsx 첨부의 MIME 타입.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 웹훅 전송 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub url: String,
}

/// SMTP 메일 전송 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    pub smtp_server: String,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// 전달 실패를 표현한다. 네트워크/인증 오류는 모두 복구 가능한
/// 경고로 취급한다.
#[derive(Debug)]
pub enum DeliveryError {
    /// HTTP 요청 오류
    Http(reqwest::Error),
    /// 성공이 아닌 HTTP 상태 코드
    HttpStatus(u16),
    /// 메일 주소 해석 오류
    Address(lettre::address::AddressError),
    /// 메일 본문 구성 오류
    Mail(lettre::error::Error),
    /// 첨부 Content-Type 오류
    ContentType(lettre::message::header::ContentTypeErr),
    /// SMTP 세션 오류
    Smtp(lettre::transport::smtp::Error),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Http(e) => write!(f, "HTTP 요청 오류: {e}"),
            DeliveryError::HttpStatus(code) => write!(f, "HTTP 상태 코드 {code}"),
            DeliveryError::Address(e) => write!(f, "메일 주소 오류: {e}"),
            DeliveryError::Mail(e) => write!(f, "메일 구성 오류: {e}"),
            DeliveryError::ContentType(e) => write!(f, "첨부 형식 오류: {e}"),
            DeliveryError::Smtp(e) => write!(f, "SMTP 오류: {e}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

impl From<reqwest::Error> for DeliveryError {
    fn from(value: reqwest::Error) -> Self {
        DeliveryError::Http(value)
    }
}

impl From<lettre::address::AddressError> for DeliveryError {
    fn from(value: lettre::address::AddressError) -> Self {
        DeliveryError::Address(value)
    }
}

impl From<lettre::error::Error> for DeliveryError {
    fn from(value: lettre::error::Error) -> Self {
        DeliveryError::Mail(value)
    }
}

impl From<lettre::message::header::ContentTypeErr> for DeliveryError {
    fn from(value: lettre::message::header::ContentTypeErr) -> Self {
        DeliveryError::ContentType(value)
    }
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(value: lettre::transport::smtp::Error) -> Self {
        DeliveryError::Smtp(value)
    }
}
