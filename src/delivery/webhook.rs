use reqwest::blocking::multipart;

use super::{DeliveryError, WebhookSettings, XLSX_MIME};

/// 기록지 바이트를 멀티파트 파일 첨부로 웹훅 URL에 POST한다.
///
/// 2xx 이외의 상태 코드는 오류로 반환하고, 호출 측은 경고로 표시한
/// 뒤 사용자가 재시도할 수 있게 한다.
pub fn post_record(
    settings: &WebhookSettings,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), DeliveryError> {
    let part = multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(XLSX_MIME)?;
    let form = multipart::Form::new().part("file", part);
    let response = reqwest::blocking::Client::new()
        .post(&settings.url)
        .multipart(form)
        .send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::HttpStatus(status.as_u16()));
    }
    Ok(())
}
