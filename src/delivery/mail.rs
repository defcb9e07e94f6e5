use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{DeliveryError, MailSettings, XLSX_MIME};

/// 판정 요약 본문과 기록지 첨부를 인증된 SMTP 릴레이로 보낸다.
pub fn send_record(
    settings: &MailSettings,
    summary: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), DeliveryError> {
    let from: Mailbox = settings.from.parse()?;
    let to: Mailbox = settings.to.parse()?;
    let content_type = ContentType::parse(XLSX_MIME)?;
    let attachment = Attachment::new(filename.to_string()).body(bytes, content_type);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject("気密試験記録")
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(summary.to_string()))
                .singlepart(attachment),
        )?;

    let credentials = Credentials::new(settings.username.clone(), settings.password.clone());
    let mailer = SmtpTransport::relay(&settings.smtp_server)?
        .credentials(credentials)
        .build();
    mailer.send(&message)?;
    Ok(())
}
