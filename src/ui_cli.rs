use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::app::AppError;
use crate::config::Config;
use crate::delivery::{mail, webhook, MailSettings, WebhookSettings};
use crate::entry::{self, RawEntry, TestMetadata};
use crate::i18n::{keys, Translator};
use crate::judgement::{self, TolerancePolicy};
use crate::record;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewRecord,
    Settings,
    Delivery,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_NEW_RECORD));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_DELIVERY));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::NewRecord),
            "2" => return Ok(MenuChoice::Settings),
            "3" => return Ok(MenuChoice::Delivery),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 기록 입력 → 검증 → 판정 → 기록지 저장 → 선택적 전송.
///
/// 검증 실패와 계산 이상, 전송 실패는 경고로 표시하고 세션은 계속된다.
pub fn handle_new_record(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::ENTRY_HEADING));
    let metadata = TestMetadata {
        system_name: read_text(tr.t(keys::PROMPT_SYSTEM_NAME))?,
        target_test_pressure: read_text(tr.t(keys::PROMPT_TARGET_TEST_PRESSURE))?,
        test_range: read_text(tr.t(keys::PROMPT_TEST_RANGE))?,
        test_medium: read_text(tr.t(keys::PROMPT_TEST_MEDIUM))?,
        holding_duration: read_text(tr.t(keys::PROMPT_HOLDING_DURATION))?,
        gauge_no: read_text(tr.t(keys::PROMPT_GAUGE_NO))?,
        measurement_location: read_text(tr.t(keys::PROMPT_MEASUREMENT_LOCATION))?,
        tester: read_text(tr.t(keys::PROMPT_TESTER))?,
    };

    println!("{}", tr.t(keys::ENTRY_START_HEADING));
    let start_date = read_date(tr)?;
    let start_hour = read_text(tr.t(keys::PROMPT_HOUR))?;
    let start_minute = read_text(tr.t(keys::PROMPT_MINUTE))?;

    println!("{}", tr.t(keys::ENTRY_END_HEADING));
    let end_date = read_date(tr)?;
    let end_hour = read_text(tr.t(keys::PROMPT_HOUR))?;
    let end_minute = read_text(tr.t(keys::PROMPT_MINUTE))?;

    println!("{}", tr.t(keys::ENTRY_MEASURE_HEADING));
    let raw = RawEntry {
        metadata,
        start_date,
        start_hour,
        start_minute,
        end_date,
        end_hour,
        end_minute,
        start_pressure: read_text(tr.t(keys::PROMPT_START_PRESSURE))?,
        start_temperature: read_text(tr.t(keys::PROMPT_START_TEMPERATURE))?,
        end_pressure: read_text(tr.t(keys::PROMPT_END_PRESSURE))?,
        end_temperature: read_text(tr.t(keys::PROMPT_END_TEMPERATURE))?,
    };

    let measurement = match entry::validate(raw) {
        Ok(m) => m,
        Err(e) => {
            println!("{}: {e}", tr.t(keys::WARN_PREFIX));
            return Ok(());
        }
    };

    let judgement = judgement::judge(&measurement, cfg.tolerance_policy);
    if !judgement.is_finite() {
        println!("{}: {}", tr.t(keys::WARN_PREFIX), tr.t(keys::WARN_NOT_FINITE));
        return Ok(());
    }

    println!("{}", tr.t(keys::RESULT_HEADING));
    println!(
        "{} {} MPa",
        tr.t(keys::RESULT_CORRECTED),
        judgement::format_pressure(judgement.corrected_end_pressure_mpa)
    );
    println!(
        "{} {} MPa",
        tr.t(keys::RESULT_DELTA),
        judgement::format_pressure(judgement.delta_pressure_mpa)
    );
    println!(
        "{} {} MPa",
        tr.t(keys::RESULT_BAND),
        judgement::format_tolerance(judgement.tolerance_band_mpa)
    );
    println!("{} {}", tr.t(keys::RESULT_VERDICT), judgement.verdict_label());

    // 기록지 생성 실패는 경고로 남기고 세션은 유지한다.
    let (filename, bytes) = match build_record_file(cfg, &measurement, &judgement) {
        Ok(out) => out,
        Err(e) => {
            println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
            return Ok(());
        }
    };
    println!("{} {filename}", tr.t(keys::RECORD_SAVED));

    if let Some(settings) = &cfg.delivery.webhook {
        if ask_yes(tr.t(keys::PROMPT_SEND_WEBHOOK))? {
            send_webhook(tr, settings, &filename, bytes.clone());
        }
    }
    if let Some(settings) = &cfg.delivery.mail {
        if ask_yes(tr.t(keys::PROMPT_SEND_MAIL))? {
            send_mail(tr, settings, &judgement.summary_text(), &filename, bytes);
        }
    }
    Ok(())
}

fn build_record_file(
    cfg: &Config,
    measurement: &entry::Measurement,
    judgement: &judgement::Judgement,
) -> Result<(String, Vec<u8>), AppError> {
    let mut book = record::load_template(Path::new(&cfg.template_path))?;
    record::write_record(&mut book, measurement, judgement)?;
    let bytes = record::to_bytes(&book)?;
    let filename = record::stamped_filename(Local::now().naive_local());
    fs::write(&filename, &bytes)?;
    Ok((filename, bytes))
}

fn send_webhook(tr: &Translator, settings: &WebhookSettings, filename: &str, bytes: Vec<u8>) {
    match webhook::post_record(settings, filename, bytes) {
        Ok(()) => println!("{}", tr.t(keys::DELIVERY_WEBHOOK_OK)),
        Err(e) => println!("{} {e}", tr.t(keys::DELIVERY_FAILED)),
    }
}

fn send_mail(
    tr: &Translator,
    settings: &MailSettings,
    summary: &str,
    filename: &str,
    bytes: Vec<u8>,
) {
    match mail::send_record(settings, summary, filename, bytes) {
        Ok(()) => println!("{}", tr.t(keys::DELIVERY_MAIL_OK)),
        Err(e) => println!("{} {e}", tr.t(keys::DELIVERY_FAILED)),
    }
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {:?}",
        tr.t(keys::SETTINGS_CURRENT_POLICY),
        cfg.tolerance_policy
    );
    println!("{}", tr.t(keys::SETTINGS_POLICY_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if !sel.trim().is_empty() {
        cfg.tolerance_policy = match sel.trim() {
            "1" => TolerancePolicy::Relative,
            "2" => TolerancePolicy::Absolute,
            _ => {
                println!("{}", tr.t(keys::SETTINGS_INVALID));
                cfg.tolerance_policy
            }
        };
        println!(
            "{} {:?}",
            tr.t(keys::SETTINGS_SAVED),
            cfg.tolerance_policy
        );
    }

    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE), cfg.language);
    println!("{}", tr.t(keys::SETTINGS_LANGUAGE_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if !sel.trim().is_empty() {
        match sel.trim() {
            "1" => cfg.language = "ja".to_string(),
            "2" => cfg.language = "en".to_string(),
            _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
        }
        println!("{} {}", tr.t(keys::SETTINGS_SAVED), cfg.language);
    }
    Ok(())
}

/// 송신(웹훅/메일) 설정 메뉴를 처리한다.
pub fn handle_delivery_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::DELIVERY_HEADING));
    println!("{}", tr.t(keys::DELIVERY_OPTIONS));
    let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
    match sel.trim() {
        "1" => {
            let url = read_text(tr.t(keys::PROMPT_WEBHOOK_URL))?;
            cfg.delivery.webhook = Some(WebhookSettings { url });
            println!("{}", tr.t(keys::DELIVERY_SAVED));
        }
        "2" => {
            cfg.clear_webhook();
            println!("{}", tr.t(keys::DELIVERY_CLEARED));
        }
        "3" => {
            cfg.delivery.mail = Some(MailSettings {
                smtp_server: read_text(tr.t(keys::PROMPT_SMTP_SERVER))?,
                username: read_text(tr.t(keys::PROMPT_SMTP_USER))?,
                password: read_text(tr.t(keys::PROMPT_SMTP_PASSWORD))?,
                from: read_text(tr.t(keys::PROMPT_MAIL_FROM))?,
                to: read_text(tr.t(keys::PROMPT_MAIL_TO))?,
            });
            println!("{}", tr.t(keys::DELIVERY_SAVED));
        }
        "4" => {
            cfg.clear_mail();
            println!("{}", tr.t(keys::DELIVERY_CLEARED));
        }
        _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
    }
    Ok(())
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}

fn read_text(prompt: &str) -> Result<String, AppError> {
    Ok(read_line(prompt)?.trim().to_string())
}

fn ask_yes(prompt: &str) -> Result<bool, AppError> {
    let answer = read_line(prompt)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

fn read_date(tr: &Translator) -> Result<NaiveDate, AppError> {
    loop {
        let s = read_line(tr.t(keys::PROMPT_DATE))?;
        let trimmed = s.trim();
        let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"));
        match parsed {
            Ok(date) => return Ok(date),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_DATE)),
        }
    }
}
