//! 입력 검증 테스트. 측정값 누락과 시각 범위 위반을 구분해서 보고해야 한다.
use chrono::NaiveDate;

use airtight_test_recorder::entry::{
    safe_f64, validate, ClockField, EntryError, MeasurementField, RawEntry, TestMetadata,
};

fn raw_entry() -> RawEntry {
    RawEntry {
        metadata: TestMetadata {
            system_name: "冷却水系統".to_string(),
            target_test_pressure: "0.08".to_string(),
            test_range: "バルブA〜B".to_string(),
            test_medium: "窒素".to_string(),
            holding_duration: "1".to_string(),
            gauge_no: "PG-102".to_string(),
            measurement_location: "第2プラント".to_string(),
            tester: "山田".to_string(),
        },
        start_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
        start_hour: "9".to_string(),
        start_minute: "0".to_string(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
        end_hour: "10".to_string(),
        end_minute: "30".to_string(),
        start_pressure: "0.0799".to_string(),
        start_temperature: "27.2".to_string(),
        end_pressure: "0.0815".to_string(),
        end_temperature: "29.8".to_string(),
    }
}

#[test]
fn valid_entry_produces_measurement() {
    let m = validate(raw_entry()).expect("entry should validate");
    assert_eq!(m.start_pressure_mpa, 0.0799);
    assert_eq!(m.end_temperature_c, 29.8);
    assert_eq!(m.started_at.format("%Y/%m/%d %H:%M").to_string(), "2024/01/10 09:00");
    assert_eq!(m.ended_at.format("%Y/%m/%d %H:%M").to_string(), "2024/01/10 10:30");
    assert_eq!(m.metadata.tester, "山田");
}

#[test]
fn safe_f64_collapses_empty_and_malformed() {
    assert_eq!(safe_f64("0.0799"), Some(0.0799));
    assert_eq!(safe_f64("  27.2 "), Some(27.2));
    assert_eq!(safe_f64("-3.5"), Some(-3.5));
    assert_eq!(safe_f64(""), None);
    assert_eq!(safe_f64("   "), None);
    assert_eq!(safe_f64("abc"), None);
    assert_eq!(safe_f64("0,08"), None);
}

#[test]
fn missing_single_field_is_reported() {
    let mut raw = raw_entry();
    raw.end_pressure = String::new();
    match validate(raw) {
        Err(EntryError::MissingMeasurement { fields }) => {
            assert_eq!(fields, vec![MeasurementField::EndPressure]);
        }
        other => panic!("expected MissingMeasurement, got {other:?}"),
    }
}

#[test]
fn malformed_numeric_counts_as_missing() {
    let mut raw = raw_entry();
    raw.start_temperature = "27,2".to_string();
    match validate(raw) {
        Err(EntryError::MissingMeasurement { fields }) => {
            assert_eq!(fields, vec![MeasurementField::StartTemperature]);
        }
        other => panic!("expected MissingMeasurement, got {other:?}"),
    }
}

#[test]
fn all_missing_fields_are_listed_together() {
    let mut raw = raw_entry();
    raw.start_pressure = String::new();
    raw.end_temperature = "n/a".to_string();
    match validate(raw) {
        Err(EntryError::MissingMeasurement { fields }) => {
            assert_eq!(
                fields,
                vec![MeasurementField::StartPressure, MeasurementField::EndTemperature]
            );
        }
        other => panic!("expected MissingMeasurement, got {other:?}"),
    }
}

#[test]
fn hour_out_of_range_is_malformed_time() {
    let mut raw = raw_entry();
    raw.start_hour = "25".to_string();
    match validate(raw) {
        Err(EntryError::MalformedTime { field, value }) => {
            assert_eq!(field, ClockField::StartHour);
            assert_eq!(value, "25");
        }
        other => panic!("expected MalformedTime, got {other:?}"),
    }
}

#[test]
fn negative_minute_is_malformed_time() {
    let mut raw = raw_entry();
    raw.end_minute = "-1".to_string();
    match validate(raw) {
        Err(EntryError::MalformedTime { field, .. }) => {
            assert_eq!(field, ClockField::EndMinute);
        }
        other => panic!("expected MalformedTime, got {other:?}"),
    }
}

#[test]
fn non_numeric_hour_is_malformed_time() {
    let mut raw = raw_entry();
    raw.end_hour = "아침".to_string();
    assert!(matches!(
        validate(raw),
        Err(EntryError::MalformedTime { field: ClockField::EndHour, .. })
    ));
}

#[test]
fn malformed_time_wins_over_missing_measurement() {
    // 시각 오류는 측정값 누락 검사보다 먼저, 독립적으로 보고된다.
    let mut raw = raw_entry();
    raw.start_hour = "24".to_string();
    raw.start_pressure = String::new();
    assert!(matches!(
        validate(raw),
        Err(EntryError::MalformedTime { field: ClockField::StartHour, .. })
    ));
}

#[test]
fn boundary_clock_values_are_accepted() {
    let mut raw = raw_entry();
    raw.start_hour = "0".to_string();
    raw.start_minute = "0".to_string();
    raw.end_hour = "23".to_string();
    raw.end_minute = "59".to_string();
    let m = validate(raw).expect("boundary clock values are valid");
    assert_eq!(m.ended_at.format("%H:%M").to_string(), "23:59");
}
