//! 기록지 작성/재독 회귀 테스트. 기록에 쓴 표기 문자열이 그대로
//! 읽혀야 하고, 결합 셀 영역에서는 앵커 셀에 기록되어야 한다.
use chrono::NaiveDate;

use airtight_test_recorder::entry::{Measurement, TestMetadata};
use airtight_test_recorder::judgement::{judge, TolerancePolicy};
use airtight_test_recorder::record::{
    self, blank_book, cells, read_anchored, stamped_filename, write_anchored, write_record,
    CellRef, SHEET_NAME,
};

fn sample_measurement() -> Measurement {
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date");
    Measurement {
        start_pressure_mpa: 0.0799,
        start_temperature_c: 27.2,
        end_pressure_mpa: 0.0815,
        end_temperature_c: 29.8,
        started_at: date.and_hms_opt(9, 0, 0).expect("valid time"),
        ended_at: date.and_hms_opt(10, 30, 0).expect("valid time"),
        metadata: TestMetadata {
            system_name: "冷却水系統".to_string(),
            target_test_pressure: "0.08".to_string(),
            test_range: "バルブA〜B".to_string(),
            test_medium: "窒素".to_string(),
            holding_duration: "1.5".to_string(),
            gauge_no: "PG-102".to_string(),
            measurement_location: "第2プラント".to_string(),
            tester: "山田".to_string(),
        },
    }
}

#[test]
fn cell_ref_parsing() {
    assert_eq!(CellRef::parse("A1").expect("A1"), CellRef { col: 1, row: 1 });
    assert_eq!(CellRef::parse("D3").expect("D3"), CellRef { col: 4, row: 3 });
    assert_eq!(CellRef::parse("O10").expect("O10"), CellRef { col: 15, row: 10 });
    assert_eq!(CellRef::parse("AA10").expect("AA10"), CellRef { col: 27, row: 10 });
    assert!(CellRef::parse("10").is_err());
    assert!(CellRef::parse("D").is_err());
    assert!(CellRef::parse("D0").is_err());
    assert!(CellRef::parse("").is_err());
}

#[test]
fn write_then_read_back_roundtrip() {
    let m = sample_measurement();
    let j = judge(&m, TolerancePolicy::Relative);
    let mut book = blank_book().expect("blank book");
    write_record(&mut book, &m, &j).expect("write record");

    let sheet = book.get_sheet_by_name(SHEET_NAME).expect("record sheet");
    let read = |cell| read_anchored(sheet, cell).expect("readable cell");

    assert_eq!(read(cells::SYSTEM_NAME), "冷却水系統");
    assert_eq!(read(cells::TARGET_TEST_PRESSURE), "0.08");
    assert_eq!(read(cells::TEST_RANGE), "バルブA〜B");
    assert_eq!(read(cells::TEST_MEDIUM), "窒素");
    assert_eq!(read(cells::HOLDING_DURATION), "1.5");
    assert_eq!(read(cells::GAUGE_NO), "PG-102");
    assert_eq!(read(cells::MEASUREMENT_LOCATION), "第2プラント");
    assert_eq!(read(cells::STARTED_AT), "2024/01/10 09:00");
    assert_eq!(read(cells::ENDED_AT), "2024/01/10 10:30");
    assert_eq!(read(cells::START_PRESSURE), "0.0799");
    assert_eq!(read(cells::START_TEMPERATURE), "27.2");
    assert_eq!(read(cells::END_PRESSURE), "0.0815");
    assert_eq!(read(cells::END_TEMPERATURE), "29.8");
    assert_eq!(read(cells::CORRECTED_END_PRESSURE), "0.0808");
    assert_eq!(read(cells::DELTA_PRESSURE), "0.0009");
    assert_eq!(read(cells::TOLERANCE_BAND), "±0.0008");
    assert_eq!(read(cells::VERDICT), "不合格");
    assert_eq!(read(cells::TESTER), "山田");
}

#[test]
fn layout_cells_start_empty() {
    let book = blank_book().expect("blank book");
    let sheet = book.get_sheet_by_name(SHEET_NAME).expect("record sheet");
    for cell in [
        cells::SYSTEM_NAME,
        cells::STARTED_AT,
        cells::START_PRESSURE,
        cells::VERDICT,
        cells::TESTER,
    ] {
        assert_eq!(read_anchored(sheet, cell).expect("readable cell"), "");
    }
}

#[test]
fn merged_region_writes_land_on_anchor() {
    let mut book = blank_book().expect("blank book");
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .expect("record sheet");
    sheet.add_merge_cells("J10:K11");

    // 결합 영역 내부를 지정해도 좌상단 앵커에 기록된다.
    write_anchored(sheet, "K11", "0.0808").expect("anchored write");
    assert_eq!(read_anchored(sheet, "J10").expect("anchor"), "0.0808");
    assert_eq!(read_anchored(sheet, "K11").expect("inside region"), "0.0808");

    // 결합 영역 밖은 영향 없음
    assert_eq!(read_anchored(sheet, "L10").expect("outside"), "");
}

#[test]
fn verdict_cell_reflects_policy() {
    let m = sample_measurement();
    let j = judge(&m, TolerancePolicy::Absolute);
    let mut book = blank_book().expect("blank book");
    write_record(&mut book, &m, &j).expect("write record");
    let sheet = book.get_sheet_by_name(SHEET_NAME).expect("record sheet");
    assert_eq!(
        read_anchored(sheet, cells::TOLERANCE_BAND).expect("band"),
        "±0.0010"
    );
    assert_eq!(read_anchored(sheet, cells::VERDICT).expect("verdict"), "合格");
}

#[test]
fn to_bytes_produces_xlsx_archive() {
    let m = sample_measurement();
    let j = judge(&m, TolerancePolicy::Relative);
    let mut book = blank_book().expect("blank book");
    write_record(&mut book, &m, &j).expect("write record");
    let bytes = record::to_bytes(&book).expect("serialize");
    // xlsx는 zip 컨테이너다
    assert!(bytes.len() > 4);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn stamped_filename_embeds_timestamp() {
    let at = NaiveDate::from_ymd_opt(2024, 1, 10)
        .expect("valid date")
        .and_hms_opt(13, 5, 7)
        .expect("valid time");
    assert_eq!(stamped_filename(at), "気密試験記録_20240110_130507.xlsx");
}
