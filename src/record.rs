use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDateTime;
use umya_spreadsheet::{Spreadsheet, Worksheet, XlsxError};

use crate::entry::Measurement;
use crate::judgement::{self, Judgement};

/// 기록지 시트명. 템플릿과 신규 생성 모두 이 이름을 쓴다.
pub const SHEET_NAME: &str = "気密試験記録";

/// 기록지 고정 레이아웃의 셀 주소 모음.
pub mod cells {
    pub const SYSTEM_NAME: &str = "D3";
    pub const TARGET_TEST_PRESSURE: &str = "D4";
    pub const TEST_RANGE: &str = "M4";
    pub const TEST_MEDIUM: &str = "D5";
    pub const HOLDING_DURATION: &str = "M5";
    pub const GAUGE_NO: &str = "D6";
    pub const MEASUREMENT_LOCATION: &str = "M6";
    pub const STARTED_AT: &str = "D8";
    pub const ENDED_AT: &str = "M8";
    pub const START_PRESSURE: &str = "A10";
    pub const START_TEMPERATURE: &str = "C10";
    pub const END_PRESSURE: &str = "E10";
    pub const END_TEMPERATURE: &str = "G10";
    pub const CORRECTED_END_PRESSURE: &str = "J10";
    pub const DELTA_PRESSURE: &str = "M10";
    pub const TOLERANCE_BAND: &str = "O10";
    pub const VERDICT: &str = "M11";
    pub const TESTER: &str = "E11";
}

/// 기록지 작성 중 발생 가능한 오류.
#[derive(Debug)]
pub enum RecordError {
    /// xlsx 입출력 오류
    Xlsx(XlsxError),
    /// 기록지 시트를 찾을 수 없음
    SheetMissing(String),
    /// 셀 주소 해석 실패
    BadCellRef(String),
    /// 시트 생성 실패
    Sheet(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Xlsx(e) => write!(f, "xlsx 입출력 오류: {e:?}"),
            RecordError::SheetMissing(name) => write!(f, "시트를 찾을 수 없음: {name}"),
            RecordError::BadCellRef(cell) => write!(f, "셀 주소 해석 실패: {cell}"),
            RecordError::Sheet(msg) => write!(f, "시트 생성 실패: {msg}"),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<XlsxError> for RecordError {
    fn from(value: XlsxError) -> Self {
        RecordError::Xlsx(value)
    }
}

/// 1기준(A=1) 열/행 셀 좌표.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    /// "D3" 형태의 셀 주소를 해석한다.
    pub fn parse(text: &str) -> Result<CellRef, RecordError> {
        let bad = || RecordError::BadCellRef(text.to_string());
        let split = text.find(|c: char| c.is_ascii_digit()).ok_or_else(bad)?;
        let (letters, digits) = text.split_at(split);
        if letters.is_empty() || digits.is_empty() {
            return Err(bad());
        }
        let mut col: u32 = 0;
        for ch in letters.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(bad());
            }
            col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }
        let row: u32 = digits.parse().map_err(|_| bad())?;
        if row == 0 {
            return Err(bad());
        }
        Ok(CellRef { col, row })
    }

    fn within(&self, start: CellRef, end: CellRef) -> bool {
        self.col >= start.col && self.col <= end.col && self.row >= start.row && self.row <= end.row
    }
}

fn parse_range(range: &str) -> Option<(CellRef, CellRef)> {
    match range.split_once(':') {
        Some((a, b)) => Some((CellRef::parse(a).ok()?, CellRef::parse(b).ok()?)),
        None => {
            let single = CellRef::parse(range).ok()?;
            Some((single, single))
        }
    }
}

/// 대상 셀이 결합 영역 안이면 영역의 좌상단(앵커) 셀로 정규화한다.
fn anchor_of(sheet: &Worksheet, cell: CellRef) -> CellRef {
    for merged in sheet.get_merge_cells() {
        if let Some((start, end)) = parse_range(&merged.get_range()) {
            if cell.within(start, end) {
                return start;
            }
        }
    }
    cell
}

/// 단일 셀과 결합 영역을 구분하지 않는 균일한 쓰기 연산.
/// 항상 앵커 셀에 기록하므로 결합 영역에서도 실패하지 않는다.
pub fn write_anchored(sheet: &mut Worksheet, cell: &str, value: &str) -> Result<(), RecordError> {
    let target = anchor_of(sheet, CellRef::parse(cell)?);
    sheet
        .get_cell_mut((target.col, target.row))
        .set_value(value);
    Ok(())
}

/// 앵커 정규화를 거쳐 셀 값을 읽는다. 검증/테스트용.
pub fn read_anchored(sheet: &Worksheet, cell: &str) -> Result<String, RecordError> {
    let target = anchor_of(sheet, CellRef::parse(cell)?);
    Ok(sheet.get_value((target.col, target.row)))
}

/// 기록지에 쓰는 일시 표기.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y/%m/%d %H:%M").to_string()
}

/// 다운로드/저장 파일명. 생성 시각을 붙인다.
pub fn stamped_filename(now: NaiveDateTime) -> String {
    format!("気密試験記録_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

/// 템플릿을 읽거나, 없으면 기록지 시트만 있는 새 워크북을 만든다.
pub fn load_template(path: &Path) -> Result<Spreadsheet, RecordError> {
    if path.exists() {
        Ok(umya_spreadsheet::reader::xlsx::read(path)?)
    } else {
        blank_book()
    }
}

/// 기록지 시트 하나를 가진 빈 워크북.
pub fn blank_book() -> Result<Spreadsheet, RecordError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    book.new_sheet(SHEET_NAME)
        .map_err(|e| RecordError::Sheet(e.to_string()))?;
    Ok(book)
}

/// 검증 완료된 측정과 판정 결과를 고정 레이아웃에 기록한다.
///
/// 검증 실패 시 이 함수가 호출되지 않으므로 부분 기록은 생기지 않는다.
pub fn write_record(
    book: &mut Spreadsheet,
    m: &Measurement,
    j: &Judgement,
) -> Result<(), RecordError> {
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| RecordError::SheetMissing(SHEET_NAME.to_string()))?;

    let meta = &m.metadata;
    write_anchored(sheet, cells::SYSTEM_NAME, &meta.system_name)?;
    write_anchored(sheet, cells::TARGET_TEST_PRESSURE, &meta.target_test_pressure)?;
    write_anchored(sheet, cells::TEST_RANGE, &meta.test_range)?;
    write_anchored(sheet, cells::TEST_MEDIUM, &meta.test_medium)?;
    write_anchored(sheet, cells::HOLDING_DURATION, &meta.holding_duration)?;
    write_anchored(sheet, cells::GAUGE_NO, &meta.gauge_no)?;
    write_anchored(sheet, cells::MEASUREMENT_LOCATION, &meta.measurement_location)?;
    write_anchored(sheet, cells::STARTED_AT, &format_timestamp(m.started_at))?;
    write_anchored(sheet, cells::ENDED_AT, &format_timestamp(m.ended_at))?;

    write_anchored(
        sheet,
        cells::START_PRESSURE,
        &judgement::format_pressure(m.start_pressure_mpa),
    )?;
    write_anchored(
        sheet,
        cells::START_TEMPERATURE,
        &judgement::format_temperature(m.start_temperature_c),
    )?;
    write_anchored(
        sheet,
        cells::END_PRESSURE,
        &judgement::format_pressure(m.end_pressure_mpa),
    )?;
    write_anchored(
        sheet,
        cells::END_TEMPERATURE,
        &judgement::format_temperature(m.end_temperature_c),
    )?;
    write_anchored(
        sheet,
        cells::CORRECTED_END_PRESSURE,
        &judgement::format_pressure(j.corrected_end_pressure_mpa),
    )?;
    write_anchored(
        sheet,
        cells::DELTA_PRESSURE,
        &judgement::format_pressure(j.delta_pressure_mpa),
    )?;
    write_anchored(
        sheet,
        cells::TOLERANCE_BAND,
        &judgement::format_tolerance(j.tolerance_band_mpa),
    )?;
    write_anchored(sheet, cells::VERDICT, j.verdict_label())?;
    write_anchored(sheet, cells::TESTER, &meta.tester)?;
    Ok(())
}

/// 워크북을 메모리 상의 xlsx 바이트로 직렬화한다.
pub fn to_bytes(book: &Spreadsheet) -> Result<Vec<u8>, RecordError> {
    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut cursor)?;
    Ok(cursor.into_inner())
}
