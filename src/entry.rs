use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 기록지 상단에 들어가는 자유 서식 메타데이터.
///
/// 내용 검증은 하지 않는다. 빈 문자열도 그대로 기록지에 기록된다.
#[derive(Debug, Clone, Default)]
pub struct TestMetadata {
    /// 系統名
    pub system_name: String,
    /// 試験圧力 (MPa)
    pub target_test_pressure: String,
    /// 試験範囲
    pub test_range: String,
    /// 試験媒体
    pub test_medium: String,
    /// 放置時間 (h)
    pub holding_duration: String,
    /// 使用圧力計機器No.
    pub gauge_no: String,
    /// 測定場所
    pub measurement_location: String,
    /// 試験実施者
    pub tester: String,
}

/// 폼에서 넘어온 원시 입력. 숫자/시각 필드는 아직 파싱 전 텍스트 상태다.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub metadata: TestMetadata,
    pub start_date: NaiveDate,
    pub start_hour: String,
    pub start_minute: String,
    pub end_date: NaiveDate,
    pub end_hour: String,
    pub end_minute: String,
    /// 開始圧力 [MPa]
    pub start_pressure: String,
    /// 開始温度 [℃]
    pub start_temperature: String,
    /// 終了圧力 [MPa]
    pub end_pressure: String,
    /// 終了温度 [℃]
    pub end_temperature: String,
}

/// 검증을 통과한 1회분 측정 기록.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub start_pressure_mpa: f64,
    pub start_temperature_c: f64,
    pub end_pressure_mpa: f64,
    pub end_temperature_c: f64,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub metadata: TestMetadata,
}

/// 4개 필수 측정 필드를 식별한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementField {
    StartPressure,
    StartTemperature,
    EndPressure,
    EndTemperature,
}

impl MeasurementField {
    /// 기록지 표기에 맞춘 필드 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementField::StartPressure => "開始圧力",
            MeasurementField::StartTemperature => "開始温度",
            MeasurementField::EndPressure => "終了圧力",
            MeasurementField::EndTemperature => "終了温度",
        }
    }
}

/// 시/분 입력 필드를 식별한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockField {
    StartHour,
    StartMinute,
    EndHour,
    EndMinute,
}

impl ClockField {
    pub fn label(&self) -> &'static str {
        match self {
            ClockField::StartHour => "開始時",
            ClockField::StartMinute => "開始分",
            ClockField::EndHour => "終了時",
            ClockField::EndMinute => "終了分",
        }
    }

    fn max(&self) -> u32 {
        match self {
            ClockField::StartHour | ClockField::EndHour => 23,
            ClockField::StartMinute | ClockField::EndMinute => 59,
        }
    }
}

/// 입력 검증 실패를 표현한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// 필수 측정값이 비어 있거나 숫자로 해석되지 않음
    MissingMeasurement { fields: Vec<MeasurementField> },
    /// 시/분 필드가 정수가 아니거나 허용 범위를 벗어남
    MalformedTime { field: ClockField, value: String },
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::MissingMeasurement { fields } => {
                let labels: Vec<&str> = fields.iter().map(|m| m.label()).collect();
                write!(f, "측정값 누락/형식 오류: {}", labels.join(", "))
            }
            EntryError::MalformedTime { field, value } => {
                write!(f, "시각 입력 오류: {} = {value:?}", field.label())
            }
        }
    }
}

impl std::error::Error for EntryError {}

/// 텍스트를 f64로 변환한다. 공백 제거 후 빈 문자열과 파싱 실패는
/// 모두 None으로 취급한다(누락과 형식 오류를 구분하지 않는다).
pub fn safe_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_clock(field: ClockField, raw: &str) -> Result<u32, EntryError> {
    let malformed = || EntryError::MalformedTime {
        field,
        value: raw.trim().to_string(),
    };
    let n: i64 = raw.trim().parse().map_err(|_| malformed())?;
    if n < 0 || n > i64::from(field.max()) {
        return Err(malformed());
    }
    Ok(n as u32)
}

fn combine(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    // parse_clock을 통과한 값이므로 from_hms_opt는 항상 Some이다.
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// 원시 입력을 검증해 Measurement를 만든다.
///
/// 시각 필드는 범위 위반 시 즉시 실패한다. 그 다음 4개 측정 필드를
/// 일괄 검사해 누락분을 한 번에 보고한다. 실패 시 계산과 기록지
/// 작성 모두 진행되지 않는다.
pub fn validate(entry: RawEntry) -> Result<Measurement, EntryError> {
    let start_hour = parse_clock(ClockField::StartHour, &entry.start_hour)?;
    let start_minute = parse_clock(ClockField::StartMinute, &entry.start_minute)?;
    let end_hour = parse_clock(ClockField::EndHour, &entry.end_hour)?;
    let end_minute = parse_clock(ClockField::EndMinute, &entry.end_minute)?;

    let p1 = safe_f64(&entry.start_pressure);
    let t1 = safe_f64(&entry.start_temperature);
    let p2 = safe_f64(&entry.end_pressure);
    let t2 = safe_f64(&entry.end_temperature);
    match (p1, t1, p2, t2) {
        (Some(p1), Some(t1), Some(p2), Some(t2)) => Ok(Measurement {
            start_pressure_mpa: p1,
            start_temperature_c: t1,
            end_pressure_mpa: p2,
            end_temperature_c: t2,
            started_at: combine(entry.start_date, start_hour, start_minute),
            ended_at: combine(entry.end_date, end_hour, end_minute),
            metadata: entry.metadata,
        }),
        _ => {
            let checks = [
                (MeasurementField::StartPressure, p1),
                (MeasurementField::StartTemperature, t1),
                (MeasurementField::EndPressure, p2),
                (MeasurementField::EndTemperature, t2),
            ];
            let fields = checks
                .iter()
                .filter(|(_, v)| v.is_none())
                .map(|(f, _)| *f)
                .collect();
            Err(EntryError::MissingMeasurement { fields })
        }
    }
}
