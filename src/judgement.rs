use serde::{Deserialize, Serialize};

use crate::entry::Measurement;

/// 섭씨 → 켈빈 오프셋.
const KELVIN_OFFSET: f64 = 273.15;

/// 합부 판정 범위 정책.
///
/// 현장마다 개시 압력 비례(±1%)와 고정 절대값(±0.001 MPa) 두 방식이
/// 쓰이므로 설정으로 선택한다. 기본값은 Relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TolerancePolicy {
    /// 開始圧力의 ±1%
    Relative,
    /// 고정 ±0.001 MPa
    Absolute,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        TolerancePolicy::Relative
    }
}

impl TolerancePolicy {
    /// 판정 범위 [MPa]를 계산한다.
    pub fn band_mpa(&self, start_pressure_mpa: f64) -> f64 {
        match self {
            TolerancePolicy::Relative => start_pressure_mpa * 0.01,
            TolerancePolicy::Absolute => 0.001,
        }
    }
}

/// 온도 보정 후 합부 판정 결과.
///
/// 항상 Measurement의 4개 측정값에서 전량 재계산되며 생성 후
/// 수정되지 않는다.
#[derive(Debug, Clone, Copy)]
pub struct Judgement {
    /// 보정 후 終了圧力 [MPa]
    pub corrected_end_pressure_mpa: f64,
    /// 압력 변화량 ΔP [MPa]
    pub delta_pressure_mpa: f64,
    /// 판정 범위 [MPa]
    pub tolerance_band_mpa: f64,
    /// 합격 여부
    pub pass: bool,
}

/// 보일-샤를 법칙 기반 온도 보정으로 합부를 판정한다.
///
/// P2_corr = P2 * (T1_K / T2_K), ΔP = P2_corr - P1.
/// |ΔP| == 판정범위 인 경계값은 합격으로 처리한다(비엄격 부등호).
/// 終了温度 -273.15℃는 0 나눗셈이 되어 비유한값이 나온다. 여기서는
/// 막지 않고 호출 측에서 is_finite 검사로 걸러낸다.
pub fn judge(m: &Measurement, policy: TolerancePolicy) -> Judgement {
    let t1_k = m.start_temperature_c + KELVIN_OFFSET;
    let t2_k = m.end_temperature_c + KELVIN_OFFSET;
    let corrected = m.end_pressure_mpa * (t1_k / t2_k);
    let delta = corrected - m.start_pressure_mpa;
    let band = policy.band_mpa(m.start_pressure_mpa);
    Judgement {
        corrected_end_pressure_mpa: corrected,
        delta_pressure_mpa: delta,
        tolerance_band_mpa: band,
        pass: delta.abs() <= band,
    }
}

impl Judgement {
    /// 판정 결과가 모두 유한한 수인지 검사한다.
    pub fn is_finite(&self) -> bool {
        self.corrected_end_pressure_mpa.is_finite()
            && self.delta_pressure_mpa.is_finite()
            && self.tolerance_band_mpa.is_finite()
    }

    /// 기록지에 들어가는 판정 문구.
    pub fn verdict_label(&self) -> &'static str {
        if self.pass {
            "合格"
        } else {
            "不合格"
        }
    }

    /// 메일 본문 등에 쓰는 판정 요약. 기록지와 같은 표기 규칙을 쓴다.
    pub fn summary_text(&self) -> String {
        format!(
            "判定結果: {}\nP2_corr: {} MPa\nΔP: {} MPa\n判定範囲: {} MPa",
            self.verdict_label(),
            format_pressure(self.corrected_end_pressure_mpa),
            format_pressure(self.delta_pressure_mpa),
            format_tolerance(self.tolerance_band_mpa),
        )
    }
}

/// 압력 표기: 소수 4자리.
pub fn format_pressure(mpa: f64) -> String {
    format!("{mpa:.4}")
}

/// 온도 표기: 소수 1자리.
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}")
}

/// 판정 범위 표기: ± 기호 + 소수 4자리.
pub fn format_tolerance(mpa: f64) -> String {
    format!("±{mpa:.4}")
}
