//! 온도 보정/합부 판정 회귀 테스트.
use chrono::NaiveDate;

use airtight_test_recorder::entry::{Measurement, TestMetadata};
use airtight_test_recorder::judgement::{
    format_pressure, format_temperature, format_tolerance, judge, TolerancePolicy,
};

fn measurement(p1: f64, t1: f64, p2: f64, t2: f64) -> Measurement {
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date");
    Measurement {
        start_pressure_mpa: p1,
        start_temperature_c: t1,
        end_pressure_mpa: p2,
        end_temperature_c: t2,
        started_at: date.and_hms_opt(9, 0, 0).expect("valid time"),
        ended_at: date.and_hms_opt(10, 0, 0).expect("valid time"),
        metadata: TestMetadata::default(),
    }
}

#[test]
fn correction_formula_matches_ideal_gas_ratio() {
    let m = measurement(0.0799, 27.2, 0.0815, 29.8);
    let j = judge(&m, TolerancePolicy::Relative);
    let expected = 0.0815 * ((27.2 + 273.15) / (29.8 + 273.15));
    assert_eq!(j.corrected_end_pressure_mpa, expected);
    assert_eq!(j.delta_pressure_mpa, expected - 0.0799);
}

#[test]
fn relative_policy_scenario_fails() {
    // ΔP ≈ +0.0009 MPa, 판정범위 ±0.000799 MPa
    let m = measurement(0.0799, 27.2, 0.0815, 29.8);
    let j = judge(&m, TolerancePolicy::Relative);
    assert!((j.corrected_end_pressure_mpa - 0.0808005).abs() < 1e-6);
    assert!((j.delta_pressure_mpa - 0.0009005).abs() < 1e-6);
    assert!((j.tolerance_band_mpa - 0.000799).abs() < 1e-12);
    assert!(!j.pass);
    assert_eq!(j.verdict_label(), "不合格");
}

#[test]
fn absolute_policy_scenario_passes_within_fixed_band() {
    // 같은 입력에서 고정 ±0.001 MPa 기준이면 ΔP ≈ 0.0009 는 범위 내
    let m = measurement(0.0799, 27.2, 0.0815, 29.8);
    let j = judge(&m, TolerancePolicy::Absolute);
    assert!((j.tolerance_band_mpa - 0.001).abs() < 1e-12);
    assert!(j.pass);
    assert_eq!(j.verdict_label(), "合格");
}

#[test]
fn boundary_equality_counts_as_pass() {
    // 온도 동일 → 보정비 1.0, ΔP = P2 - P1 = 1.0 = 판정범위(100 * 1%)
    let m = measurement(100.0, 20.0, 101.0, 20.0);
    let j = judge(&m, TolerancePolicy::Relative);
    assert_eq!(j.delta_pressure_mpa, j.tolerance_band_mpa);
    assert!(j.pass);
}

#[test]
fn just_outside_band_fails() {
    let m = measurement(100.0, 20.0, 101.5, 20.0);
    let j = judge(&m, TolerancePolicy::Relative);
    assert!(j.delta_pressure_mpa > j.tolerance_band_mpa);
    assert!(!j.pass);
}

#[test]
fn negative_delta_uses_absolute_value() {
    let m = measurement(0.5, 20.0, 0.4, 20.0);
    let j = judge(&m, TolerancePolicy::Relative);
    assert!(j.delta_pressure_mpa < 0.0);
    assert!(!j.pass);
}

#[test]
fn relative_band_scales_with_start_pressure() {
    let a = judge(&measurement(0.1, 25.0, 0.1, 25.0), TolerancePolicy::Relative);
    let b = judge(&measurement(0.2, 25.0, 0.2, 25.0), TolerancePolicy::Relative);
    assert!((b.tolerance_band_mpa - 2.0 * a.tolerance_band_mpa).abs() < 1e-15);
}

#[test]
fn absolute_band_is_invariant_to_start_pressure() {
    let a = judge(&measurement(0.1, 25.0, 0.1, 25.0), TolerancePolicy::Absolute);
    let b = judge(&measurement(0.2, 25.0, 0.2, 25.0), TolerancePolicy::Absolute);
    assert_eq!(a.tolerance_band_mpa, b.tolerance_band_mpa);
    assert_eq!(a.tolerance_band_mpa, 0.001);
}

#[test]
fn absolute_zero_end_temperature_is_not_finite() {
    let m = measurement(0.1, 25.0, 0.1, -273.15);
    let j = judge(&m, TolerancePolicy::Relative);
    assert!(!j.is_finite());
}

#[test]
fn negative_celsius_temperatures_are_valid() {
    let m = measurement(0.1, -5.0, 0.1, -10.0);
    let j = judge(&m, TolerancePolicy::Relative);
    assert!(j.is_finite());
    // 온도 하강 → 보정 후 압력 상승
    assert!(j.corrected_end_pressure_mpa > 0.1);
}

#[test]
fn display_formats() {
    assert_eq!(format_pressure(0.080800545), "0.0808");
    assert_eq!(format_pressure(0.0799), "0.0799");
    assert_eq!(format_temperature(27.2), "27.2");
    assert_eq!(format_temperature(-3.0), "-3.0");
    assert_eq!(format_tolerance(0.000799), "±0.0008");
    assert_eq!(format_tolerance(0.01), "±0.0100");
}
