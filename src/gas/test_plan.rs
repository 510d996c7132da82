//! 강도/기밀 시험 압력, 유지 시간, 안정화 시간, 온도 보정 유도.

use serde::Serialize;

/// 저압 알고리즘 적용 경계 [mbar].
pub const LOW_PRESSURE_THRESHOLD_MBAR: f64 = 75.0;
const KELVIN_OFFSET: f64 = 273.15;

/// 시험 계획 입력. 값은 모두 정규 단위(mbar, m³, m³/h, °C)이며 비유한 값은 없는 것으로 본다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TestPlanInput {
    pub design_pressure_mbar: Option<f64>,
    pub operating_pressure_mbar: Option<f64>,
    pub system_volume_m3: Option<f64>,
    pub fill_rate_m3_per_h: Option<f64>,
    pub start_temp_c: Option<f64>,
    pub end_temp_c: Option<f64>,
}

/// 누락된 필수 입력.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingInput {
    /// 설계 압력과 운전 압력이 모두 없음
    Pressure,
    SystemVolume,
}

/// 시험 계획 유도 오류. 빈 폼에서 흔히 나오는 정상 상태다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPlanError {
    InsufficientInput(MissingInput),
}

impl std::fmt::Display for TestPlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestPlanError::InsufficientInput(MissingInput::Pressure) => {
                write!(f, "design or operating pressure is required")
            }
            TestPlanError::InsufficientInput(MissingInput::SystemVolume) => {
                write!(f, "system volume is required")
            }
        }
    }
}

impl std::error::Error for TestPlanError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressureSource {
    Design,
    /// 설계 압력이 비어 운전 압력을 사용함
    Operating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressureCategory {
    /// 설계 압력 ≤ 75 mbar
    Low,
    MediumHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressureTrend {
    Rise,
    Fall,
    Steady,
}

/// 온도 변화에 의한 겉보기 압력 변화.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureCompensation {
    pub delta_temp_c: f64,
    /// 부호가 있는 값. 양수면 겉보기 상승.
    pub delta_pressure_mbar: f64,
    pub trend: PressureTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestPlanResult {
    pub design_pressure_mbar: f64,
    pub pressure_source: PressureSource,
    pub category: PressureCategory,
    pub system_volume_m3: f64,
    pub strength_test_pressure_mbar: f64,
    /// 90% 상한 적용 전 기밀시험 압력
    pub raw_tightness_pressure_mbar: f64,
    pub tightness_test_pressure_mbar: f64,
    pub hold_time_minutes: f64,
    /// 충전 유량이 주어질 때만 계산
    pub stabilisation_minutes: Option<f64>,
    /// 시작/종료 온도가 주어질 때만 계산
    pub temperature_compensation: Option<TemperatureCompensation>,
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// 시험 계획을 유도한다.
pub fn derive_test_plan(input: &TestPlanInput) -> Result<TestPlanResult, TestPlanError> {
    let (design, pressure_source) = match (
        finite(input.design_pressure_mbar),
        finite(input.operating_pressure_mbar),
    ) {
        (Some(d), _) => (d, PressureSource::Design),
        (None, Some(op)) => (op, PressureSource::Operating),
        (None, None) => return Err(TestPlanError::InsufficientInput(MissingInput::Pressure)),
    };
    let volume = finite(input.system_volume_m3)
        .ok_or(TestPlanError::InsufficientInput(MissingInput::SystemVolume))?;

    let category = if design <= LOW_PRESSURE_THRESHOLD_MBAR {
        PressureCategory::Low
    } else {
        PressureCategory::MediumHigh
    };
    let strength = strength_test_pressure(design, category);
    let raw_tightness = match category {
        PressureCategory::Low => design.max(20.0),
        PressureCategory::MediumHigh => (design * 1.1).max(300.0),
    };
    let tightness = raw_tightness.min(strength * 0.9);

    let stabilisation_minutes = finite(input.fill_rate_m3_per_h)
        .filter(|rate| *rate > 0.0)
        .map(|rate| ((volume / rate) * 60.0 + 5.0).max(10.0));

    let temperature_compensation = match (finite(input.start_temp_c), finite(input.end_temp_c)) {
        (Some(start), Some(end)) => temperature_compensation(tightness, start, end),
        _ => None,
    };

    Ok(TestPlanResult {
        design_pressure_mbar: design,
        pressure_source,
        category,
        system_volume_m3: volume,
        strength_test_pressure_mbar: strength,
        raw_tightness_pressure_mbar: raw_tightness,
        tightness_test_pressure_mbar: tightness,
        hold_time_minutes: hold_time_minutes(volume),
        stabilisation_minutes,
        temperature_compensation,
    })
}

fn strength_test_pressure(design: f64, category: PressureCategory) -> f64 {
    let floor = match category {
        PressureCategory::Low => 150.0,
        PressureCategory::MediumHigh => 1000.0,
    };
    (design * 1.5).max(floor)
}

/// 체적 구간별 최소 유지 시간 [min], [5, 180]로 제한.
pub fn hold_time_minutes(system_volume_m3: f64) -> f64 {
    let raw = if system_volume_m3 <= 0.03 {
        5.0
    } else if system_volume_m3 <= 0.1 {
        10.0
    } else {
        20.0 + (system_volume_m3 - 0.1) * 30.0
    };
    raw.clamp(5.0, 180.0)
}

/// ΔP = P × ΔT / (T₁ + 273.15). 절대 시작 온도가 0 이하이면 계산하지 않는다.
pub fn temperature_compensation(
    tightness_mbar: f64,
    start_temp_c: f64,
    end_temp_c: f64,
) -> Option<TemperatureCompensation> {
    let absolute_start = start_temp_c + KELVIN_OFFSET;
    if absolute_start <= 0.0 {
        return None;
    }
    let delta_temp_c = end_temp_c - start_temp_c;
    let trend = if delta_temp_c > 0.0 {
        PressureTrend::Rise
    } else if delta_temp_c < 0.0 {
        PressureTrend::Fall
    } else {
        PressureTrend::Steady
    };
    Some(TemperatureCompensation {
        delta_temp_c,
        delta_pressure_mbar: tightness_mbar * delta_temp_c / absolute_start,
        trend,
    })
}
