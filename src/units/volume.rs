use serde::{Deserialize, Serialize};

/// 체적 단위. 내부 기준은 입방미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeUnit {
    CubicMeter,
    Litre,
    CubicFoot,
}

const M3_PER_FT3: f64 = 0.028_316_846_6;

impl VolumeUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::CubicMeter => "m³",
            VolumeUnit::Litre => "L",
            VolumeUnit::CubicFoot => "ft³",
        }
    }
}

pub fn to_cubic_meter(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::CubicMeter => value,
        VolumeUnit::Litre => value / 1000.0,
        VolumeUnit::CubicFoot => value * M3_PER_FT3,
    }
}

pub fn from_cubic_meter(value_m3: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::CubicMeter => value_m3,
        VolumeUnit::Litre => value_m3 * 1000.0,
        VolumeUnit::CubicFoot => value_m3 / M3_PER_FT3,
    }
}

/// 체적을 변환한다.
pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> f64 {
    from_cubic_meter(to_cubic_meter(value, from), to)
}
