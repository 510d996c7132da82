use serde::{Deserialize, Serialize};

/// 배관 길이 단위. 내부 기준은 미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Metre,
    Millimetre,
    Centimetre,
    Foot,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Metre => "m",
            LengthUnit::Millimetre => "mm",
            LengthUnit::Centimetre => "cm",
            LengthUnit::Foot => "ft",
        }
    }
}

pub fn to_metre(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Metre => value,
        LengthUnit::Millimetre => value / 1000.0,
        LengthUnit::Centimetre => value / 100.0,
        LengthUnit::Foot => value * 0.3048,
    }
}

pub fn from_metre(value_m: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Metre => value_m,
        LengthUnit::Millimetre => value_m * 1000.0,
        LengthUnit::Centimetre => value_m * 100.0,
        LengthUnit::Foot => value_m / 0.3048,
    }
}

/// 길이를 다른 단위로 변환한다.
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    from_metre(to_metre(value, from), to)
}
