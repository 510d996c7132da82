use serde::{Deserialize, Serialize};

/// 압력 단위. 내부 기준은 mbar(게이지)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    MilliBar,
    Bar,
    Pascal,
    KiloPascal,
    Psi,
    /// 인치 수주 (4 °C 물 기준)
    InchWaterColumn,
    MillimetreWaterColumn,
}

const PA_PER_MBAR: f64 = 100.0;
const MBAR_PER_PSI: f64 = 68.947_572_9;
const MBAR_PER_IN_WC: f64 = 2.490_889;
const MBAR_PER_MM_WC: f64 = 0.098_066_5;

impl PressureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::MilliBar => "mbar",
            PressureUnit::Bar => "bar",
            PressureUnit::Pascal => "Pa",
            PressureUnit::KiloPascal => "kPa",
            PressureUnit::Psi => "psi",
            PressureUnit::InchWaterColumn => "inH2O",
            PressureUnit::MillimetreWaterColumn => "mmH2O",
        }
    }
}

/// 주어진 압력을 mbar 로 변환한다.
pub fn to_mbar(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::MilliBar => value,
        PressureUnit::Bar => value * 1000.0,
        PressureUnit::Pascal => value / PA_PER_MBAR,
        PressureUnit::KiloPascal => value * 10.0,
        PressureUnit::Psi => value * MBAR_PER_PSI,
        PressureUnit::InchWaterColumn => value * MBAR_PER_IN_WC,
        PressureUnit::MillimetreWaterColumn => value * MBAR_PER_MM_WC,
    }
}

/// mbar 값을 원하는 단위로 변환한다.
pub fn from_mbar(value_mbar: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::MilliBar => value_mbar,
        PressureUnit::Bar => value_mbar / 1000.0,
        PressureUnit::Pascal => value_mbar * PA_PER_MBAR,
        PressureUnit::KiloPascal => value_mbar / 10.0,
        PressureUnit::Psi => value_mbar / MBAR_PER_PSI,
        PressureUnit::InchWaterColumn => value_mbar / MBAR_PER_IN_WC,
        PressureUnit::MillimetreWaterColumn => value_mbar / MBAR_PER_MM_WC,
    }
}

/// 압력을 원하는 단위로 변환한다.
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    from_mbar(to_mbar(value, from), to)
}
