use crate::quantity::QuantityKind;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    UnknownUnit(String),
    /// 지원하지 않는 물리량
    UnknownQuantity(String),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::UnknownUnit(u) => write!(f, "unknown unit: {u}"),
            ConversionError::UnknownQuantity(q) => write!(f, "unsupported quantity: {q}"),
        }
    }
}

impl std::error::Error for ConversionError {}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시: `mbar`, `inH2O`, `L`, `ft3`, `mm`, `F`.
pub fn convert(
    kind: QuantityKind,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    match kind {
        QuantityKind::Pressure => {
            let from = parse_pressure_unit(from_unit_str)?;
            let to = parse_pressure_unit(to_unit_str)?;
            Ok(convert_pressure(value, from, to))
        }
        QuantityKind::Volume => {
            let from = parse_volume_unit(from_unit_str)?;
            let to = parse_volume_unit(to_unit_str)?;
            Ok(convert_volume(value, from, to))
        }
        QuantityKind::Length => {
            let from = parse_length_unit(from_unit_str)?;
            let to = parse_length_unit(to_unit_str)?;
            Ok(convert_length(value, from, to))
        }
        QuantityKind::Temperature => {
            let from = parse_temperature_unit(from_unit_str)?;
            let to = parse_temperature_unit(to_unit_str)?;
            Ok(convert_temperature(value, from, to))
        }
        QuantityKind::TemperatureDifference => {
            let from = parse_temperature_unit(from_unit_str)?;
            let to = parse_temperature_unit(to_unit_str)?;
            Ok(convert_temperature_diff(value, from, to))
        }
    }
}

pub fn parse_quantity_kind(s: &str) -> Result<QuantityKind, ConversionError> {
    QuantityKind::from_key(s).ok_or_else(|| ConversionError::UnknownQuantity(s.to_string()))
}

pub fn parse_pressure_unit(s: &str) -> Result<PressureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "mbar" | "millibar" => Ok(PressureUnit::MilliBar),
        "bar" => Ok(PressureUnit::Bar),
        "pa" | "pascal" => Ok(PressureUnit::Pascal),
        "kpa" | "kilopascal" => Ok(PressureUnit::KiloPascal),
        "psi" => Ok(PressureUnit::Psi),
        "inh2o" | "inwc" | "in.wc" | "\"wc" => Ok(PressureUnit::InchWaterColumn),
        "mmh2o" | "mmwc" => Ok(PressureUnit::MillimetreWaterColumn),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_volume_unit(s: &str) -> Result<VolumeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m3" | "m^3" | "m³" => Ok(VolumeUnit::CubicMeter),
        "l" | "liter" | "litre" => Ok(VolumeUnit::Litre),
        "ft3" | "ft^3" | "ft³" | "cuft" => Ok(VolumeUnit::CubicFoot),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_length_unit(s: &str) -> Result<LengthUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m" | "meter" | "metre" => Ok(LengthUnit::Metre),
        "mm" => Ok(LengthUnit::Millimetre),
        "cm" => Ok(LengthUnit::Centimetre),
        "ft" | "foot" | "feet" => Ok(LengthUnit::Foot),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "c" | "celsius" | "°c" => Ok(TemperatureUnit::Celsius),
        "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
        "f" | "fahrenheit" | "°f" => Ok(TemperatureUnit::Fahrenheit),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_names_are_case_insensitive() {
        assert_eq!(parse_pressure_unit("inH2O"), Ok(PressureUnit::InchWaterColumn));
        assert_eq!(parse_volume_unit("L"), Ok(VolumeUnit::Litre));
        assert_eq!(parse_length_unit(" FT "), Ok(LengthUnit::Foot));
        assert!(matches!(
            parse_temperature_unit("rankine"),
            Err(ConversionError::UnknownUnit(_))
        ));
    }

    #[test]
    fn base_unit_symbols_are_accepted() {
        for kind in QuantityKind::ALL {
            let sym = kind.canonical_symbol();
            assert_eq!(convert(kind, 2.5, sym, sym), Ok(2.5), "{}", kind.key());
        }
    }

    #[test]
    fn temperature_difference_ignores_offset() {
        let diff = convert(QuantityKind::TemperatureDifference, 9.0, "F", "C");
        assert_eq!(diff, Ok(5.0));
    }
}
