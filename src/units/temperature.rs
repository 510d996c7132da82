use serde::{Deserialize, Serialize};

/// 온도 단위. 내부 기준은 섭씨이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Kelvin,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// 주어진 값을 섭씨로 변환한다.
pub fn to_celsius(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Kelvin => value - 273.15,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
    }
}

/// 섭씨 값을 원하는 단위로 변환한다.
pub fn from_celsius(value_c: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value_c,
        TemperatureUnit::Kelvin => value_c + 273.15,
        TemperatureUnit::Fahrenheit => value_c * 9.0 / 5.0 + 32.0,
    }
}

/// 온도를 서로 다른 단위로 변환한다.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    from_celsius(to_celsius(value, from), to)
}

/// 온도차 변환. 기준점 없이 배율만 적용한다 (°C와 K는 1:1, °F는 1.8:1).
pub fn convert_temperature_diff(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    let base = match from {
        TemperatureUnit::Celsius | TemperatureUnit::Kelvin => value,
        TemperatureUnit::Fahrenheit => value * 5.0 / 9.0,
    };
    match to {
        TemperatureUnit::Celsius | TemperatureUnit::Kelvin => base,
        TemperatureUnit::Fahrenheit => base * 9.0 / 5.0,
    }
}
