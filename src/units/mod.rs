//! 단위 정의 및 변환 모듈 모음. 계산 엔진은 mbar, m³, m, °C 만 다룬다.

pub mod length;
pub mod pressure;
pub mod temperature;
pub mod volume;

pub use length::{convert_length, from_metre, to_metre, LengthUnit};
pub use pressure::{convert_pressure, from_mbar, to_mbar, PressureUnit};
pub use temperature::{
    convert_temperature, convert_temperature_diff, from_celsius, to_celsius, TemperatureUnit,
};
pub use volume::{convert_volume, from_cubic_meter, to_cubic_meter, VolumeUnit};
