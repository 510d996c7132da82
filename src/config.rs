use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::units::*;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 사용 가능한 단위 시스템 프리셋을 정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum UnitSystem {
    /// mbar, m³, m, °C. 계산 엔진 기준.
    Metric,
    /// inH2O, ft³, ft, °F
    Imperial,
}

impl UnitSystem {
    pub fn default_units(&self) -> DefaultUnits {
        match self {
            UnitSystem::Metric => DefaultUnits::default(),
            UnitSystem::Imperial => DefaultUnits {
                pressure: PressureUnit::InchWaterColumn,
                volume: VolumeUnit::CubicFoot,
                length: LengthUnit::Foot,
                temperature: TemperatureUnit::Fahrenheit,
            },
        }
    }
}

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

/// 입력/표시에 쓰는 물리량별 기본 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultUnits {
    pub pressure: PressureUnit,
    pub volume: VolumeUnit,
    pub length: LengthUnit,
    pub temperature: TemperatureUnit,
}

impl Default for DefaultUnits {
    fn default() -> Self {
        Self {
            pressure: PressureUnit::MilliBar,
            volume: VolumeUnit::CubicMeter,
            length: LengthUnit::Metre,
            temperature: TemperatureUnit::Celsius,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `auto`, `en`, `ko`
    pub language: String,
    pub unit_system: UnitSystem,
    pub output_format: OutputFormat,
    pub default_units: DefaultUnits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            unit_system: UnitSystem::Metric,
            output_format: OutputFormat::Table,
            default_units: DefaultUnits::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// 지원하지 않는 언어 코드
    UnknownLanguage(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config file error: {e}"),
            ConfigError::Serde(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialization error: {e}"),
            ConfigError::UnknownLanguage(code) => {
                write!(f, "unsupported language '{code}' (use auto, en or ko)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// 작업 디렉터리의 config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(Path::new(DEFAULT_CONFIG_FILE))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본값으로 만들어 저장한다.
pub fn load_or_default_at(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        log::debug!("created default config at {}", path.display());
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 단위계 프리셋을 바꾸고 기본 단위를 그 프리셋으로 맞춘다.
    pub fn apply_unit_system(&mut self, system: UnitSystem) {
        self.unit_system = system;
        self.default_units = system.default_units();
    }

    /// 언어 코드를 바꾼다. `auto` 는 시스템 로케일을 따른다는 뜻이다.
    pub fn set_language(&mut self, code: &str) -> Result<(), ConfigError> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("auto") {
            self.language = "auto".to_string();
            return Ok(());
        }
        match crate::i18n::normalize_lang(code) {
            Some(lang) => {
                self.language = lang;
                Ok(())
            }
            None => Err(ConfigError::UnknownLanguage(code.to_string())),
        }
    }

    pub fn language_preference(&self) -> Option<&str> {
        Some(self.language.as_str()).filter(|l| !l.eq_ignore_ascii_case("auto"))
    }
}

/// `--config` 가 없을 때 쓰는 경로.
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
