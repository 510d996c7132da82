//! 시운전 절차 폼 스냅샷과 JSON 가져오기/내보내기.
//!
//! 폼 필드는 모두 문자열(빈 값 가능)로 저장되며 숫자 해석은 계산 직전에 한다.
//! 내보낸 문서에는 `__metadata` 봉투(앱 버전, 데이터 버전, 내보낸 시각)가 붙고,
//! 가져올 때는 봉투를 떼어 따로 돌려준다. 계산 엔진은 봉투를 읽지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::gas::reference_data::GAS_SIZING_DATA_VERSION;

pub const METADATA_KEY: &str = "__metadata";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 폼 입출력 오류.
#[derive(Debug)]
pub enum FormError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// JSON 파싱/직렬화 오류
    Json(serde_json::Error),
    /// 최상위 값이 객체가 아님
    NotAnObject,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::Io(e) => write!(f, "form file error: {e}"),
            FormError::Json(e) => write!(f, "form JSON error: {e}"),
            FormError::NotAnObject => write!(f, "the provided JSON does not contain form data"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<std::io::Error> for FormError {
    fn from(value: std::io::Error) -> Self {
        FormError::Io(value)
    }
}

impl From<serde_json::Error> for FormError {
    fn from(value: serde_json::Error) -> Self {
        FormError::Json(value)
    }
}

/// 배관 일정표 한 줄.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub size: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub length: String,
}

impl PipeRow {
    pub fn new(size: impl Into<String>, length: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            length: length.into(),
        }
    }
}

/// 폼 전체 스냅샷. 알 수 없는 필드(현장 정보, 체크박스 등)는 그대로 보존한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FormSnapshot {
    #[serde(default)]
    pub pipes: Vec<PipeRow>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub purge_hose_size: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub purge_hose_length: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub diaphragm_meter: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rotary_meter: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub purge_multiplier: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub design_pressure: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub operating_pressure: String,
    /// 입력된 추정 시스템 체적 [m³]. 비어 있으면 계산값을 쓴다.
    #[serde(default, deserialize_with = "lenient_text")]
    pub volume: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_fill_rate: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_temp_start: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_temp_end: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gas_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gauge: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub room_volume: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub purge_pipe_size: String,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

/// 내보내기 봉투.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub app_version: String,
    pub data_version: String,
    pub exported_at: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn stamp(now: DateTime<Utc>) -> Self {
        Self {
            app_version: APP_VERSION.to_string(),
            data_version: GAS_SIZING_DATA_VERSION.to_string(),
            exported_at: now,
        }
    }
}

/// 가져온 폼과 (있다면) 봉투.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedForm {
    pub snapshot: FormSnapshot,
    pub metadata: Option<DocumentMetadata>,
}

/// 숫자, 불리언, null 도 문자열로 받아들인다. 배열/객체는 빈 값으로 본다.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            log::warn!("ignoring non-scalar form field value: {other}");
            String::new()
        }
    })
}

/// 폼 숫자 필드를 해석한다. 빈 값이나 해석 불가 값은 `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::warn!("form field '{t}' is not a number; treated as blank");
            None
        }
    }
}

/// 배관 길이 필드. 빈 값은 0 m 로 본다.
pub fn parse_length(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// 스냅샷을 봉투가 붙은 JSON 문서로 만든다.
pub fn export_document(snapshot: &FormSnapshot, now: DateTime<Utc>) -> Result<Value, FormError> {
    let mut value = serde_json::to_value(snapshot)?;
    let object = value.as_object_mut().ok_or(FormError::NotAnObject)?;
    object.insert(
        METADATA_KEY.to_string(),
        serde_json::to_value(DocumentMetadata::stamp(now))?,
    );
    Ok(value)
}

/// JSON 문서를 폼으로 가져온다. 최상위가 객체가 아니면 거부한다.
pub fn import_document(value: Value) -> Result<ImportedForm, FormError> {
    let mut object: Map<String, Value> = match value {
        Value::Object(map) => map,
        _ => return Err(FormError::NotAnObject),
    };
    let metadata = object
        .remove(METADATA_KEY)
        .and_then(|m| match serde_json::from_value::<DocumentMetadata>(m) {
            Ok(meta) => Some(meta),
            Err(e) => {
                log::warn!("ignoring malformed {METADATA_KEY}: {e}");
                None
            }
        });
    let snapshot: FormSnapshot = serde_json::from_value(Value::Object(object))?;
    Ok(ImportedForm { snapshot, metadata })
}

pub fn parse_form(content: &str) -> Result<ImportedForm, FormError> {
    let value: Value = serde_json::from_str(content)?;
    import_document(value)
}

pub fn load_form(path: &Path) -> Result<ImportedForm, FormError> {
    let content = fs::read_to_string(path)?;
    let form = parse_form(&content)?;
    log::debug!(
        "loaded form {} ({} pipe rows)",
        path.display(),
        form.snapshot.pipes.len()
    );
    Ok(form)
}

pub fn save_form(path: &Path, snapshot: &FormSnapshot, now: DateTime<Utc>) -> Result<(), FormError> {
    let doc = export_document(snapshot, now)?;
    let content = serde_json::to_string_pretty(&doc)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_treats_blank_and_junk_as_absent() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(" 21.5 "), Some(21.5));
        assert_eq!(parse_length(""), 0.0);
    }

    #[test]
    fn numeric_json_fields_are_accepted_as_text() {
        let form = parse_form(r#"{"design-pressure": 21, "volume": null, "pipes": [{"size": "DN50", "length": 10}]}"#);
        let form = match form {
            Ok(f) => f,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(form.snapshot.design_pressure, "21");
        assert_eq!(form.snapshot.volume, "");
        assert_eq!(form.snapshot.pipes[0].length, "10");
        assert!(form.metadata.is_none());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(parse_form("[1, 2]"), Err(FormError::NotAnObject)));
        assert!(matches!(parse_form("\"text\""), Err(FormError::NotAnObject)));
        assert!(matches!(parse_form("{not json"), Err(FormError::Json(_))));
    }
}
