use super::reference_data::MeterKind;

/// 체적 계산(배관, 계량기, 합계) 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum SizingError {
    /// Table 4에 없는 배관/호스 ID
    UnknownSize(String),
    /// Table 3에 없는 계량기 ID
    UnknownMeter { kind: MeterKind, id: String },
    /// 유한 양수가 아닌 퍼지 배수 (저수준 계산기를 직접 호출할 때만 발생)
    InvalidMultiplier(f64),
}

impl std::fmt::Display for SizingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizingError::UnknownSize(id) => write!(f, "unknown pipe or purge hose size: {id}"),
            SizingError::UnknownMeter { kind, id } => {
                write!(f, "unknown {} meter: {id}", kind.as_str())
            }
            SizingError::InvalidMultiplier(m) => {
                write!(f, "purge multiplier must be a finite number > 0 (got {m})")
            }
        }
    }
}

impl std::error::Error for SizingError {}
