//! 배관/퍼지 호스 구간의 설치 체적과 퍼지 체적.

use super::error::SizingError;
use super::reference_data::ReferenceTables;
use serde::{Deserialize, Serialize};

/// 배관 일정표의 한 구간.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSegment {
    pub size_id: String,
    pub length_m: f64,
}

impl PipeSegment {
    pub fn new(size_id: impl Into<String>, length_m: f64) -> Self {
        Self {
            size_id: size_id.into(),
            length_m,
        }
    }
}

/// 길이를 계산용으로 정규화한다. NaN/inf/음수는 0으로 본다.
pub fn clamp_length(length_m: f64) -> f64 {
    if length_m.is_finite() && length_m > 0.0 {
        length_m
    } else {
        0.0
    }
}

/// 구간 설치 체적 [m³] = 1 m 당 체적 × 길이.
pub fn install_volume(
    tables: &ReferenceTables,
    size_id: &str,
    length_m: f64,
) -> Result<f64, SizingError> {
    let entry = tables
        .segment(size_id)
        .ok_or_else(|| SizingError::UnknownSize(size_id.to_string()))?;
    Ok(entry.volume_per_metre_m3 * clamp_length(length_m))
}

/// 구간 퍼지 체적 [m³] = 설치 체적 × 퍼지 배수.
///
/// 잘못된 배수를 기본값으로 바꾸는 정책은 호출자(합계 계산) 몫이며,
/// 여기서는 `InvalidMultiplier` 로 거부한다.
pub fn purge_volume(
    tables: &ReferenceTables,
    size_id: &str,
    length_m: f64,
    purge_multiplier: f64,
) -> Result<f64, SizingError> {
    if !purge_multiplier.is_finite() || purge_multiplier <= 0.0 {
        return Err(SizingError::InvalidMultiplier(purge_multiplier));
    }
    Ok(install_volume(tables, size_id, length_m)? * purge_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::reference_data::DEFAULT_PURGE_MULTIPLIER;

    #[test]
    fn negative_and_nan_lengths_count_as_zero() {
        let t = ReferenceTables::builtin();
        assert_eq!(install_volume(t, "DN50", -3.0), Ok(0.0));
        assert_eq!(install_volume(t, "DN50", f64::NAN), Ok(0.0));
        assert_eq!(install_volume(t, "DN50", f64::INFINITY), Ok(0.0));
    }

    #[test]
    fn unknown_size_is_reported_by_name() {
        let t = ReferenceTables::builtin();
        assert_eq!(
            install_volume(t, "DN999", 1.0),
            Err(SizingError::UnknownSize("DN999".into()))
        );
    }

    #[test]
    fn bad_multiplier_is_rejected_not_coerced() {
        let t = ReferenceTables::builtin();
        assert!(matches!(
            purge_volume(t, "DN50", 1.0, 0.0),
            Err(SizingError::InvalidMultiplier(_))
        ));
        assert!(purge_volume(t, "DN50", 1.0, f64::NAN).is_err());
        let v = purge_volume(t, "DN50", 10.0, DEFAULT_PURGE_MULTIPLIER).unwrap_or(f64::NAN);
        assert!((v - 0.036).abs() < 1e-12);
    }
}
