//! 다이어프램/로터리 계량기 설치·퍼지 허용량.

use super::error::SizingError;
use super::reference_data::{
    MeterKind, ReferenceTables, DEFAULT_PURGE_MULTIPLIER, DIAPHRAGM_PURGE_MULTIPLIER,
};
use serde::Serialize;

/// 계량기 선택. "No Meter" 문자열 대신 명시적 태그를 쓴다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "selection", content = "id", rename_all = "lowercase")]
pub enum MeterSelection {
    #[default]
    None,
    Selected(String),
}

impl MeterSelection {
    /// 폼 텍스트를 해석한다. 빈 값, "no meter", "none"(대소문자 무시)은 미선택이다.
    pub fn parse(text: &str) -> Self {
        let t = text.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("no meter") || t.eq_ignore_ascii_case("none") {
            MeterSelection::None
        } else {
            MeterSelection::Selected(t.to_string())
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            MeterSelection::None => None,
            MeterSelection::Selected(id) => Some(id),
        }
    }
}

/// 해석된 계량기 허용량 [m³].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MeterAllowance {
    pub install_m3: f64,
    /// Table 3 퍼지 값 (0이면 설치 체적 × 기본 배수)
    pub purge_m3: f64,
    /// 합계에 더해지는 퍼지 값. 다이어프램은 `purge_m3 × 5`.
    pub purge_allowance_m3: f64,
}

/// 선택된 계량기의 허용량을 구한다.
pub fn meter_allowance(
    tables: &ReferenceTables,
    kind: MeterKind,
    selection: &MeterSelection,
) -> Result<MeterAllowance, SizingError> {
    let id = match selection.id() {
        None => return Ok(MeterAllowance::default()),
        Some(id) => id,
    };
    let entry = tables
        .meter(kind, id)
        .ok_or_else(|| SizingError::UnknownMeter {
            kind,
            id: id.to_string(),
        })?;

    // 명시된 Table 3 퍼지 값이 우선한다.
    let purge_m3 = if entry.purge_volume_m3 > 0.0 {
        entry.purge_volume_m3
    } else {
        entry.install_volume_m3 * DEFAULT_PURGE_MULTIPLIER
    };
    let purge_allowance_m3 = match kind {
        MeterKind::Diaphragm => purge_m3 * DIAPHRAGM_PURGE_MULTIPLIER,
        MeterKind::Rotary => purge_m3,
    };
    Ok(MeterAllowance {
        install_m3: entry.install_volume_m3,
        purge_m3,
        purge_allowance_m3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::reference_data::{MeterEntry, RawTables};

    #[test]
    fn sentinel_text_means_no_meter() {
        assert_eq!(MeterSelection::parse(""), MeterSelection::None);
        assert_eq!(MeterSelection::parse("  NO METER "), MeterSelection::None);
        assert_eq!(MeterSelection::parse("none"), MeterSelection::None);
        assert_eq!(
            MeterSelection::parse(" U6 "),
            MeterSelection::Selected("U6".into())
        );
    }

    #[test]
    fn diaphragm_purge_is_scaled_rotary_is_not() {
        let t = ReferenceTables::builtin();
        let d = meter_allowance(t, MeterKind::Diaphragm, &MeterSelection::parse("U6"))
            .unwrap_or_default();
        assert_eq!(d.install_m3, 0.008);
        assert_eq!(d.purge_m3, 0.002);
        assert!((d.purge_allowance_m3 - 0.010).abs() < 1e-12);

        let r = meter_allowance(t, MeterKind::Rotary, &MeterSelection::parse("DN50"))
            .unwrap_or_default();
        assert_eq!(r.purge_allowance_m3, r.purge_m3);
        assert_eq!(r.purge_m3, 0.0023);
    }

    #[test]
    fn zero_table_purge_falls_back_to_multiplier() {
        let rows = [MeterEntry {
            id: "X1",
            install_volume_m3: 0.02,
            purge_volume_m3: 0.0,
        }];
        let raw = RawTables {
            version: "test",
            segments: &[],
            diaphragm_meters: &[],
            rotary_meters: &rows,
            gauges: &[],
            purge_factors: &[],
            gas_factors: &[],
        };
        let (tables, rejected) = ReferenceTables::validate(raw);
        assert!(rejected.is_empty());
        let a = meter_allowance(&tables, MeterKind::Rotary, &MeterSelection::parse("x1"))
            .unwrap_or_default();
        assert!((a.purge_m3 - 0.03).abs() < 1e-12);
    }

    #[test]
    fn unknown_meter_names_kind_and_id() {
        let t = ReferenceTables::builtin();
        let err = meter_allowance(t, MeterKind::Rotary, &MeterSelection::parse("U6"));
        assert_eq!(
            err,
            Err(SizingError::UnknownMeter {
                kind: MeterKind::Rotary,
                id: "U6".into()
            })
        );
    }
}
