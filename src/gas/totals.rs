//! 배관 일정표, 퍼지 호스, 계량기를 합쳐 시스템 설치/퍼지 체적을 구한다.
//!
//! 단계 순서는 고정이며 모든 중간값을 이름 붙은 행으로 남긴다. 어느 한 ID라도
//! 조회에 실패하면 부분 합계 없이 전체가 실패한다.

use super::error::SizingError;
use super::meter_allowance::{meter_allowance, MeterAllowance, MeterSelection};
use super::reference_data::{MeterKind, ReferenceTables, DEFAULT_PURGE_MULTIPLIER};
use super::segment_volume::{self, clamp_length, PipeSegment};
use serde::Serialize;

/// 설치 측 피팅 허용률 (배관 설치 체적의 10%).
pub const FITTINGS_ALLOWANCE_RATIO: f64 = 0.10;

/// 퍼지 측 피팅 보정에 붙는 추가 배수. 참조 스프레드시트 값을 그대로 따른다.
pub const PURGE_FITTINGS_FACTOR: f64 = 1.50;

/// 합계 계산 입력.
#[derive(Debug, Clone, Default)]
pub struct TotalsInput {
    pub pipes: Vec<PipeSegment>,
    pub purge_hose: Option<PipeSegment>,
    pub diaphragm: MeterSelection,
    pub rotary: MeterSelection,
    /// 퍼지 배수 재정의. `None` 이면 기본값 1.5.
    pub purge_multiplier: Option<f64>,
}

/// 실제 사용된 퍼지 배수의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "supplied", rename_all = "kebab-case")]
pub enum MultiplierSource {
    Default,
    Override,
    /// 잘못된 재정의 값을 기본값으로 대체함
    SubstitutedInvalid(f64),
}

/// 계산을 막지는 않지만 사용자에게 알려야 하는 사항.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalsWarning {
    PurgeMultiplierSubstituted { supplied: f64, used: f64 },
}

impl std::fmt::Display for TotalsWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalsWarning::PurgeMultiplierSubstituted { supplied, used } => write!(
                f,
                "purge multiplier {supplied} is not a positive number; {used} used instead"
            ),
        }
    }
}

/// 합계 유도 단계. 순서가 곧 표시 순서다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalsStep {
    PipeInstall,
    PipePurge,
    PurgeHosePurge,
    DiaphragmInstall,
    DiaphragmPurge,
    RotaryInstall,
    RotaryPurge,
    SystemComponentsVolume,
    FittingsAllowance,
    EstimatedSystemVolume,
    PurgeBeforeFittings,
    PurgeFittingsAllowance,
    TotalPurgeVolume,
}

impl TotalsStep {
    pub fn key(&self) -> &'static str {
        match self {
            TotalsStep::PipeInstall => "pipe_install",
            TotalsStep::PipePurge => "pipe_purge",
            TotalsStep::PurgeHosePurge => "purge_hose_purge",
            TotalsStep::DiaphragmInstall => "diaphragm_install",
            TotalsStep::DiaphragmPurge => "diaphragm_purge",
            TotalsStep::RotaryInstall => "rotary_install",
            TotalsStep::RotaryPurge => "rotary_purge",
            TotalsStep::SystemComponentsVolume => "system_components_volume",
            TotalsStep::FittingsAllowance => "fittings_allowance",
            TotalsStep::EstimatedSystemVolume => "estimated_system_volume",
            TotalsStep::PurgeBeforeFittings => "purge_before_fittings",
            TotalsStep::PurgeFittingsAllowance => "purge_fittings_allowance",
            TotalsStep::TotalPurgeVolume => "total_purge_volume",
        }
    }

    /// 계산식 설명 (표시용).
    pub fn formula(&self) -> &'static str {
        match self {
            TotalsStep::PipeInstall => "Σ volume per metre × length",
            TotalsStep::PipePurge => "Σ pipe install × purge multiplier",
            TotalsStep::PurgeHosePurge => "hose install × purge multiplier",
            TotalsStep::DiaphragmInstall => "Table 3 install allowance",
            TotalsStep::DiaphragmPurge => "Table 3 purge allowance × 5",
            TotalsStep::RotaryInstall => "Table 3 install allowance",
            TotalsStep::RotaryPurge => "Table 3 purge allowance",
            TotalsStep::SystemComponentsVolume => "pipe install + meter install",
            TotalsStep::FittingsAllowance => "pipe install × 0.10",
            TotalsStep::EstimatedSystemVolume => "system components + fittings allowance",
            TotalsStep::PurgeBeforeFittings => "pipe purge + hose purge + meter purge",
            TotalsStep::PurgeFittingsAllowance => "pipe purge × 0.10 × 1.50",
            TotalsStep::TotalPurgeVolume => "purge before fittings + purge fittings allowance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub step: TotalsStep,
    pub value_m3: f64,
}

/// 구간별 체적.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentVolumes {
    pub size_id: String,
    pub length_m: f64,
    pub install_m3: f64,
    pub purge_m3: f64,
}

/// 설치 합계. 매 호출마다 입력에서 새로 유도된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationTotals {
    pub purge_multiplier: f64,
    pub multiplier_source: MultiplierSource,
    pub segments: Vec<SegmentVolumes>,
    pub purge_hose: Option<SegmentVolumes>,
    pub diaphragm_meter: MeterSelection,
    pub diaphragm: MeterAllowance,
    pub rotary_meter: MeterSelection,
    pub rotary: MeterAllowance,

    pub pipe_install: f64,
    pub pipe_purge: f64,
    pub purge_hose_install: f64,
    pub purge_hose_purge: f64,
    pub diaphragm_install: f64,
    pub diaphragm_purge: f64,
    pub rotary_install: f64,
    pub rotary_purge: f64,
    pub system_components_volume: f64,
    pub fittings_allowance: f64,
    pub estimated_system_volume: f64,
    pub purge_before_fittings: f64,
    pub purge_fittings_allowance: f64,
    pub total_purge_volume: f64,

    pub breakdown: Vec<BreakdownRow>,
    pub warnings: Vec<TotalsWarning>,
}

impl InstallationTotals {
    pub fn value(&self, step: TotalsStep) -> f64 {
        match step {
            TotalsStep::PipeInstall => self.pipe_install,
            TotalsStep::PipePurge => self.pipe_purge,
            TotalsStep::PurgeHosePurge => self.purge_hose_purge,
            TotalsStep::DiaphragmInstall => self.diaphragm_install,
            TotalsStep::DiaphragmPurge => self.diaphragm_purge,
            TotalsStep::RotaryInstall => self.rotary_install,
            TotalsStep::RotaryPurge => self.rotary_purge,
            TotalsStep::SystemComponentsVolume => self.system_components_volume,
            TotalsStep::FittingsAllowance => self.fittings_allowance,
            TotalsStep::EstimatedSystemVolume => self.estimated_system_volume,
            TotalsStep::PurgeBeforeFittings => self.purge_before_fittings,
            TotalsStep::PurgeFittingsAllowance => self.purge_fittings_allowance,
            TotalsStep::TotalPurgeVolume => self.total_purge_volume,
        }
    }
}

/// 재정의 배수를 검증한다. 잘못된 값은 이번 호출의 모든 배관/호스 계산에서 기본값으로 대체된다.
pub fn resolve_purge_multiplier(supplied: Option<f64>) -> (f64, MultiplierSource) {
    match supplied {
        None => (DEFAULT_PURGE_MULTIPLIER, MultiplierSource::Default),
        Some(m) if m.is_finite() && m > 0.0 => (m, MultiplierSource::Override),
        Some(m) => (DEFAULT_PURGE_MULTIPLIER, MultiplierSource::SubstitutedInvalid(m)),
    }
}

/// 전체 설치 합계를 계산한다.
pub fn compute_totals(
    tables: &ReferenceTables,
    input: &TotalsInput,
) -> Result<InstallationTotals, SizingError> {
    // 1
    let (multiplier, multiplier_source) = resolve_purge_multiplier(input.purge_multiplier);
    let mut warnings = Vec::new();
    if let MultiplierSource::SubstitutedInvalid(supplied) = multiplier_source {
        log::warn!("invalid purge multiplier {supplied}; using {multiplier}");
        warnings.push(TotalsWarning::PurgeMultiplierSubstituted {
            supplied,
            used: multiplier,
        });
    }

    // 2-3
    let segments = input
        .pipes
        .iter()
        .map(|seg| segment_volumes(tables, seg, multiplier))
        .collect::<Result<Vec<_>, _>>()?;
    let pipe_install: f64 = segments.iter().map(|s| s.install_m3).sum();
    let pipe_purge: f64 = segments.iter().map(|s| s.purge_m3).sum();

    // 4: 호스는 영구 설비가 아니므로 설치 체적은 0
    let purge_hose = input
        .purge_hose
        .as_ref()
        .map(|hose| segment_volumes(tables, hose, multiplier))
        .transpose()?;
    let purge_hose_purge = purge_hose.as_ref().map_or(0.0, |h| h.purge_m3);

    // 5
    let diaphragm = meter_allowance(tables, MeterKind::Diaphragm, &input.diaphragm)?;
    let rotary = meter_allowance(tables, MeterKind::Rotary, &input.rotary)?;
    let meter_install = diaphragm.install_m3 + rotary.install_m3;
    let meter_purge = diaphragm.purge_allowance_m3 + rotary.purge_allowance_m3;

    // 6-8
    let system_components_volume = pipe_install + meter_install;
    let fittings_allowance = pipe_install * FITTINGS_ALLOWANCE_RATIO;
    let estimated_system_volume = system_components_volume + fittings_allowance;

    // 9-11
    let purge_before_fittings = pipe_purge + purge_hose_purge + meter_purge;
    let purge_fittings_allowance = pipe_purge * FITTINGS_ALLOWANCE_RATIO * PURGE_FITTINGS_FACTOR;
    let total_purge_volume = purge_before_fittings + purge_fittings_allowance;

    let mut totals = InstallationTotals {
        purge_multiplier: multiplier,
        multiplier_source,
        segments,
        purge_hose,
        diaphragm_meter: input.diaphragm.clone(),
        diaphragm,
        rotary_meter: input.rotary.clone(),
        rotary,
        pipe_install,
        pipe_purge,
        purge_hose_install: 0.0,
        purge_hose_purge,
        diaphragm_install: diaphragm.install_m3,
        diaphragm_purge: diaphragm.purge_allowance_m3,
        rotary_install: rotary.install_m3,
        rotary_purge: rotary.purge_allowance_m3,
        system_components_volume,
        fittings_allowance,
        estimated_system_volume,
        purge_before_fittings,
        purge_fittings_allowance,
        total_purge_volume,
        breakdown: Vec::new(),
        warnings,
    };
    totals.breakdown = ALL_STEPS
        .iter()
        .map(|&step| BreakdownRow {
            step,
            value_m3: totals.value(step),
        })
        .collect();
    log::debug!(
        "totals: install={:.5} m3, system={:.5} m3, purge={:.5} m3",
        totals.system_components_volume,
        totals.estimated_system_volume,
        totals.total_purge_volume
    );
    Ok(totals)
}

const ALL_STEPS: [TotalsStep; 13] = [
    TotalsStep::PipeInstall,
    TotalsStep::PipePurge,
    TotalsStep::PurgeHosePurge,
    TotalsStep::DiaphragmInstall,
    TotalsStep::DiaphragmPurge,
    TotalsStep::RotaryInstall,
    TotalsStep::RotaryPurge,
    TotalsStep::SystemComponentsVolume,
    TotalsStep::FittingsAllowance,
    TotalsStep::EstimatedSystemVolume,
    TotalsStep::PurgeBeforeFittings,
    TotalsStep::PurgeFittingsAllowance,
    TotalsStep::TotalPurgeVolume,
];

fn segment_volumes(
    tables: &ReferenceTables,
    seg: &PipeSegment,
    multiplier: f64,
) -> Result<SegmentVolumes, SizingError> {
    let install_m3 = segment_volume::install_volume(tables, &seg.size_id, seg.length_m)?;
    let purge_m3 = segment_volume::purge_volume(tables, &seg.size_id, seg.length_m, multiplier)?;
    Ok(SegmentVolumes {
        size_id: seg.size_id.clone(),
        length_m: clamp_length(seg.length_m),
        install_m3,
        purge_m3,
    })
}
