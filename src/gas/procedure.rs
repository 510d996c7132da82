//! 폼 스냅샷 한 장을 전체 절차 보고서로 유도한다.
//!
//! 합계 단계의 조회 오류는 전체를 중단시키고, 시험 계획 입력 부족은 보고서 안에 담는다.

use serde::Serialize;

use super::error::SizingError;
use super::meter_allowance::MeterSelection;
use super::purge_helpers::{
    gas_factor_lookup, gauge_lookup, purge_duration_seconds, ttd_chain, GasFactors, TtdChain,
    TtdInput,
};
use super::reference_data::{GaugeSpec, ReferenceTables};
use super::segment_volume::PipeSegment;
use super::test_plan::{derive_test_plan, MissingInput, TestPlanError, TestPlanInput, TestPlanResult};
use super::totals::{compute_totals, InstallationTotals, TotalsInput};
use crate::form::{parse_length, parse_number, FormSnapshot};

/// 시험 계획에 쓴 시스템 체적의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeSource {
    /// 폼에 직접 입력된 값
    Entered,
    /// 합계 계산의 추정 시스템 체적
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TestPlanOutcome {
    Ready(TestPlanResult),
    Insufficient { missing: MissingInput },
}

impl TestPlanOutcome {
    pub fn result(&self) -> Option<&TestPlanResult> {
        match self {
            TestPlanOutcome::Ready(r) => Some(r),
            TestPlanOutcome::Insufficient { .. } => None,
        }
    }
}

/// 퍼지 시간, 가스 계수, 압력계, TTD 묶음. 입력이 없거나 조회에 실패한 항목은 `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurgeSummary {
    pub purge_volume_m3: f64,
    pub purge_pipe_size: Option<String>,
    pub purge_duration_seconds: Option<f64>,
    pub gas_family: Option<String>,
    pub gas_factors: Option<GasFactors>,
    pub gauge_name: Option<String>,
    pub gauge: Option<GaugeSpec>,
    pub room_volume_m3: Option<f64>,
    pub ttd: Option<TtdChain>,
}

/// 퍼지 보조 계산 입력. 이름은 참조표 ID 그대로다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurgeRequest {
    pub purge_pipe_size: Option<String>,
    pub gas_family: Option<String>,
    pub gauge: Option<String>,
    pub room_volume_m3: Option<f64>,
}

/// 폼 한 장에 대한 전체 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureReport {
    pub data_version: &'static str,
    pub totals: InstallationTotals,
    pub test_plan_input: TestPlanInput,
    pub system_volume_source: VolumeSource,
    pub test_plan: TestPlanOutcome,
    pub purge: PurgeSummary,
}

/// 폼의 배관/계량기 필드를 합계 입력으로 바꾼다. 크기가 빈 줄은 건너뛴다.
pub fn totals_input(form: &FormSnapshot) -> TotalsInput {
    let pipes = form
        .pipes
        .iter()
        .filter(|row| !row.size.trim().is_empty())
        .map(|row| PipeSegment::new(row.size.trim(), parse_length(&row.length)))
        .collect();
    let purge_hose = non_blank(&form.purge_hose_size)
        .map(|size| PipeSegment::new(size, parse_length(&form.purge_hose_length)));
    TotalsInput {
        pipes,
        purge_hose,
        diaphragm: MeterSelection::parse(&form.diaphragm_meter),
        rotary: MeterSelection::parse(&form.rotary_meter),
        purge_multiplier: multiplier_entry(&form.purge_multiplier),
    }
}

/// 퍼지 배수 필드. 빈 칸은 기본값, 숫자가 아닌 값은 NaN 으로 넘겨 대체 경고를 남긴다.
fn multiplier_entry(text: &str) -> Option<f64> {
    non_blank(text).map(|t| parse_number(&t).unwrap_or(f64::NAN))
}

/// 시험 계획을 유도하되 입력 부족은 결과 상태로 담는다.
pub fn plan_outcome(input: &TestPlanInput) -> TestPlanOutcome {
    match derive_test_plan(input) {
        Ok(result) => TestPlanOutcome::Ready(result),
        Err(TestPlanError::InsufficientInput(missing)) => {
            log::debug!("test plan skipped: missing {missing:?}");
            TestPlanOutcome::Insufficient { missing }
        }
    }
}

/// 폼 스냅샷을 평가한다.
pub fn evaluate(
    tables: &ReferenceTables,
    form: &FormSnapshot,
) -> Result<ProcedureReport, SizingError> {
    let totals = compute_totals(tables, &totals_input(form))?;

    let (system_volume, system_volume_source) = match parse_number(&form.volume) {
        Some(v) => (v, VolumeSource::Entered),
        None => (totals.estimated_system_volume, VolumeSource::Estimated),
    };
    let test_plan_input = TestPlanInput {
        design_pressure_mbar: parse_number(&form.design_pressure),
        operating_pressure_mbar: parse_number(&form.operating_pressure),
        system_volume_m3: Some(system_volume),
        fill_rate_m3_per_h: parse_number(&form.test_fill_rate),
        start_temp_c: parse_number(&form.test_temp_start),
        end_temp_c: parse_number(&form.test_temp_end),
    };
    let test_plan = plan_outcome(&test_plan_input);

    let purge = summarize_purge(
        tables,
        totals.total_purge_volume,
        &PurgeRequest {
            purge_pipe_size: non_blank(&form.purge_pipe_size),
            gas_family: non_blank(&form.gas_type),
            gauge: non_blank(&form.gauge),
            room_volume_m3: parse_number(&form.room_volume),
        },
    );

    Ok(ProcedureReport {
        data_version: tables.version(),
        totals,
        test_plan_input,
        system_volume_source,
        test_plan,
        purge,
    })
}

/// 총 퍼지 체적에 대해 퍼지 보조 계산을 모두 돌린다.
pub fn summarize_purge(
    tables: &ReferenceTables,
    purge_volume_m3: f64,
    request: &PurgeRequest,
) -> PurgeSummary {
    let gas_factors = request
        .gas_family
        .as_deref()
        .and_then(|family| gas_factor_lookup(tables, family));
    if let (Some(family), None) = (&request.gas_family, &gas_factors) {
        log::warn!("unknown gas family '{family}'");
    }
    let gauge = request
        .gauge
        .as_deref()
        .and_then(|name| gauge_lookup(tables, name).cloned());
    if let (Some(name), None) = (&request.gauge, &gauge) {
        log::warn!("unknown gauge '{name}'");
    }
    let purge_duration_seconds = request
        .purge_pipe_size
        .as_deref()
        .and_then(|size| purge_duration_seconds(tables, size, purge_volume_m3));
    let ttd = match (&gauge, &gas_factors) {
        (Some(g), Some(f)) => ttd_chain(&TtdInput {
            purge_volume_m3,
            gauge_grm: g.grm,
            f1_gas: f.f1_gas,
            f1_n2: f.f1_n2,
            room_volume_m3: request.room_volume_m3,
        }),
        _ => None,
    };
    PurgeSummary {
        purge_volume_m3,
        purge_pipe_size: request.purge_pipe_size.clone(),
        purge_duration_seconds,
        gas_family: request.gas_family.clone(),
        gas_factors,
        gauge_name: request.gauge.clone(),
        gauge,
        room_volume_m3: request.room_volume_m3,
        ttd,
    }
}

pub(crate) fn non_blank(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
