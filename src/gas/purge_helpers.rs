//! 퍼지 시간, 가스 계수, 압력계 조회, TTD(time to detect) 계산 체인.

use super::reference_data::{GaugeSpec, ReferenceTables};
use serde::Serialize;

/// 기존 CD 구역 TTD 계수.
pub const EXISTING_CD_FACTOR: f64 = 0.047;
/// Type A 실내 구역 TTD 계수 (실 체적으로 나눈다).
pub const TYPE_A_ROOM_FACTOR: f64 = 2.8;

/// Table 12 f3(최대 유량 계수)로 퍼지 시간 [s] 을 구한다. `3600 × V / f3`.
///
/// 크기가 Table 12에 없거나 f3 ≤ 0, 체적이 비유한이면 `None`.
pub fn purge_duration_seconds(
    tables: &ReferenceTables,
    pipe_size_id: &str,
    total_purge_volume_m3: f64,
) -> Option<f64> {
    let f3 = tables.purge_factor(pipe_size_id)?.f3;
    if !f3.is_finite() || f3 <= 0.0 || !total_purge_volume_m3.is_finite() {
        return None;
    }
    Some(3600.0 * total_purge_volume_m3 / f3)
}

/// 가스 종류별 F1/F3 계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasFactors {
    pub f1_gas: f64,
    pub f1_n2: f64,
    pub f3_gas: f64,
    pub f3_n2: f64,
}

/// 가스 종류(대소문자 무시)로 계수를 찾는다. 모르는 종류는 오류가 아니라 `None`.
pub fn gas_factor_lookup(tables: &ReferenceTables, gas_family: &str) -> Option<GasFactors> {
    tables.gas_factor(gas_family).map(|g| GasFactors {
        f1_gas: g.f1_gas,
        f1_n2: g.f1_n2,
        f3_gas: g.f3_gas,
        f3_n2: g.f3_n2,
    })
}

pub fn gauge_lookup<'a>(tables: &'a ReferenceTables, gauge_name: &str) -> Option<&'a GaugeSpec> {
    tables.gauge(gauge_name)
}

/// TTD 체인 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtdInput {
    pub purge_volume_m3: f64,
    pub gauge_grm: f64,
    pub f1_gas: f64,
    pub f1_n2: f64,
    pub room_volume_m3: Option<f64>,
}

/// TTD 6단계 결과. 각 단계를 따로 표시할 수 있게 모두 노출한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TtdChain {
    pub base_gas: f64,
    pub base_n2: f64,
    pub existing_cd_gas: f64,
    pub existing_cd_n2: f64,
    /// 실 체적이 0보다 클 때만
    pub in_type_a_gas: Option<f64>,
    pub in_type_a_n2: Option<f64>,
}

/// `base = F1 × GRM × V`, `existing CD = base × 0.047`, `type A = base × 2.8 / room`.
pub fn ttd_chain(input: &TtdInput) -> Option<TtdChain> {
    let inputs = [
        input.purge_volume_m3,
        input.gauge_grm,
        input.f1_gas,
        input.f1_n2,
    ];
    if inputs.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let base_gas = input.f1_gas * input.gauge_grm * input.purge_volume_m3;
    let base_n2 = input.f1_n2 * input.gauge_grm * input.purge_volume_m3;
    let room = input
        .room_volume_m3
        .filter(|r| r.is_finite() && *r > 0.0);
    Some(TtdChain {
        base_gas,
        base_n2,
        existing_cd_gas: base_gas * EXISTING_CD_FACTOR,
        existing_cd_n2: base_n2 * EXISTING_CD_FACTOR,
        in_type_a_gas: room.map(|r| base_gas * TYPE_A_ROOM_FACTOR / r),
        in_type_a_n2: room.map(|r| base_n2 * TYPE_A_ROOM_FACTOR / r),
    })
}
