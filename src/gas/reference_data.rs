//! IGEM/UP/1 참조 테이블(Table 3, 4, 6, 12, F1/F3)과 적재 시 검증 로직.
//!
//! 원본 스프레드시트에서 여러 세대로 갈라진 테이블을 하나의 버전 세트로 합쳤다.
//! 잘못된 행(비유한 값, 음수 체적, 중복 ID)은 조회 시점이 아니라 적재 시점에 걸러진다.

use serde::Serialize;
use std::sync::OnceLock;

/// 참조 테이블 세트의 버전 스탬프.
pub const GAS_SIZING_DATA_VERSION: &str = "2024-06-01";

/// 배관/호스 퍼지 체적 = 설치 체적 × 이 값 (기본값).
pub const DEFAULT_PURGE_MULTIPLIER: f64 = 1.5;

/// 다이어프램 계량기 퍼지 허용량에 곱하는 고정 배수.
pub const DIAPHRAGM_PURGE_MULTIPLIER: f64 = 5.0;

/// Table 4 행의 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentCategory {
    Pipe,
    PurgeHose,
}

impl SegmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentCategory::Pipe => "pipe",
            SegmentCategory::PurgeHose => "purge-hose",
        }
    }
}

/// 배관 또는 퍼지 호스 1 m 당 내부 체적.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub category: SegmentCategory,
    pub volume_per_metre_m3: f64,
}

/// 계량기 종류. 다이어프램과 로터리는 별도 카탈로그를 가진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterKind {
    Diaphragm,
    Rotary,
}

impl MeterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeterKind::Diaphragm => "diaphragm",
            MeterKind::Rotary => "rotary",
        }
    }
}

/// Table 3 계량기 허용량 행.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterEntry {
    pub id: &'static str,
    pub install_volume_m3: f64,
    pub purge_volume_m3: f64,
}

/// Table 6 압력계 사양.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub gauge: &'static str,
    /// 측정 범위 [mbar]
    pub range: &'static str,
    /// 게이지 판독 배수(GRM)
    pub grm: f64,
    /// 최대 기밀시험 시간 [min]
    pub ttd_max_minutes: f64,
}

/// Table 12 대구경 배관 퍼지 계수.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurgeFactorEntry {
    pub dn: &'static str,
    pub f1: f64,
    pub f2: f64,
    /// 최대 퍼지 유량 계수 [m³/h]
    pub f3: f64,
    /// 게시된 모든 행에서 비어 있다.
    pub f4: Option<f64>,
}

/// 가스 종류별 F1(퍼지)·F3(운전) 계수. 가스/질소 퍼지 각각의 값을 가진다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasFactorEntry {
    pub family: &'static str,
    pub f1_gas: f64,
    pub f1_n2: f64,
    pub f3_gas: f64,
    pub f3_n2: f64,
}

/// 테이블 세트를 구성하는 개별 테이블 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableId {
    DiaphragmMeters,
    RotaryMeters,
    PipesAndHoses,
    Gauges,
    PurgeFactors,
    GasFactorsF1,
    GasFactorsF3,
}

impl TableId {
    pub const ALL: [TableId; 7] = [
        TableId::DiaphragmMeters,
        TableId::RotaryMeters,
        TableId::PipesAndHoses,
        TableId::Gauges,
        TableId::PurgeFactors,
        TableId::GasFactorsF1,
        TableId::GasFactorsF3,
    ];

    /// CLI 인자 등에 쓰는 짧은 키.
    pub fn key(&self) -> &'static str {
        match self {
            TableId::DiaphragmMeters => "diaphragm-meters",
            TableId::RotaryMeters => "rotary-meters",
            TableId::PipesAndHoses => "pipes",
            TableId::Gauges => "gauges",
            TableId::PurgeFactors => "purge-factors",
            TableId::GasFactorsF1 => "gas-f1",
            TableId::GasFactorsF3 => "gas-f3",
        }
    }

    pub fn from_key(key: &str) -> Option<TableId> {
        let key = key.trim();
        Self::ALL.into_iter().find(|t| t.key().eq_ignore_ascii_case(key))
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableId::DiaphragmMeters => "IGEM/UP/1 Table 3 — Diaphragm meter allowances",
            TableId::RotaryMeters => "IGEM/UP/1 Table 3 — Rotary meter allowances",
            TableId::PipesAndHoses => "IGEM/UP/1 Table 4 — Pipe and purge hose volumes",
            TableId::Gauges => "IGEM/UP/1 Table 6 — Pressure gauge selection",
            TableId::PurgeFactors => "IGEM/UP/1 Table 12 — Purge factors for large pipework",
            TableId::GasFactorsF1 => "IGEM/UP/1 gas factor F1 reference",
            TableId::GasFactorsF3 => "IGEM/UP/1 operating factor F3 reference",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            TableId::DiaphragmMeters => {
                "Installation and purge allowances for diaphragm meter sets. The purge allowance is multiplied by 5 when estimating purge gas volume."
            }
            TableId::RotaryMeters => {
                "Installation and purge allowances for rotary or turbine style meters."
            }
            TableId::PipesAndHoses => {
                "Internal volume per metre for carbon steel, copper and purge hose sections."
            }
            TableId::Gauges => {
                "Pressure gauges, ranges and reading multipliers for tightness testing."
            }
            TableId::PurgeFactors => {
                "Scaling factors for purge volumes and flow rates of large diameter pipe systems."
            }
            TableId::GasFactorsF1 => {
                "Gas factor F1 for fuel gases and nitrogen, used for purge volumes and detection times."
            }
            TableId::GasFactorsF3 => {
                "Operating factor F3 used alongside F1 when planning purges."
            }
        }
    }
}

/// 적재 시 거부된 행과 그 사유.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub table: TableId,
    pub id: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RejectReason {
    /// 비유한(NaN/inf) 값
    NonFinite(&'static str),
    /// 양수여야 하는 값이 0 이하
    NotPositive(&'static str),
    /// 음수 허용량
    Negative(&'static str),
    /// 같은 테이블 안에서 ID 중복(대소문자 무시)
    DuplicateId,
}

impl RejectReason {
    /// 문제가 된 필드 이름. ID 중복은 필드가 없다.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RejectReason::NonFinite(field)
            | RejectReason::NotPositive(field)
            | RejectReason::Negative(field) => Some(field),
            RejectReason::DuplicateId => None,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NonFinite(field) => write!(f, "non-finite {field}"),
            RejectReason::NotPositive(field) => write!(f, "{field} must be > 0"),
            RejectReason::Negative(field) => write!(f, "{field} must be >= 0"),
            RejectReason::DuplicateId => write!(f, "duplicate id"),
        }
    }
}

/// 검증 전 원시 테이블 묶음.
#[derive(Debug, Clone, Copy)]
pub struct RawTables<'a> {
    pub version: &'static str,
    pub segments: &'a [SegmentEntry],
    pub diaphragm_meters: &'a [MeterEntry],
    pub rotary_meters: &'a [MeterEntry],
    pub gauges: &'a [GaugeSpec],
    pub purge_factors: &'a [PurgeFactorEntry],
    pub gas_factors: &'a [GasFactorEntry],
}

/// 검증을 통과한 불변 참조 테이블 세트.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    version: &'static str,
    segments: Vec<SegmentEntry>,
    diaphragm_meters: Vec<MeterEntry>,
    rotary_meters: Vec<MeterEntry>,
    gauges: Vec<GaugeSpec>,
    purge_factors: Vec<PurgeFactorEntry>,
    gas_factors: Vec<GasFactorEntry>,
}

static BUILTIN: OnceLock<(ReferenceTables, Vec<RejectedRow>)> = OnceLock::new();

fn builtin_set() -> &'static (ReferenceTables, Vec<RejectedRow>) {
    BUILTIN.get_or_init(|| {
        let (tables, rejected) = ReferenceTables::validate(BUILTIN_RAW);
        for row in &rejected {
            log::warn!(
                "builtin table {} rejected row '{}': {}",
                row.table.key(),
                row.id,
                row.reason
            );
        }
        log::debug!(
            "loaded reference tables v{} ({} segments, {} diaphragm, {} rotary meters)",
            tables.version,
            tables.segments.len(),
            tables.diaphragm_meters.len(),
            tables.rotary_meters.len()
        );
        (tables, rejected)
    })
}

impl ReferenceTables {
    /// 내장 테이블을 한 번만 검증해 공유한다.
    pub fn builtin() -> &'static ReferenceTables {
        &builtin_set().0
    }

    /// 내장 테이블 적재 시 버려진 행.
    pub fn builtin_rejected() -> &'static [RejectedRow] {
        &builtin_set().1
    }

    /// 원시 행을 검증한다. 잘못된 행은 버리고 거부 목록으로 돌려준다.
    pub fn validate(raw: RawTables<'_>) -> (ReferenceTables, Vec<RejectedRow>) {
        let mut rejected = Vec::new();

        let segments = keep_valid(
            |_| TableId::PipesAndHoses,
            raw.segments,
            |s| s.id,
            |s| positive("volume_per_metre_m3", s.volume_per_metre_m3),
            &mut rejected,
        );
        let diaphragm_meters = keep_valid(
            |_| TableId::DiaphragmMeters,
            raw.diaphragm_meters,
            |m| m.id,
            check_meter,
            &mut rejected,
        );
        let rotary_meters = keep_valid(
            |_| TableId::RotaryMeters,
            raw.rotary_meters,
            |m| m.id,
            check_meter,
            &mut rejected,
        );
        let gauges = keep_valid(
            |_| TableId::Gauges,
            raw.gauges,
            |g| g.gauge,
            |g| {
                positive("grm", g.grm)?;
                positive("ttd_max_minutes", g.ttd_max_minutes)
            },
            &mut rejected,
        );
        let purge_factors = keep_valid(
            |_| TableId::PurgeFactors,
            raw.purge_factors,
            |p| p.dn,
            |p| {
                finite("f1", p.f1)?;
                finite("f2", p.f2)?;
                finite("f3", p.f3)?;
                match p.f4 {
                    Some(v) => finite("f4", v),
                    None => Ok(()),
                }
            },
            &mut rejected,
        );
        let gas_factors = keep_valid(
            gas_factor_table,
            raw.gas_factors,
            |g| g.family,
            |g| {
                positive("f1_gas", g.f1_gas)?;
                positive("f1_n2", g.f1_n2)?;
                positive("f3_gas", g.f3_gas)?;
                positive("f3_n2", g.f3_n2)
            },
            &mut rejected,
        );

        let tables = ReferenceTables {
            version: raw.version,
            segments,
            diaphragm_meters,
            rotary_meters,
            gauges,
            purge_factors,
            gas_factors,
        };
        (tables, rejected)
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn segments(&self) -> &[SegmentEntry] {
        &self.segments
    }

    pub fn meters(&self, kind: MeterKind) -> &[MeterEntry] {
        match kind {
            MeterKind::Diaphragm => &self.diaphragm_meters,
            MeterKind::Rotary => &self.rotary_meters,
        }
    }

    pub fn gauges(&self) -> &[GaugeSpec] {
        &self.gauges
    }

    pub fn purge_factors(&self) -> &[PurgeFactorEntry] {
        &self.purge_factors
    }

    pub fn gas_factors(&self) -> &[GasFactorEntry] {
        &self.gas_factors
    }

    /// 배관/호스 ID로 Table 4 행을 찾는다. 대소문자와 앞뒤 공백은 무시한다.
    pub fn segment(&self, id: &str) -> Option<&SegmentEntry> {
        self.segments.iter().find(|s| same_id(s.id, id))
    }

    pub fn meter(&self, kind: MeterKind, id: &str) -> Option<&MeterEntry> {
        self.meters(kind).iter().find(|m| same_id(m.id, id))
    }

    pub fn gauge(&self, name: &str) -> Option<&GaugeSpec> {
        self.gauges.iter().find(|g| same_id(g.gauge, name))
    }

    pub fn purge_factor(&self, dn: &str) -> Option<&PurgeFactorEntry> {
        self.purge_factors.iter().find(|p| same_id(p.dn, dn))
    }

    pub fn gas_factor(&self, family: &str) -> Option<&GasFactorEntry> {
        self.gas_factors.iter().find(|g| same_id(g.family, family))
    }
}

fn same_id(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn keep_valid<T: Clone>(
    table_of: impl Fn(&RejectReason) -> TableId,
    rows: &[T],
    id_of: impl Fn(&T) -> &'static str,
    check: impl Fn(&T) -> Result<(), RejectReason>,
    rejected: &mut Vec<RejectedRow>,
) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(rows.len());
    for row in rows {
        let id = id_of(row);
        let verdict = check(row).and_then(|_| {
            if kept.iter().any(|k| same_id(id_of(k), id)) {
                Err(RejectReason::DuplicateId)
            } else {
                Ok(())
            }
        });
        match verdict {
            Ok(()) => kept.push(row.clone()),
            Err(reason) => rejected.push(RejectedRow {
                table: table_of(&reason),
                id: id.to_string(),
                reason,
            }),
        }
    }
    kept
}

/// 실패한 가스 계수 필드가 속한 표(F1 또는 F3).
fn gas_factor_table(reason: &RejectReason) -> TableId {
    match reason.field() {
        Some(field) if field.starts_with("f3_") => TableId::GasFactorsF3,
        _ => TableId::GasFactorsF1,
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), RejectReason> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RejectReason::NonFinite(field))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), RejectReason> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(RejectReason::NotPositive(field))
    }
}

fn check_meter(m: &MeterEntry) -> Result<(), RejectReason> {
    finite("install_volume_m3", m.install_volume_m3)?;
    finite("purge_volume_m3", m.purge_volume_m3)?;
    if m.install_volume_m3 < 0.0 {
        return Err(RejectReason::Negative("install_volume_m3"));
    }
    if m.purge_volume_m3 < 0.0 {
        return Err(RejectReason::Negative("purge_volume_m3"));
    }
    Ok(())
}

const fn pipe(id: &'static str, label: &'static str, volume_per_metre_m3: f64) -> SegmentEntry {
    SegmentEntry {
        id,
        label,
        category: SegmentCategory::Pipe,
        volume_per_metre_m3,
    }
}

const fn hose(id: &'static str, label: &'static str, volume_per_metre_m3: f64) -> SegmentEntry {
    SegmentEntry {
        id,
        label,
        category: SegmentCategory::PurgeHose,
        volume_per_metre_m3,
    }
}

const fn meter(id: &'static str, install_volume_m3: f64, purge_volume_m3: f64) -> MeterEntry {
    MeterEntry {
        id,
        install_volume_m3,
        purge_volume_m3,
    }
}

const fn gauge(gauge: &'static str, range: &'static str, grm: f64, ttd_max_minutes: f64) -> GaugeSpec {
    GaugeSpec {
        gauge,
        range,
        grm,
        ttd_max_minutes,
    }
}

const fn t12(dn: &'static str, f1: f64, f2: f64, f3: f64) -> PurgeFactorEntry {
    PurgeFactorEntry {
        dn,
        f1,
        f2,
        f3,
        f4: None,
    }
}

const fn gas(family: &'static str, f1_gas: f64, f1_n2: f64, f3_gas: f64, f3_n2: f64) -> GasFactorEntry {
    GasFactorEntry {
        family,
        f1_gas,
        f1_n2,
        f3_gas,
        f3_n2,
    }
}

const BUILTIN_RAW: RawTables<'static> = RawTables {
    version: GAS_SIZING_DATA_VERSION,
    segments: SEGMENTS,
    diaphragm_meters: DIAPHRAGM_METERS,
    rotary_meters: ROTARY_METERS,
    gauges: GAUGES,
    purge_factors: PURGE_FACTORS,
    gas_factors: GAS_FACTORS,
};

// Table 4: 탄소강, 동관, 퍼지 호스
const SEGMENTS: &[SegmentEntry] = &[
    pipe("DN15", "DN15 carbon steel tube", 0.00024),
    pipe("DN20", "DN20 carbon steel tube", 0.00046),
    pipe("DN25", "DN25 carbon steel tube", 0.00064),
    pipe("DN32", "DN32 carbon steel tube", 0.0011),
    pipe("DN40", "DN40 carbon steel tube", 0.0015),
    pipe("DN50", "DN50 carbon steel tube", 0.0024),
    pipe("DN65", "DN65 carbon steel tube", 0.0038),
    pipe("DN80", "DN80 carbon steel tube", 0.0054),
    pipe("DN100", "DN100 carbon steel tube", 0.009),
    pipe("DN125", "DN125 carbon steel tube", 0.014),
    pipe("DN150", "DN150 carbon steel tube", 0.02),
    pipe("DN200", "DN200 carbon steel tube", 0.035),
    pipe("DN250", "DN250 carbon steel tube", 0.053),
    pipe("DN300", "DN300 carbon steel tube", 0.074),
    pipe("DN350", "DN350 carbon steel tube", 0.089),
    pipe("DN400", "DN400 carbon steel tube", 0.118),
    pipe("DN450", "DN450 carbon steel tube", 0.151),
    pipe("15mm Cu", "15 mm copper tube", 0.00014),
    pipe("22mm Cu", "22 mm copper tube", 0.00032),
    pipe("28mm Cu", "28 mm copper tube", 0.00054),
    pipe("35mm Cu", "35 mm copper tube", 0.00084),
    pipe("42mm Cu", "42 mm copper tube", 0.0012),
    pipe("54mm Cu", "54 mm copper tube", 0.0021),
    pipe("67mm Cu", "67 mm copper tube", 0.0033),
    hose("Purge hose 20mm", "20 mm purge hose", 0.00046),
    hose("Purge hose 25mm", "25 mm purge hose", 0.00064),
    hose("Purge hose 32mm", "32 mm purge hose", 0.0011),
    hose("Purge hose 40mm", "40 mm purge hose", 0.0015),
    hose("Purge hose 50mm", "50 mm purge hose", 0.0024),
    hose("Purge hose 65mm", "65 mm purge hose", 0.0038),
    hose("Purge hose 80mm", "80 mm purge hose", 0.0054),
    hose("Purge hose 100mm", "100 mm purge hose", 0.009),
    hose("Purge hose 125mm", "125 mm purge hose", 0.014),
    hose("Purge hose 150mm", "150 mm purge hose", 0.02),
    hose("Purge hose 200mm", "200 mm purge hose", 0.035),
];

// Table 3
const DIAPHRAGM_METERS: &[MeterEntry] = &[
    meter("U6", 0.008, 0.002),
    meter("U16", 0.025, 0.006),
    meter("U25", 0.037, 0.01),
    meter("U40", 0.067, 0.02),
    meter("U65", 0.1, 0.025),
    meter("U100", 0.182, 0.057),
    meter("U160", 0.304, 0.071),
    meter("U250", 0.471, 0.111),
    meter("U400", 0.752, 0.178),
];

const ROTARY_METERS: &[MeterEntry] = &[
    meter("DN32", 0.004, 0.001),
    meter("DN40", 0.006, 0.0015),
    meter("DN50", 0.009, 0.0023),
    meter("DN65", 0.014, 0.0035),
    meter("DN80", 0.021, 0.0053),
    meter("DN100", 0.032, 0.008),
    meter("DN150", 0.06, 0.015),
    meter("DN200", 0.1, 0.025),
    meter("DN250", 0.15, 0.038),
    meter("DN300", 0.21, 0.053),
    meter("DN350", 0.27, 0.068),
    meter("DN400", 0.34, 0.085),
    meter("DN450", 0.42, 0.105),
    meter("DN500", 0.5, 0.125),
];

// Table 6
const GAUGES: &[GaugeSpec] = &[
    gauge("Water SG", "0-120", 0.5, 30.0),
    gauge("High SG", "0-200", 1.0, 45.0),
    gauge("Elec 1 dp", "0-200", 0.5, 30.0),
    gauge("Elec 2 dp", "0-200", 0.1, 15.0),
    gauge("Elec 1dp", "0-2000", 0.5, 30.0),
    gauge("Elec 0dp", "0-20000", 5.0, 60.0),
    gauge("Mercury", "0-1000", 7.0, 60.0),
];

// Table 12
const PURGE_FACTORS: &[PurgeFactorEntry] = &[
    t12("DN20", 0.6, 0.01, 0.7),
    t12("DN25", 0.6, 0.02, 1.0),
    t12("DN32", 0.6, 0.03, 1.7),
    t12("DN40", 0.6, 0.05, 2.5),
    t12("DN50", 0.6, 0.08, 4.5),
    t12("DN80", 0.6, 0.19, 11.0),
    t12("DN100", 0.6, 0.33, 20.0),
    t12("DN125", 0.6, 0.5, 30.0),
    t12("DN150", 0.6, 0.7, 38.0),
    t12("DN200", 0.7, 1.32, 79.0),
    t12("DN250", 0.8, 2.35, 141.0),
    t12("DN300", 0.9, 3.6, 216.0),
    t12("DN400", 1.0, 7.9, 473.0),
    t12("DN450", 1.0, 9.6, 575.0),
    t12("DN600", 1.2, 21.0, 1230.0),
    t12("DN750", 1.5, 40.0, 2390.0),
    t12("DN900", 1.5, 57.0, 3440.0),
    t12("DN1200", 1.7, 116.0, 6960.0),
];

// F1 / F3 표를 가스 종류별 한 행으로 합쳤다.
const GAS_FACTORS: &[GasFactorEntry] = &[
    gas("Natural", 42.0, 67.0, 0.059, 0.094),
    gas("Propane", 102.0, 221.0, 0.059, 0.126),
    gas("Butane", 128.0, 305.0, 0.059, 0.134),
    gas("LPG/Air (SNG)", 45.0, 60.0, 0.059, 0.078),
    gas("LPG/Air (SMG)", 28.0, 33.0, 0.059, 0.069),
    gas("Coal Gas", 20.0, 31.0, 0.059, 0.09),
];
