//! 계산 결과를 사람이 읽는 텍스트 또는 JSON 으로 렌더링한다.
//!
//! 엔진 값은 항상 기준 단위(mbar, m³, m, °C)이며 여기서 설정의 표시 단위로 바꾼다.
//! 값이 없으면 "—" 를 찍는다.

use serde::Serialize;
use std::fmt::Write as _;

use crate::config::DefaultUnits;
use crate::gas::procedure::{ProcedureReport, PurgeSummary, TestPlanOutcome, VolumeSource};
use crate::gas::reference_data::{MeterKind, ReferenceTables, RejectedRow, TableId};
use crate::gas::test_plan::{
    MissingInput, PressureCategory, PressureSource, PressureTrend, TestPlanInput, TestPlanResult,
    LOW_PRESSURE_THRESHOLD_MBAR,
};
use crate::gas::totals::{InstallationTotals, MultiplierSource, TotalsWarning};
use crate::i18n::{keys, step_label, Translator};
use crate::units::{
    convert_temperature_diff, from_celsius, from_cubic_meter, from_mbar, from_metre,
    TemperatureUnit,
};

pub const UNAVAILABLE: &str = "—";

/// JSON 출력.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// 번역기와 표시 단위를 묶은 텍스트 렌더러.
pub struct TextRenderer<'a> {
    tr: &'a Translator,
    units: DefaultUnits,
}

impl<'a> TextRenderer<'a> {
    pub fn new(tr: &'a Translator, units: DefaultUnits) -> Self {
        Self { tr, units }
    }

    fn pressure(&self, mbar: f64) -> String {
        let unit = self.units.pressure;
        format!("{} {}", num(from_mbar(mbar, unit), 1), unit.symbol())
    }

    fn volume(&self, m3: f64) -> String {
        let unit = self.units.volume;
        format!("{} {}", num(from_cubic_meter(m3, unit), 4), unit.symbol())
    }

    fn length(&self, m: f64) -> String {
        let unit = self.units.length;
        format!("{} {}", num(from_metre(m, unit), 2), unit.symbol())
    }

    fn temperature(&self, c: f64) -> String {
        let unit = self.units.temperature;
        format!("{} {}", num(from_celsius(c, unit), 1), unit.symbol())
    }

    fn temperature_delta(&self, delta_c: f64) -> String {
        let unit = self.units.temperature;
        let shown = convert_temperature_diff(delta_c, TemperatureUnit::Celsius, unit);
        format!("{} {}", num(shown, 1), unit.symbol())
    }

    fn or_not_provided(&self, value: Option<String>) -> String {
        value.unwrap_or_else(|| self.tr.t(keys::NOT_PROVIDED))
    }

    /// 전체 절차 보고서.
    pub fn procedure(&self, report: &ProcedureReport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            self.tr.t(keys::DATA_VERSION),
            report.data_version
        );
        out.push('\n');
        out.push_str(&self.totals(&report.totals));
        out.push('\n');
        out.push_str(&self.test_plan(
            &report.test_plan_input,
            Some(report.system_volume_source),
            &report.test_plan,
        ));
        out.push('\n');
        out.push_str(&self.purge(&report.purge));
        out
    }

    pub fn totals(&self, totals: &InstallationTotals) -> String {
        let tr = self.tr;
        let mut out = String::new();
        let _ = writeln!(out, "{}", tr.t(keys::TOTALS_HEADING));

        let source = match totals.multiplier_source {
            MultiplierSource::Default => tr.t(keys::TOTALS_MULTIPLIER_DEFAULT),
            MultiplierSource::Override => tr.t(keys::TOTALS_MULTIPLIER_OVERRIDE),
            MultiplierSource::SubstitutedInvalid(supplied) => tr.tf(
                keys::TOTALS_MULTIPLIER_SUBSTITUTED,
                &[("supplied", supplied.to_string())],
            ),
        };
        let _ = writeln!(
            out,
            "{}: {} ({source})",
            tr.t(keys::TOTALS_MULTIPLIER),
            num(totals.purge_multiplier, 2)
        );

        let _ = writeln!(out, "\n{}", tr.t(keys::TOTALS_SEGMENTS));
        if totals.segments.is_empty() {
            let _ = writeln!(out, "  {}", tr.t(keys::TOTALS_NO_SEGMENTS));
        }
        for seg in &totals.segments {
            let _ = writeln!(
                out,
                "  {:<18} {:>10}  {} {:>12}  {} {:>12}",
                seg.size_id,
                self.length(seg.length_m),
                tr.t(keys::TOTALS_INSTALL),
                self.volume(seg.install_m3),
                tr.t(keys::TOTALS_PURGE),
                self.volume(seg.purge_m3)
            );
        }
        if let Some(hose) = &totals.purge_hose {
            let _ = writeln!(
                out,
                "{}: {} {}  {} {}",
                tr.t(keys::TOTALS_HOSE),
                hose.size_id,
                self.length(hose.length_m),
                tr.t(keys::TOTALS_PURGE),
                self.volume(hose.purge_m3)
            );
        }

        for (key, selection, allowance) in [
            (keys::TOTALS_DIAPHRAGM, &totals.diaphragm_meter, &totals.diaphragm),
            (keys::TOTALS_ROTARY, &totals.rotary_meter, &totals.rotary),
        ] {
            let _ = match selection.id() {
                Some(id) => writeln!(
                    out,
                    "{}: {id}  {} {}  {} {}",
                    tr.t(key),
                    tr.t(keys::TOTALS_INSTALL),
                    self.volume(allowance.install_m3),
                    tr.t(keys::TOTALS_PURGE),
                    self.volume(allowance.purge_allowance_m3)
                ),
                None => writeln!(out, "{}: {}", tr.t(key), tr.t(keys::TOTALS_NO_METER)),
            };
        }

        let _ = writeln!(out, "\n{}", tr.t(keys::SECTION_CALCULATIONS));
        for (i, row) in totals.breakdown.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {} [{}] = {}",
                i + 1,
                step_label(tr, row.step.key()),
                row.step.formula(),
                self.volume(row.value_m3)
            );
        }

        let _ = writeln!(out, "\n{}", tr.t(keys::SECTION_RESULTS));
        for (label, value) in [
            ("estimated_system_volume", totals.estimated_system_volume),
            ("total_purge_volume", totals.total_purge_volume),
        ] {
            let _ = writeln!(out, "  {}: {}", step_label(tr, label), self.volume(value));
        }

        if !totals.warnings.is_empty() {
            let _ = writeln!(out, "\n{}", tr.t(keys::WARNINGS));
            for warning in &totals.warnings {
                let _ = writeln!(out, "  - {}", self.warning(warning));
            }
        }
        out
    }

    fn warning(&self, warning: &TotalsWarning) -> String {
        match warning {
            TotalsWarning::PurgeMultiplierSubstituted { supplied, used } => self.tr.tf(
                keys::TOTALS_WARNING_MULTIPLIER,
                &[("supplied", supplied.to_string()), ("used", used.to_string())],
            ),
        }
    }

    /// 시험 계획. 입력 부족이면 무엇이 빠졌는지만 알려준다.
    pub fn test_plan(
        &self,
        input: &TestPlanInput,
        volume_source: Option<VolumeSource>,
        outcome: &TestPlanOutcome,
    ) -> String {
        let tr = self.tr;
        let mut out = String::new();
        let _ = writeln!(out, "{}", tr.t(keys::PLAN_HEADING));

        let plan = match outcome {
            TestPlanOutcome::Insufficient { missing } => {
                let key = match missing {
                    MissingInput::Pressure => keys::PLAN_INSUFFICIENT_PRESSURE,
                    MissingInput::SystemVolume => keys::PLAN_INSUFFICIENT_VOLUME,
                };
                let _ = writeln!(out, "{}", tr.t(key));
                return out;
            }
            TestPlanOutcome::Ready(plan) => plan,
        };

        let _ = writeln!(out, "{}", tr.t(keys::SECTION_INITIAL_DATA));
        let volume_note = match volume_source {
            Some(VolumeSource::Entered) => format!(" ({})", tr.t(keys::PLAN_VOLUME_ENTERED)),
            Some(VolumeSource::Estimated) => format!(" ({})", tr.t(keys::PLAN_VOLUME_ESTIMATED)),
            None => String::new(),
        };
        let fill_rate = input
            .fill_rate_m3_per_h
            .map(|r| format!("{} m³/h", num(r, 2)));
        let rows = [
            (
                keys::PLAN_ROW_DESIGN,
                self.or_not_provided(input.design_pressure_mbar.map(|p| self.pressure(p))),
            ),
            (
                keys::PLAN_ROW_OPERATING,
                self.or_not_provided(input.operating_pressure_mbar.map(|p| self.pressure(p))),
            ),
            (
                keys::PLAN_ROW_VOLUME,
                format!("{}{volume_note}", self.volume(plan.system_volume_m3)),
            ),
            (keys::PLAN_ROW_FILL_RATE, self.or_not_provided(fill_rate)),
            (
                keys::PLAN_ROW_START_TEMP,
                self.or_not_provided(input.start_temp_c.map(|t| self.temperature(t))),
            ),
            (
                keys::PLAN_ROW_END_TEMP,
                self.or_not_provided(input.end_temp_c.map(|t| self.temperature(t))),
            ),
        ];
        for (key, value) in rows {
            let _ = writeln!(out, "  {:<28} {value}", tr.t(key));
        }

        out.push('\n');
        for line in self.plan_narrative(plan) {
            let _ = writeln!(out, "{line}");
        }

        let _ = writeln!(out, "\n{}", tr.t(keys::SECTION_CALCULATIONS));
        for (i, step) in self.plan_steps(plan).iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", i + 1);
        }

        let _ = writeln!(out, "\n{}", tr.t(keys::SECTION_RESULTS));
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PLAN_RESULT_STRENGTH),
            self.pressure(plan.strength_test_pressure_mbar)
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PLAN_RESULT_TIGHTNESS),
            self.pressure(plan.tightness_test_pressure_mbar)
        );
        let _ = writeln!(
            out,
            "  {}: {} min",
            tr.t(keys::PLAN_RESULT_HOLD),
            num(plan.hold_time_minutes, 1)
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PLAN_RESULT_STABILISATION),
            opt(plan.stabilisation_minutes.map(|m| format!("{} min", num(m, 1))))
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PLAN_RESULT_TEMPERATURE),
            opt(plan
                .temperature_compensation
                .map(|c| format!("±{}", self.pressure(c.delta_pressure_mbar.abs()))))
        );
        out
    }

    /// 알고리즘 선택, 설계 압력 대체, 온도 영향 설명.
    pub fn plan_narrative(&self, plan: &TestPlanResult) -> Vec<String> {
        let tr = self.tr;
        let mut lines = Vec::new();
        if plan.pressure_source == PressureSource::Operating {
            lines.push(tr.tf(
                keys::PLAN_DESIGN_FALLBACK,
                &[("value", self.pressure(plan.design_pressure_mbar))],
            ));
        }
        let algorithm = match plan.category {
            PressureCategory::Low => keys::PLAN_ALGORITHM_LOW,
            PressureCategory::MediumHigh => keys::PLAN_ALGORITHM_HIGH,
        };
        lines.push(tr.tf(
            algorithm,
            &[
                ("design", self.pressure(plan.design_pressure_mbar)),
                ("threshold", self.pressure(LOW_PRESSURE_THRESHOLD_MBAR)),
            ],
        ));
        if let Some(comp) = plan.temperature_compensation {
            let args = [
                ("delta", self.temperature_delta(comp.delta_temp_c.abs())),
                ("dp", self.pressure(comp.delta_pressure_mbar.abs())),
            ];
            let line = match comp.trend {
                PressureTrend::Steady => tr.t(keys::PLAN_TEMP_STEADY),
                PressureTrend::Rise => tr.tf(keys::PLAN_TEMP_RISE, &args),
                PressureTrend::Fall => tr.tf(keys::PLAN_TEMP_FALL, &args),
            };
            lines.push(line);
        }
        lines
    }

    fn plan_steps(&self, plan: &TestPlanResult) -> Vec<String> {
        let tr = self.tr;
        let (floor, tightness_key) = match plan.category {
            PressureCategory::Low => (150.0, keys::PLAN_STEP_TIGHTNESS_LOW),
            PressureCategory::MediumHigh => (1000.0, keys::PLAN_STEP_TIGHTNESS_HIGH),
        };
        vec![
            tr.tf(
                keys::PLAN_STEP_CATEGORY,
                &[("threshold", self.pressure(LOW_PRESSURE_THRESHOLD_MBAR))],
            ),
            tr.tf(keys::PLAN_STEP_STRENGTH, &[("floor", self.pressure(floor))]),
            tr.t(tightness_key),
            tr.t(keys::PLAN_STEP_HOLD),
            if plan.stabilisation_minutes.is_some() {
                tr.t(keys::PLAN_STEP_STABILISATION)
            } else {
                tr.t(keys::PLAN_STEP_STABILISATION_MISSING)
            },
            if plan.temperature_compensation.is_some() {
                tr.t(keys::PLAN_STEP_TEMPERATURE)
            } else {
                tr.t(keys::PLAN_STEP_TEMPERATURE_MISSING)
            },
        ]
    }

    pub fn purge(&self, purge: &PurgeSummary) -> String {
        let tr = self.tr;
        let mut out = String::new();
        let _ = writeln!(out, "{}", tr.t(keys::PURGE_HEADING));
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PURGE_VOLUME),
            self.volume(purge.purge_volume_m3)
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PURGE_PIPE_SIZE),
            opt(purge.purge_pipe_size.clone())
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            tr.t(keys::PURGE_DURATION),
            opt(purge.purge_duration_seconds.map(duration))
        );

        match (&purge.gas_family, &purge.gas_factors) {
            (Some(family), Some(f)) => {
                let _ = writeln!(
                    out,
                    "  {}: {family}  F1 {} {} / {} {}  F3 {} {} / {} {}",
                    tr.t(keys::PURGE_GAS_FAMILY),
                    tr.t(keys::PURGE_GAS),
                    num(f.f1_gas, 2),
                    tr.t(keys::PURGE_NITROGEN),
                    num(f.f1_n2, 2),
                    tr.t(keys::PURGE_GAS),
                    num(f.f3_gas, 2),
                    tr.t(keys::PURGE_NITROGEN),
                    num(f.f3_n2, 2)
                );
            }
            (Some(family), None) => {
                let _ = writeln!(
                    out,
                    "  {}",
                    tr.tf(keys::PURGE_UNKNOWN_GAS, &[("name", family.clone())])
                );
            }
            (None, _) => {
                let _ = writeln!(out, "  {}: {UNAVAILABLE}", tr.t(keys::PURGE_GAS_FAMILY));
            }
        }

        match (&purge.gauge_name, &purge.gauge) {
            (_, Some(g)) => {
                let _ = writeln!(
                    out,
                    "  {}: {} ({} mbar)  GRM {}  max {} min",
                    tr.t(keys::PURGE_GAUGE),
                    g.gauge,
                    g.range,
                    num(g.grm, 2),
                    num(g.ttd_max_minutes, 0)
                );
            }
            (Some(name), None) => {
                let _ = writeln!(
                    out,
                    "  {}",
                    tr.tf(keys::PURGE_UNKNOWN_GAUGE, &[("name", name.clone())])
                );
            }
            (None, None) => {
                let _ = writeln!(out, "  {}: {UNAVAILABLE}", tr.t(keys::PURGE_GAUGE));
            }
        }

        let _ = writeln!(out, "\n{}", tr.t(keys::PURGE_TTD_HEADING));
        match &purge.ttd {
            Some(ttd) => {
                let gas = tr.t(keys::PURGE_GAS);
                let n2 = tr.t(keys::PURGE_NITROGEN);
                let rows = [
                    (keys::PURGE_TTD_BASE, Some(ttd.base_gas), Some(ttd.base_n2)),
                    (
                        keys::PURGE_TTD_EXISTING_CD,
                        Some(ttd.existing_cd_gas),
                        Some(ttd.existing_cd_n2),
                    ),
                    (keys::PURGE_TTD_TYPE_A, ttd.in_type_a_gas, ttd.in_type_a_n2),
                ];
                for (key, g, n) in rows {
                    let _ = writeln!(
                        out,
                        "  {}: {gas} {}, {n2} {}",
                        tr.t(key),
                        opt(g.map(|v| num(v, 2))),
                        opt(n.map(|v| num(v, 2)))
                    );
                }
            }
            None => {
                let _ = writeln!(out, "  {}", tr.t(keys::PURGE_TTD_MISSING));
            }
        }
        out
    }

    /// 참조 테이블 출력. `which` 가 없으면 전부.
    pub fn tables(&self, tables: &ReferenceTables, which: Option<TableId>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            self.tr.t(keys::DATA_VERSION),
            tables.version()
        );
        let selected: Vec<TableId> = match which {
            Some(id) => vec![id],
            None => TableId::ALL.to_vec(),
        };
        for id in selected {
            let _ = writeln!(out, "\n{} [{}]", id.title(), id.key());
            let _ = writeln!(out, "{}", id.summary());
            match id {
                TableId::DiaphragmMeters | TableId::RotaryMeters => {
                    let kind = if id == TableId::DiaphragmMeters {
                        MeterKind::Diaphragm
                    } else {
                        MeterKind::Rotary
                    };
                    let _ = writeln!(out, "  {:<10} {:>12} {:>12}", "Meter", "Install m³", "Purge m³");
                    for m in tables.meters(kind) {
                        let _ = writeln!(
                            out,
                            "  {:<10} {:>12.4} {:>12.4}",
                            m.id, m.install_volume_m3, m.purge_volume_m3
                        );
                    }
                }
                TableId::PipesAndHoses => {
                    let _ = writeln!(out, "  {:<20} {:<12} {:>14}", "Size", "Type", "m³ per m");
                    for s in tables.segments() {
                        let _ = writeln!(
                            out,
                            "  {:<20} {:<12} {:>14.5}",
                            s.id,
                            s.category.as_str(),
                            s.volume_per_metre_m3
                        );
                    }
                }
                TableId::Gauges => {
                    let _ = writeln!(
                        out,
                        "  {:<18} {:<12} {:>6} {:>10}",
                        "Gauge", "Range mbar", "GRM", "Max min"
                    );
                    for g in tables.gauges() {
                        let _ = writeln!(
                            out,
                            "  {:<18} {:<12} {:>6.2} {:>10.0}",
                            g.gauge, g.range, g.grm, g.ttd_max_minutes
                        );
                    }
                }
                TableId::PurgeFactors => {
                    let _ = writeln!(
                        out,
                        "  {:<8} {:>8} {:>8} {:>8} {:>8}",
                        "DN", "F1", "F2", "F3", "F4"
                    );
                    for p in tables.purge_factors() {
                        let _ = writeln!(
                            out,
                            "  {:<8} {:>8.3} {:>8.2} {:>8.1} {:>8}",
                            p.dn,
                            p.f1,
                            p.f2,
                            p.f3,
                            opt(p.f4.map(|v| num(v, 2)))
                        );
                    }
                }
                TableId::GasFactorsF1 | TableId::GasFactorsF3 => {
                    let label = if id == TableId::GasFactorsF1 { "F1" } else { "F3" };
                    let _ = writeln!(
                        out,
                        "  {:<16} {:>10} {:>10}",
                        "Gas",
                        format!("{label} gas"),
                        format!("{label} N2")
                    );
                    for g in tables.gas_factors() {
                        let (a, b) = if id == TableId::GasFactorsF1 {
                            (g.f1_gas, g.f1_n2)
                        } else {
                            (g.f3_gas, g.f3_n2)
                        };
                        let _ = writeln!(out, "  {:<16} {:>10.2} {:>10.2}", g.family, a, b);
                    }
                }
            }
        }
        out
    }

    pub fn rejected_rows(&self, rejected: &[RejectedRow]) -> String {
        let mut out = String::new();
        if rejected.is_empty() {
            return out;
        }
        let _ = writeln!(out, "{}", self.tr.t(keys::TABLES_REJECTED));
        for row in rejected {
            let _ = writeln!(out, "  {} '{}': {}", row.table.key(), row.id, row.reason);
        }
        out
    }
}

/// 고정 소수점 표기. 비유한 값은 "—".
pub fn num(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        UNAVAILABLE.to_string()
    }
}

fn opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn duration(seconds: f64) -> String {
    format!("{} s ({} min)", num(seconds, 0), num(seconds / 60.0, 1))
}
