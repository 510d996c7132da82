//! 폼 스냅샷 전체 평가.
use igem_up1_toolbox::form::{FormSnapshot, PipeRow};
use igem_up1_toolbox::gas::{
    evaluate, gauge_lookup, summarize_purge, MissingInput, MultiplierSource, PressureSource,
    PurgeRequest, ReferenceTables, SizingError, TestPlanOutcome, TotalsWarning, VolumeSource,
};
use serde_json::json;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn dn50_form() -> FormSnapshot {
    FormSnapshot {
        pipes: vec![PipeRow::new("DN50", "10"), PipeRow::new("", "12")],
        design_pressure: "50".into(),
        gas_type: "Natural".into(),
        gauge: "Water SG".into(),
        room_volume: "30".into(),
        purge_pipe_size: "DN50".into(),
        ..Default::default()
    }
}

#[test]
fn estimated_volume_feeds_the_test_plan() {
    let report = evaluate(ReferenceTables::builtin(), &dn50_form()).expect("evaluate");

    assert_eq!(report.data_version, "2024-06-01");
    // 크기가 빈 줄은 무시된다
    assert_eq!(report.totals.segments.len(), 1);
    assert_close(report.totals.estimated_system_volume, 0.0264);
    assert_eq!(report.system_volume_source, VolumeSource::Estimated);
    assert_close(
        report.test_plan_input.system_volume_m3.unwrap_or(f64::NAN),
        0.0264,
    );

    let plan = report.test_plan.result().expect("plan is ready");
    assert_close(plan.strength_test_pressure_mbar, 150.0);
    assert_close(plan.tightness_test_pressure_mbar, 50.0);
    assert_close(plan.hold_time_minutes, 5.0);

    let purge = &report.purge;
    assert_close(purge.purge_volume_m3, 0.0414);
    assert_close(purge.purge_duration_seconds.unwrap_or(f64::NAN), 33.12);
    let ttd = purge.ttd.expect("gas and gauge known");
    assert_close(ttd.base_gas, 0.8694);
    assert!(ttd.in_type_a_gas.is_some());
}

#[test]
fn entered_volume_wins_over_estimate() {
    let form = FormSnapshot {
        volume: "0.2".into(),
        ..dn50_form()
    };
    let report = evaluate(ReferenceTables::builtin(), &form).expect("evaluate");

    assert_eq!(report.system_volume_source, VolumeSource::Entered);
    let plan = report.test_plan.result().expect("plan is ready");
    assert_close(plan.system_volume_m3, 0.2);
    assert_close(plan.hold_time_minutes, 23.0);
    // 합계는 입력 체적과 무관하게 계산된다
    assert_close(report.totals.estimated_system_volume, 0.0264);
}

#[test]
fn operating_pressure_is_used_when_design_is_blank() {
    let form = FormSnapshot {
        design_pressure: " ".into(),
        operating_pressure: "21".into(),
        ..dn50_form()
    };
    let report = evaluate(ReferenceTables::builtin(), &form).expect("evaluate");
    let plan = report.test_plan.result().expect("plan is ready");
    assert_eq!(plan.pressure_source, PressureSource::Operating);
    assert_close(plan.tightness_test_pressure_mbar, 21.0);
}

#[test]
fn missing_pressure_still_yields_totals() {
    let form = FormSnapshot {
        design_pressure: String::new(),
        ..dn50_form()
    };
    let report = evaluate(ReferenceTables::builtin(), &form).expect("evaluate");

    assert_eq!(
        report.test_plan,
        TestPlanOutcome::Insufficient {
            missing: MissingInput::Pressure
        }
    );
    assert_close(report.totals.pipe_install, 0.024);

    let value = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(
        value["test_plan"],
        json!({ "status": "insufficient", "missing": "pressure" })
    );
}

#[test]
fn unknown_size_fails_the_whole_form() {
    let mut form = dn50_form();
    form.pipes.push(PipeRow::new("DN999", "3"));
    let err = evaluate(ReferenceTables::builtin(), &form).unwrap_err();
    assert_eq!(err, SizingError::UnknownSize("DN999".to_string()));
}

#[test]
fn blank_and_sentinel_meters_are_no_meter() {
    let form = FormSnapshot {
        diaphragm_meter: "No Meter".into(),
        rotary_meter: String::new(),
        ..dn50_form()
    };
    let report = evaluate(ReferenceTables::builtin(), &form).expect("evaluate");
    assert_close(report.totals.diaphragm_install, 0.0);
    assert_close(report.totals.rotary_purge, 0.0);
}

#[test]
fn unknown_purge_lookups_leave_gaps() {
    let t = ReferenceTables::builtin();
    let summary = summarize_purge(
        t,
        0.0414,
        &PurgeRequest {
            purge_pipe_size: Some("DN15".into()),
            gas_family: Some("Hydrogen".into()),
            gauge: Some("Water SG".into()),
            room_volume_m3: None,
        },
    );
    assert_eq!(summary.purge_duration_seconds, None);
    assert_eq!(summary.gas_factors, None);
    assert!(summary.gauge.is_some());
    assert_eq!(summary.ttd, None);

    let empty = summarize_purge(t, 0.0414, &PurgeRequest::default());
    assert_eq!(empty.purge_duration_seconds, None);
    assert_eq!(empty.gauge, None);
    assert_eq!(empty.ttd, None);
}

#[test]
fn unreadable_multiplier_falls_back_with_a_warning() {
    for text in ["abc", "NaN", " inf "] {
        let form = FormSnapshot {
            purge_multiplier: text.into(),
            ..dn50_form()
        };
        let totals = evaluate(ReferenceTables::builtin(), &form)
            .expect("evaluate")
            .totals;

        let substituted = matches!(
            totals.multiplier_source,
            MultiplierSource::SubstitutedInvalid(v) if v.is_nan()
        );
        assert!(substituted, "{text}: {:?}", totals.multiplier_source);
        assert_eq!(totals.warnings.len(), 1, "{text}");
        assert!(matches!(
            totals.warnings[0],
            TotalsWarning::PurgeMultiplierSubstituted { used, .. } if used == 1.5
        ));
        assert_close(totals.purge_multiplier, 1.5);
        assert_close(totals.pipe_purge, 0.036);
    }

    // 빈 칸은 경고 없이 기본값
    let blank = FormSnapshot {
        purge_multiplier: "  ".into(),
        ..dn50_form()
    };
    let totals = evaluate(ReferenceTables::builtin(), &blank)
        .expect("evaluate")
        .totals;
    assert_eq!(totals.multiplier_source, MultiplierSource::Default);
    assert!(totals.warnings.is_empty());
}

#[test]
fn unknown_gauge_is_unavailable() {
    let t = ReferenceTables::builtin();
    assert!(gauge_lookup(t, "Bourdon").is_none());

    let summary = summarize_purge(
        t,
        0.0414,
        &PurgeRequest {
            purge_pipe_size: Some("DN50".into()),
            gas_family: Some("Natural".into()),
            gauge: Some("Bourdon".into()),
            room_volume_m3: Some(30.0),
        },
    );
    assert_eq!(summary.gauge_name.as_deref(), Some("Bourdon"));
    assert_eq!(summary.gauge, None);
    assert_eq!(summary.ttd, None);
    assert!(summary.gas_factors.is_some());
    assert_close(summary.purge_duration_seconds.unwrap_or(f64::NAN), 33.12);
}
