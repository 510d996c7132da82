//! 대표 배관 일정표와 시험 조건에 대한 회귀 테스트.
use igem_up1_toolbox::gas::{
    compute_totals, derive_test_plan, hold_time_minutes, purge_duration_seconds,
    temperature_compensation, ttd_chain, MeterKind, MeterSelection, MissingInput, MultiplierSource,
    PipeSegment, PressureCategory, PressureSource, PressureTrend, ReferenceTables, SizingError,
    TestPlanError, TestPlanInput, TotalsInput, TotalsStep, TtdInput,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn tables() -> &'static ReferenceTables {
    ReferenceTables::builtin()
}

#[test]
fn single_dn50_run() {
    let totals = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("DN50", 10.0)],
            ..Default::default()
        },
    )
    .expect("DN50 is in Table 4");

    assert_close(totals.pipe_install, 0.024);
    assert_close(totals.pipe_purge, 0.036);
    assert_close(totals.fittings_allowance, 0.0024);
    assert_close(totals.estimated_system_volume, 0.0264);
    assert_close(totals.purge_fittings_allowance, 0.0054);
    assert_close(totals.total_purge_volume, 0.0414);
    assert_eq!(totals.multiplier_source, MultiplierSource::Default);
    assert!(totals.warnings.is_empty());
}

#[test]
fn breakdown_lists_every_step_in_order() {
    let totals = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("DN50", 10.0)],
            ..Default::default()
        },
    )
    .expect("totals");

    let steps: Vec<TotalsStep> = totals.breakdown.iter().map(|r| r.step).collect();
    assert_eq!(steps.len(), 13);
    assert_eq!(steps.first(), Some(&TotalsStep::PipeInstall));
    assert_eq!(steps.last(), Some(&TotalsStep::TotalPurgeVolume));
    for row in &totals.breakdown {
        assert_close(row.value_m3, totals.value(row.step));
    }
}

#[test]
fn meters_and_hose_feed_the_right_totals() {
    let totals = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("DN25", 20.0)],
            purge_hose: Some(PipeSegment::new("Purge hose 20mm", 5.0)),
            diaphragm: MeterSelection::parse("U6"),
            rotary: MeterSelection::parse("DN50"),
            purge_multiplier: None,
        },
    )
    .expect("all ids are catalogued");

    assert_close(totals.pipe_install, 0.0128);
    assert_close(totals.purge_hose_install, 0.0);
    assert_close(totals.purge_hose_purge, 0.00345);
    assert_close(totals.diaphragm_install, 0.008);
    // 다이어프램 퍼지 허용량은 5배
    assert_close(totals.diaphragm_purge, 0.01);
    assert_close(totals.rotary_install, 0.009);
    assert_close(totals.rotary_purge, 0.0023);
    assert_close(totals.system_components_volume, 0.0298);
    assert_close(totals.fittings_allowance, 0.00128);
    assert_close(totals.estimated_system_volume, 0.03108);
    assert_close(totals.purge_before_fittings, 0.03495);
    assert_close(totals.purge_fittings_allowance, 0.00288);
    assert_close(totals.total_purge_volume, 0.03783);
}

#[test]
fn override_multiplier_applies_to_pipes_and_hose() {
    let totals = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("DN100", 2.0)],
            purge_hose: Some(PipeSegment::new("Purge hose 20mm", 10.0)),
            purge_multiplier: Some(2.0),
            ..Default::default()
        },
    )
    .expect("totals");

    assert_eq!(totals.multiplier_source, MultiplierSource::Override);
    assert_close(totals.pipe_purge, 0.036);
    assert_close(totals.purge_hose_purge, 0.0092);
}

#[test]
fn invalid_multiplier_falls_back_with_warning() {
    let totals = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("DN50", 10.0)],
            purge_multiplier: Some(-3.0),
            ..Default::default()
        },
    )
    .expect("invalid multiplier is substituted, not fatal");

    assert_eq!(
        totals.multiplier_source,
        MultiplierSource::SubstitutedInvalid(-3.0)
    );
    assert_eq!(totals.warnings.len(), 1);
    assert_close(totals.pipe_purge, 0.036);
}

#[test]
fn unknown_pipe_size_fails_without_totals() {
    let err = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![
                PipeSegment::new("DN50", 10.0),
                PipeSegment::new("DN999", 1.0),
            ],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err, SizingError::UnknownSize("DN999".to_string()));
}

#[test]
fn unknown_meter_names_its_kind() {
    let err = compute_totals(
        tables(),
        &TotalsInput {
            rotary: MeterSelection::parse("U6"),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        SizingError::UnknownMeter {
            kind: MeterKind::Rotary,
            id: "U6".to_string()
        }
    );
}

#[test]
fn ids_match_without_case() {
    let upper = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("22mm Cu", 4.0)],
            ..Default::default()
        },
    )
    .expect("totals");
    let lower = compute_totals(
        tables(),
        &TotalsInput {
            pipes: vec![PipeSegment::new("  22MM cu ", 4.0)],
            ..Default::default()
        },
    )
    .expect("totals");
    assert_close(upper.pipe_install, 0.00128);
    assert_close(lower.pipe_install, upper.pipe_install);
}

#[test]
fn low_pressure_plan() {
    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(50.0),
        system_volume_m3: Some(0.05),
        ..Default::default()
    })
    .expect("plan");

    assert_eq!(plan.category, PressureCategory::Low);
    assert_eq!(plan.pressure_source, PressureSource::Design);
    assert_close(plan.strength_test_pressure_mbar, 150.0);
    assert_close(plan.tightness_test_pressure_mbar, 50.0);
    assert_close(plan.hold_time_minutes, 10.0);
    assert_eq!(plan.stabilisation_minutes, None);
    assert_eq!(plan.temperature_compensation, None);
}

#[test]
fn medium_pressure_plan() {
    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(200.0),
        system_volume_m3: Some(0.05),
        ..Default::default()
    })
    .expect("plan");

    assert_eq!(plan.category, PressureCategory::MediumHigh);
    assert_close(plan.strength_test_pressure_mbar, 1000.0);
    assert_close(plan.raw_tightness_pressure_mbar, 300.0);
    assert_close(plan.tightness_test_pressure_mbar, 300.0);
}

#[test]
fn threshold_of_75_mbar_is_still_low() {
    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(75.0),
        system_volume_m3: Some(0.01),
        ..Default::default()
    })
    .expect("plan");
    assert_eq!(plan.category, PressureCategory::Low);
    assert_close(plan.strength_test_pressure_mbar, 150.0);
    assert_close(plan.tightness_test_pressure_mbar, 75.0);
    assert_close(plan.hold_time_minutes, 5.0);
}

#[test]
fn tightness_is_capped_by_strength() {
    // 저압 바닥값 150 × 0.9 = 135 < 설계 압력 추종값
    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(0.0),
        system_volume_m3: Some(0.05),
        ..Default::default()
    })
    .expect("plan");
    assert_close(plan.tightness_test_pressure_mbar, 20.0);

    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(2000.0),
        system_volume_m3: Some(0.05),
        ..Default::default()
    })
    .expect("plan");
    assert_close(plan.strength_test_pressure_mbar, 3000.0);
    assert_close(plan.tightness_test_pressure_mbar, 2200.0);
    assert!(plan.tightness_test_pressure_mbar <= 0.9 * plan.strength_test_pressure_mbar);
}

#[test]
fn operating_pressure_stands_in_for_design() {
    let plan = derive_test_plan(&TestPlanInput {
        operating_pressure_mbar: Some(100.0),
        system_volume_m3: Some(0.2),
        ..Default::default()
    })
    .expect("plan");
    assert_eq!(plan.pressure_source, PressureSource::Operating);
    assert_eq!(plan.category, PressureCategory::MediumHigh);
    assert_close(plan.design_pressure_mbar, 100.0);
    assert_close(plan.hold_time_minutes, 23.0);
}

#[test]
fn missing_inputs_are_reported() {
    assert_eq!(
        derive_test_plan(&TestPlanInput {
            system_volume_m3: Some(0.05),
            ..Default::default()
        }),
        Err(TestPlanError::InsufficientInput(MissingInput::Pressure))
    );
    assert_eq!(
        derive_test_plan(&TestPlanInput {
            design_pressure_mbar: Some(21.0),
            ..Default::default()
        }),
        Err(TestPlanError::InsufficientInput(MissingInput::SystemVolume))
    );
}

#[test]
fn stabilisation_time_from_fill_rate() {
    let base = TestPlanInput {
        design_pressure_mbar: Some(21.0),
        system_volume_m3: Some(0.5),
        ..Default::default()
    };
    let plan = derive_test_plan(&TestPlanInput {
        fill_rate_m3_per_h: Some(1.0),
        ..base
    })
    .expect("plan");
    assert_eq!(plan.stabilisation_minutes, Some(35.0));

    let plan = derive_test_plan(&TestPlanInput {
        system_volume_m3: Some(0.05),
        fill_rate_m3_per_h: Some(1.0),
        ..base
    })
    .expect("plan");
    assert_eq!(plan.stabilisation_minutes, Some(10.0));

    let plan = derive_test_plan(&TestPlanInput {
        fill_rate_m3_per_h: Some(0.0),
        ..base
    })
    .expect("plan");
    assert_eq!(plan.stabilisation_minutes, None);
}

#[test]
fn warming_during_test_raises_pressure() {
    let plan = derive_test_plan(&TestPlanInput {
        design_pressure_mbar: Some(200.0),
        system_volume_m3: Some(0.05),
        start_temp_c: Some(10.0),
        end_temp_c: Some(15.0),
        ..Default::default()
    })
    .expect("plan");
    let comp = plan.temperature_compensation.expect("both temperatures given");
    assert_eq!(comp.trend, PressureTrend::Rise);
    assert_close(comp.delta_temp_c, 5.0);
    assert!((comp.delta_pressure_mbar - 5.30).abs() < 0.01);
}

#[test]
fn temperature_compensation_trends() {
    let fall = temperature_compensation(300.0, 15.0, 10.0).expect("valid start");
    assert_eq!(fall.trend, PressureTrend::Fall);
    assert!(fall.delta_pressure_mbar < 0.0);

    let steady = temperature_compensation(300.0, 12.0, 12.0).expect("valid start");
    assert_eq!(steady.trend, PressureTrend::Steady);
    assert_close(steady.delta_pressure_mbar, 0.0);

    assert_eq!(temperature_compensation(300.0, -273.15, 0.0), None);
}

#[test]
fn hold_time_bands() {
    assert_close(hold_time_minutes(0.0), 5.0);
    assert_close(hold_time_minutes(0.03), 5.0);
    assert_close(hold_time_minutes(0.031), 10.0);
    assert_close(hold_time_minutes(0.1), 10.0);
    assert_close(hold_time_minutes(0.2), 23.0);
    assert_close(hold_time_minutes(10.0), 180.0);
}

#[test]
fn purge_duration_and_ttd() {
    let t = tables();
    let secs = purge_duration_seconds(t, "DN50", 0.0414).expect("DN50 is in Table 12");
    assert_close(secs, 33.12);
    let secs = purge_duration_seconds(t, "dn100", 0.2).expect("DN100 is in Table 12");
    assert_close(secs, 36.0);
    assert_eq!(purge_duration_seconds(t, "DN15", 0.0414), None);

    let natural = t.gas_factor("natural").expect("Natural gas factors");
    let gauge = t.gauge("Water SG").expect("Water SG gauge");
    let chain = ttd_chain(&TtdInput {
        purge_volume_m3: 0.0414,
        gauge_grm: gauge.grm,
        f1_gas: natural.f1_gas,
        f1_n2: natural.f1_n2,
        room_volume_m3: Some(30.0),
    })
    .expect("finite inputs");
    assert_close(chain.base_gas, 0.8694);
    assert_close(chain.base_n2, 1.3869);
    assert_close(chain.existing_cd_gas, 0.8694 * 0.047);
    assert_close(chain.existing_cd_n2, 1.3869 * 0.047);
    assert_close(chain.in_type_a_gas.unwrap_or(f64::NAN), 0.8694 * 2.8 / 30.0);
    assert_close(chain.in_type_a_n2.unwrap_or(f64::NAN), 1.3869 * 2.8 / 30.0);

    let no_room = ttd_chain(&TtdInput {
        room_volume_m3: Some(0.0),
        ..TtdInput {
            purge_volume_m3: 0.0414,
            gauge_grm: gauge.grm,
            f1_gas: natural.f1_gas,
            f1_n2: natural.f1_n2,
            room_volume_m3: None,
        }
    })
    .expect("finite inputs");
    assert_eq!(no_room.in_type_a_gas, None);
    assert_eq!(no_room.in_type_a_n2, None);
}
