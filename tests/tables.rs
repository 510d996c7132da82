//! 참조 테이블 적재 검증.
use igem_up1_toolbox::gas::reference_data::{
    GasFactorEntry, GaugeSpec, MeterEntry, PurgeFactorEntry, RawTables, RejectReason,
    SegmentCategory, SegmentEntry, GAS_SIZING_DATA_VERSION,
};
use igem_up1_toolbox::gas::{MeterKind, ReferenceTables, TableId};

fn segment(id: &'static str, volume_per_metre_m3: f64) -> SegmentEntry {
    SegmentEntry {
        id,
        label: id,
        category: SegmentCategory::Pipe,
        volume_per_metre_m3,
    }
}

fn meter(id: &'static str, install_volume_m3: f64, purge_volume_m3: f64) -> MeterEntry {
    MeterEntry {
        id,
        install_volume_m3,
        purge_volume_m3,
    }
}

#[test]
fn builtin_set_is_versioned_and_complete() {
    let t = ReferenceTables::builtin();
    assert_eq!(t.version(), GAS_SIZING_DATA_VERSION);
    assert_eq!(t.version(), "2024-06-01");
    assert!(t.segment("DN50").is_some());
    assert!(t.segment("Purge hose 20mm").is_some());
    assert!(t.meter(MeterKind::Diaphragm, "U16").is_some());
    assert!(t.meter(MeterKind::Rotary, "DN50").is_some());
    assert!(t.meter(MeterKind::Diaphragm, "DN50").is_none());
    assert!(t.purge_factor("DN15").is_none());
    assert_eq!(t.gas_factor("LPG/Air (SNG)").map(|g| g.f1_gas), Some(45.0));
    assert_eq!(t.gauge("water sg").map(|g| g.ttd_max_minutes), Some(30.0));
}

#[test]
fn every_table_has_a_key_and_title() {
    for id in TableId::ALL {
        assert_eq!(TableId::from_key(id.key()), Some(id));
        assert!(!id.title().is_empty());
    }
}

#[test]
fn bad_rows_are_rejected_and_good_rows_kept() {
    let segments = [
        segment("DN50", 0.0024),
        segment("DN-nan", f64::NAN),
        segment("DN-zero", 0.0),
        segment("dn50", 0.0030),
    ];
    let diaphragm = [meter("U6", 0.008, 0.002), meter("U-neg", -0.001, 0.0)];
    let rotary = [meter("R1", 0.01, f64::INFINITY)];
    let gauges = [GaugeSpec {
        gauge: "Test gauge",
        range: "0-100",
        grm: 0.0,
        ttd_max_minutes: 10.0,
    }];
    let purge_factors = [PurgeFactorEntry {
        dn: "DN50",
        f1: 0.6,
        f2: 0.08,
        f3: 4.5,
        f4: Some(f64::NAN),
    }];
    let gas_factors = [GasFactorEntry {
        family: "Natural",
        f1_gas: 42.0,
        f1_n2: 67.0,
        f3_gas: 0.059,
        f3_n2: 0.094,
    }];

    let (tables, rejected) = ReferenceTables::validate(RawTables {
        version: "test",
        segments: &segments,
        diaphragm_meters: &diaphragm,
        rotary_meters: &rotary,
        gauges: &gauges,
        purge_factors: &purge_factors,
        gas_factors: &gas_factors,
    });

    let reasons: Vec<(TableId, &str, &RejectReason)> = rejected
        .iter()
        .map(|r| (r.table, r.id.as_str(), &r.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (
                TableId::PipesAndHoses,
                "DN-nan",
                &RejectReason::NonFinite("volume_per_metre_m3")
            ),
            (
                TableId::PipesAndHoses,
                "DN-zero",
                &RejectReason::NotPositive("volume_per_metre_m3")
            ),
            (TableId::PipesAndHoses, "dn50", &RejectReason::DuplicateId),
            (
                TableId::DiaphragmMeters,
                "U-neg",
                &RejectReason::Negative("install_volume_m3")
            ),
            (
                TableId::RotaryMeters,
                "R1",
                &RejectReason::NonFinite("purge_volume_m3")
            ),
            (TableId::Gauges, "Test gauge", &RejectReason::NotPositive("grm")),
            (TableId::PurgeFactors, "DN50", &RejectReason::NonFinite("f4")),
        ]
    );

    assert_eq!(tables.version(), "test");
    assert_eq!(tables.segments().len(), 1);
    // 먼저 나온 행이 남는다
    assert_eq!(
        tables.segment("DN50").map(|s| s.volume_per_metre_m3),
        Some(0.0024)
    );
    assert_eq!(tables.meters(MeterKind::Diaphragm).len(), 1);
    assert!(tables.meters(MeterKind::Rotary).is_empty());
    assert!(tables.gauges().is_empty());
    assert!(tables.purge_factors().is_empty());
    assert_eq!(tables.gas_factors().len(), 1);
}

#[test]
fn gas_factor_rejections_name_the_failing_table() {
    let gas = |family: &'static str, f1_gas: f64, f3_n2: f64| GasFactorEntry {
        family,
        f1_gas,
        f1_n2: 67.0,
        f3_gas: 0.059,
        f3_n2,
    };
    let gas_factors = [
        gas("Natural", 42.0, 0.0),
        gas("Propane", f64::NAN, 0.094),
        gas("Butane", 44.0, 0.094),
    ];

    let (tables, rejected) = ReferenceTables::validate(RawTables {
        version: "test",
        segments: &[],
        diaphragm_meters: &[],
        rotary_meters: &[],
        gauges: &[],
        purge_factors: &[],
        gas_factors: &gas_factors,
    });

    let reasons: Vec<(TableId, &str, &RejectReason)> = rejected
        .iter()
        .map(|r| (r.table, r.id.as_str(), &r.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (
                TableId::GasFactorsF3,
                "Natural",
                &RejectReason::NotPositive("f3_n2")
            ),
            (
                TableId::GasFactorsF1,
                "Propane",
                &RejectReason::NonFinite("f1_gas")
            ),
        ]
    );
    assert_eq!(tables.gas_factors().len(), 1);
    assert!(tables.gas_factor("Butane").is_some());
}
