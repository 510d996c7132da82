//! 합계와 시험 계획의 불변 성질.
use igem_up1_toolbox::gas::{
    compute_totals, derive_test_plan, hold_time_minutes, MeterSelection, PipeSegment,
    ReferenceTables, TestPlanInput, TotalsInput,
};
use proptest::prelude::*;

const PIPE_IDS: &[&str] = &["DN15", "DN25", "DN50", "DN100", "22mm Cu", "54mm Cu"];
const HOSE_IDS: &[&str] = &["Purge hose 20mm", "Purge hose 50mm"];

fn arb_segment() -> impl Strategy<Value = PipeSegment> {
    (prop::sample::select(PIPE_IDS), 0.0f64..500.0)
        .prop_map(|(id, length)| PipeSegment::new(id, length))
}

fn arb_meter(ids: &'static [&'static str]) -> impl Strategy<Value = MeterSelection> {
    prop_oneof![
        Just(MeterSelection::None),
        prop::sample::select(ids).prop_map(MeterSelection::parse),
    ]
}

fn arb_totals_input() -> impl Strategy<Value = TotalsInput> {
    (
        prop::collection::vec(arb_segment(), 0..6),
        prop::option::of(
            (prop::sample::select(HOSE_IDS), 0.0f64..50.0)
                .prop_map(|(id, length)| PipeSegment::new(id, length)),
        ),
        arb_meter(&["U6", "U16", "U40", "U160"]),
        arb_meter(&["DN50", "DN100", "DN300"]),
        prop::option::of(0.5f64..4.0),
    )
        .prop_map(|(pipes, purge_hose, diaphragm, rotary, purge_multiplier)| TotalsInput {
            pipes,
            purge_hose,
            diaphragm,
            rotary,
            purge_multiplier,
        })
}

/// 0, 음수, 비유한 값 등 쓸 수 없는 배수.
fn arb_bad_multiplier() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -100.0f64..0.0,
    ]
}

proptest! {
    #[test]
    fn totals_are_idempotent(input in arb_totals_input()) {
        let tables = ReferenceTables::builtin();
        let first = compute_totals(tables, &input).expect("catalogued ids");
        let second = compute_totals(tables, &input).expect("catalogued ids");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn longer_runs_never_shrink_volumes(
        input in arb_totals_input(),
        index in any::<prop::sample::Index>(),
        extra in 0.0f64..100.0,
    ) {
        prop_assume!(!input.pipes.is_empty());
        let tables = ReferenceTables::builtin();
        let before = compute_totals(tables, &input).expect("catalogued ids");

        let mut longer = input.clone();
        let i = index.index(longer.pipes.len());
        longer.pipes[i].length_m += extra;
        let after = compute_totals(tables, &longer).expect("catalogued ids");

        prop_assert!(after.pipe_install >= before.pipe_install);
        prop_assert!(after.pipe_purge >= before.pipe_purge);
        prop_assert!(after.total_purge_volume >= before.total_purge_volume);
    }

    #[test]
    fn unusable_multiplier_behaves_like_none(
        input in arb_totals_input(),
        bad in arb_bad_multiplier(),
    ) {
        let tables = ReferenceTables::builtin();
        let omitted = compute_totals(tables, &TotalsInput { purge_multiplier: None, ..input.clone() })
            .expect("catalogued ids");
        let substituted = compute_totals(tables, &TotalsInput { purge_multiplier: Some(bad), ..input })
            .expect("catalogued ids");

        prop_assert_eq!(omitted.pipe_purge, substituted.pipe_purge);
        prop_assert_eq!(omitted.purge_hose_purge, substituted.purge_hose_purge);
        prop_assert_eq!(omitted.total_purge_volume, substituted.total_purge_volume);
        prop_assert_eq!(substituted.warnings.len(), 1);
    }

    #[test]
    fn no_meter_adds_nothing(input in arb_totals_input()) {
        let tables = ReferenceTables::builtin();
        let bare = TotalsInput {
            diaphragm: MeterSelection::None,
            rotary: MeterSelection::None,
            ..input
        };
        let totals = compute_totals(tables, &bare).expect("catalogued ids");

        prop_assert_eq!(totals.diaphragm_install, 0.0);
        prop_assert_eq!(totals.diaphragm_purge, 0.0);
        prop_assert_eq!(totals.rotary_install, 0.0);
        prop_assert_eq!(totals.rotary_purge, 0.0);
        prop_assert_eq!(totals.system_components_volume, totals.pipe_install);
    }

    #[test]
    fn tightness_stays_below_nine_tenths_of_strength(
        design in 0.0f64..20_000.0,
        volume in 0.0f64..50.0,
    ) {
        let plan = derive_test_plan(&TestPlanInput {
            design_pressure_mbar: Some(design),
            system_volume_m3: Some(volume),
            ..Default::default()
        })
        .expect("pressure and volume given");
        prop_assert!(plan.tightness_test_pressure_mbar <= 0.9 * plan.strength_test_pressure_mbar + 1e-9);
        prop_assert!(plan.strength_test_pressure_mbar >= 1.5 * design - 1e-9);
    }

    #[test]
    fn hold_time_stays_in_bounds(volume in 0.0f64..1_000.0) {
        let minutes = hold_time_minutes(volume);
        prop_assert!((5.0..=180.0).contains(&minutes));
    }
}
