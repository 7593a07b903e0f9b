//! Composed pipelines: spice, stravidium fibers, plastanium.

use refinery_core::{
    calculator::{CalcParams, Calculator},
    config::RefineryConfig,
    error::CalcError,
    report::RunReport,
    run::Calculation,
};

fn params(spice: u32, chem: u32, large: u32, landsraad: bool) -> CalcParams {
    CalcParams {
        spice_refineries: spice,
        chem_refineries:  chem,
        large_refineries: large,
        landsraad,
    }
}

/// 25 000 sand, 4 players, one refinery.
#[test]
fn spice_report_splits_melange() {
    let config = RefineryConfig::standard();
    let report = Calculator::new(&config)
        .spice(25_000.0, 4, &CalcParams::default())
        .unwrap();

    assert_eq!(report.conversion.output_total, 500.0);
    assert_eq!(report.allocation.per_player, 125);
    assert_eq!(report.allocation.remainder, 0.0);

    let text = report.to_string();
    assert!(text.contains("Total Melange: 500.00"), "{text}");
    assert!(text.contains("Melange per Player (floored): 125"), "{text}");
    assert!(text.contains("Total Water: 187,500.00"), "{text}");
    assert!(text.contains("Processing Time (parallel): 1h 52m 30s"), "{text}");
}

#[test]
fn landsraad_never_touches_spice() {
    let config = RefineryConfig::standard();
    let calc = Calculator::new(&config);
    let plain = calc.spice(25_000.0, 3, &params(2, 1, 1, false)).unwrap();
    let discounted = calc.spice(25_000.0, 3, &params(2, 1, 1, true)).unwrap();
    assert_eq!(plain, discounted);
}

#[test]
fn stravidium_splits_fibers_and_raw_titanium() {
    let config = RefineryConfig::standard();
    let calc = Calculator::new(&config);

    let report = calc.stravidium(100.0, 0.0, 2, &CalcParams::default()).unwrap();
    assert_eq!(report.fibers.output_units, 33);
    assert_eq!(report.fibers.raw_leftover, 1.0);
    assert_eq!((report.fiber_split.per_player, report.fiber_split.remainder), (16, 1));
    assert!(report.titanium_split.is_none());
    assert!(report.landsraad.is_none());

    let report = calc.stravidium(100.0, 50.0, 3, &CalcParams::default()).unwrap();
    let ti = report.titanium_split.expect("titanium split");
    assert_eq!(ti.per_player, 16);
    assert_eq!(ti.remainder, 2.0);
}

#[test]
fn stravidium_with_landsraad_yields_more_fibers() {
    let config = RefineryConfig::standard();
    let report = Calculator::new(&config)
        .stravidium(900.0, 0.0, 4, &params(1, 2, 1, true))
        .unwrap();

    assert_eq!(report.fibers.output_units, 400);
    assert_eq!(report.fiber_split.per_player, 100);
    assert_eq!(report.fibers.time_per_unit_sec, 2_000.0);
    assert!(report.to_string().contains("Landsraad discount: ON (-25% crafting costs)"));
}

/// 900 mass -> 300 fibers; 1000 titanium binds at 250 pieces.
#[test]
fn plastanium_chains_both_stages() {
    let config = RefineryConfig::standard();
    let report = Calculator::new(&config)
        .plastanium(900.0, 1_000.0, 3, &params(1, 1, 2, false))
        .unwrap();

    assert_eq!(report.fibers.output_units, 300);
    assert_eq!(report.craft.output_units, 250);
    assert_eq!(report.craft.primary_leftover, 50.0);
    assert_eq!(report.craft.secondary_leftover, 0.0);
    assert_eq!(report.craft.byproduct_total, 312_500.0);
    assert_eq!(report.craft.time_per_unit_sec, 2_500.0);
    assert_eq!((report.split.per_player, report.split.remainder), (83, 1));
    assert!(report.to_string().contains("Time  per Large Ore Refinery: 41m 40s"));
}

#[test]
fn plastanium_with_landsraad() {
    let config = RefineryConfig::standard();
    let report = Calculator::new(&config)
        .plastanium(900.0, 1_000.0, 1, &params(1, 1, 1, true))
        .unwrap();

    assert_eq!(report.fibers.output_units, 400);
    assert_eq!(report.craft.output_units, 333);
    assert_eq!(report.craft.secondary_leftover, 1.0);
}

#[test]
fn zero_players_rejected_by_every_pipeline() {
    let config = RefineryConfig::standard();
    let calc = Calculator::new(&config);
    let p = CalcParams::default();
    assert!(matches!(calc.spice(100.0, 0, &p), Err(CalcError::InvalidInput { .. })));
    assert!(matches!(calc.stravidium(100.0, 0.0, 0, &p), Err(CalcError::InvalidInput { .. })));
    assert!(matches!(calc.plastanium(100.0, 10.0, 0, &p), Err(CalcError::InvalidInput { .. })));
}

#[test]
fn calculate_dispatches_on_kind() {
    let config = RefineryConfig::standard();
    let calc = Calculator::new(&config);
    let p = CalcParams::default();

    let report = calc.calculate(Calculation::Spice { sand: 10_000.0 }, 2, &p).unwrap();
    assert!(matches!(report, RunReport::Spice(_)));

    let report = calc
        .calculate(Calculation::Plastanium { mass: 30.0, titanium: 40.0 }, 1, &p)
        .unwrap();
    match report {
        RunReport::Plastanium(r) => assert_eq!(r.craft.output_units, 10),
        other => panic!("expected plastanium report, got {other:?}"),
    }
}
