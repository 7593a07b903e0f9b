//! Stage A / Stage B conversion tests.

use refinery_core::{
    config::RefineryConfig,
    conversion::{
        primary_conversion, primary_conversion_discrete, secondary_conversion, DualRecipe,
        Efficiency, TimeScaling, UnitRecipe,
    },
    duration::format_duration,
    error::CalcError,
};

const EPS: f64 = 1e-9;

fn recipe(input_per_output: f64) -> UnitRecipe {
    UnitRecipe {
        input_per_output,
        byproduct_per_output: 100.0,
        seconds_per_output:   10.0,
    }
}

fn dual(ratio_a: f64, ratio_b: f64) -> DualRecipe {
    DualRecipe {
        primary_per_output:   ratio_a,
        secondary_per_output: ratio_b,
        byproduct_per_output: 1_250.0,
        seconds_per_output:   20.0,
    }
}

/// 25 000 sand on one refinery: 2.5 full batches.
#[test]
fn spice_batch_scales_linearly() {
    let config = RefineryConfig::standard();
    let out = primary_conversion(25_000.0, 1, &config.spice).unwrap();

    assert_eq!(out.output_total, 500.0);
    assert_eq!(out.byproduct_total, 187_500.0);
    assert_eq!(out.time_total_sec, 6_750.0);
    assert_eq!(format_duration(out.time_per_unit_sec), "1h 52m 30s");
}

/// Parallel refineries split time and water, never the output.
#[test]
fn parallel_units_divide_time_not_output() {
    let config = RefineryConfig::standard();
    for units in [1u32, 2, 3, 7, 16] {
        for raw in [0.0, 1.0, 9_999.0, 25_000.0, 123_456.7] {
            let out = primary_conversion(raw, units, &config.spice).unwrap();
            let n = f64::from(units);
            assert!(
                (out.time_per_unit_sec * n - out.time_total_sec).abs() < EPS * out.time_total_sec.max(1.0),
                "time split broken for raw={raw} units={units}"
            );
            assert!((out.byproduct_per_unit * n - out.byproduct_total).abs() < EPS * out.byproduct_total.max(1.0));
            let single = primary_conversion(raw, 1, &config.spice).unwrap();
            assert_eq!(out.output_total, single.output_total);
        }
    }
}

/// Zero work units is treated as one, not rejected.
#[test]
fn zero_units_clamp_to_one() {
    let config = RefineryConfig::standard();
    let out = primary_conversion(10_000.0, 0, &config.spice).unwrap();
    assert_eq!(out.unit_count, 1);
    assert_eq!(out.time_per_unit_sec, 2_700.0);

    let fibers = primary_conversion_discrete(30.0, 0, &recipe(3.0), &Efficiency::NONE).unwrap();
    assert_eq!(fibers.unit_count, 1);
}

#[test]
fn negative_or_nan_raw_is_invalid() {
    let config = RefineryConfig::standard();
    assert!(matches!(
        primary_conversion(-1.0, 1, &config.spice),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        primary_conversion(f64::NAN, 1, &config.spice),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        primary_conversion_discrete(-3.0, 1, &recipe(3.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        secondary_conversion(1.0, -4.0, 1, &dual(1.0, 4.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
}

/// 100 mass at 3 per fiber: 33 fibers, 99 consumed, 1 left.
#[test]
fn discrete_keeps_leftover() {
    let out = primary_conversion_discrete(100.0, 1, &recipe(3.0), &Efficiency::NONE).unwrap();

    assert_eq!(out.output_units, 33);
    assert_eq!(out.raw_consumed, 99.0);
    assert_eq!(out.raw_leftover, 1.0);
    assert_eq!(out.byproduct_total, 3_300.0);
    assert_eq!(out.time_total_sec, 330.0);
}

#[test]
fn discrete_consumed_plus_leftover_is_raw() {
    for ratio in [1.0, 2.0, 3.0, 7.0] {
        for raw in [0u32, 1, 2, 3, 10, 100, 901, 12_345] {
            let raw = f64::from(raw);
            let out = primary_conversion_discrete(raw, 2, &recipe(ratio), &Efficiency::NONE).unwrap();
            assert_eq!(out.raw_consumed + out.raw_leftover, raw, "raw={raw} ratio={ratio}");
            assert!(out.raw_leftover >= 0.0 && out.raw_leftover < ratio);
        }
    }
}

/// Fiber 40 at 1/piece, titanium 100 at 4/piece: titanium binds at 25.
#[test]
fn secondary_is_bound_by_scarcer_feed() {
    let out = secondary_conversion(40.0, 100.0, 1, &dual(1.0, 4.0), &Efficiency::NONE).unwrap();

    assert_eq!(out.producible_by_primary, 40);
    assert_eq!(out.producible_by_secondary, 25);
    assert_eq!(out.output_units, 25);
    assert_eq!(out.primary_used, 25.0);
    assert_eq!(out.primary_leftover, 15.0);
    assert_eq!(out.secondary_used, 100.0);
    assert_eq!(out.secondary_leftover, 0.0);
    assert_eq!(out.byproduct_total, 31_250.0);
    assert_eq!(out.time_total_sec, 500.0);
}

#[test]
fn secondary_matches_min_of_floors() {
    let recipe = dual(1.0, 4.0);
    for (a, b) in [(0.0, 0.0), (3.0, 100.0), (40.0, 7.0), (250.0, 999.0), (1_000.0, 4_000.0)] {
        let out = secondary_conversion(a, b, 3, &recipe, &Efficiency::NONE).unwrap();
        let expected = ((a / 1.0).floor() as u64).min((b / 4.0).floor() as u64);
        assert_eq!(out.output_units, expected, "a={a} b={b}");
        assert!(out.primary_used <= a);
        assert!(out.primary_leftover >= 0.0);
        assert!(out.secondary_used <= b);
        assert!((out.time_per_unit_sec * 3.0 - out.time_total_sec).abs() < EPS);
    }
}

/// A −25% discount scales costs; time stays fixed unless configured.
#[test]
fn efficiency_scales_costs_but_not_fixed_time() {
    let fixed = Efficiency::new(0.75, TimeScaling::Fixed).unwrap();
    let out = primary_conversion_discrete(900.0, 1, &recipe(3.0), &fixed).unwrap();
    assert_eq!(out.input_per_output, 2.25);
    assert_eq!(out.output_units, 400);
    assert_eq!(out.raw_consumed, 900.0);
    assert_eq!(out.byproduct_total, 30_000.0);
    assert_eq!(out.time_total_sec, 4_000.0);

    let scaled = Efficiency::new(0.75, TimeScaling::Scaled).unwrap();
    let out = primary_conversion_discrete(900.0, 1, &recipe(3.0), &scaled).unwrap();
    assert_eq!(out.output_units, 400);
    assert_eq!(out.time_total_sec, 3_000.0);
}

#[test]
fn efficiency_applies_to_both_feeds() {
    let discount = Efficiency::new(0.75, TimeScaling::Fixed).unwrap();
    let out = secondary_conversion(400.0, 1_000.0, 1, &dual(1.0, 4.0), &discount).unwrap();

    // 1000 / 3.0 = 333 pieces; fiber allows 400 / 0.75 = 533.
    assert_eq!(out.output_units, 333);
    assert_eq!(out.secondary_used, 999.0);
    assert_eq!(out.secondary_leftover, 1.0);
    assert!((out.primary_used - 249.75).abs() < EPS);
    assert_eq!(out.time_total_sec, 333.0 * 20.0);
}

#[test]
fn efficiency_outside_unit_interval_is_invalid() {
    for m in [0.0, -0.5, 1.01, f64::NAN] {
        assert!(
            matches!(Efficiency::new(m, TimeScaling::Fixed), Err(CalcError::InvalidInput { .. })),
            "multiplier {m} accepted"
        );
    }
    assert!(Efficiency::new(1.0, TimeScaling::Fixed).is_ok());
}

#[test]
fn zero_ratio_recipe_is_invalid() {
    assert!(matches!(
        primary_conversion_discrete(10.0, 1, &recipe(0.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        secondary_conversion(10.0, 10.0, 1, &dual(1.0, 0.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
}

/// Scaled time also applies to the two-feed stage.
#[test]
fn scaled_time_applies_to_secondary() {
    let scaled = Efficiency::new(0.75, TimeScaling::Scaled).unwrap();
    let out = secondary_conversion(400.0, 1_000.0, 1, &dual(1.0, 4.0), &scaled).unwrap();
    assert_eq!(out.output_units, 333);
    assert_eq!(out.time_total_sec, 333.0 * 15.0);

    let fixed = Efficiency::new(0.75, TimeScaling::Fixed).unwrap();
    let out = secondary_conversion(400.0, 1_000.0, 1, &dual(1.0, 4.0), &fixed).unwrap();
    assert_eq!(out.time_total_sec, 333.0 * 20.0);
}

/// Output counts that would not fit a u64 are rejected in both stages.
#[test]
fn uncountable_output_is_invalid() {
    assert!(matches!(
        primary_conversion_discrete(1e20, 1, &recipe(1.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        secondary_conversion(1e20, 1e21, 1, &dual(1.0, 4.0), &Efficiency::NONE),
        Err(CalcError::InvalidInput { .. })
    ));
}
