//! Conversion stages: raw quantities in, produced quantities out.
//!
//! RULE: Every function here is pure. No store, no clock, no logging side
//! effects beyond `log::debug!`. Callers own presentation.
//!
//! Stage A (primary) scales one raw input by a fixed yield ratio.
//! It comes in two flavours:
//!   - continuous: fractional outputs allowed (spice sand -> melange)
//!   - discrete:   outputs are whole units (stravidium mass -> fiber)
//!
//! Stage B (secondary) combines two feeds under a multi-resource recipe.
//! The scarcer feed binds the output (fiber + titanium -> plastanium).
//!
//! Work units run in parallel: byproduct and time totals are divided by
//! the unit count for the per-unit report, total consumption is not.

use crate::{
    error::{CalcError, CalcResult},
    types::UnitCount,
};
use serde::{Deserialize, Serialize};

// ── Ratios ─────────────────────────────────────────────────────────

/// A batch-defined yield: `input_per_batch` raw units produce
/// `output_per_batch` units, consuming `byproduct_per_batch` water
/// over `seconds_per_batch` on a single work unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BatchRatio {
    pub input_per_batch:     f64,
    pub output_per_batch:    f64,
    pub byproduct_per_batch: f64,
    pub seconds_per_batch:   f64,
}

/// A per-output recipe for indivisible outputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UnitRecipe {
    pub input_per_output:     f64,
    pub byproduct_per_output: f64,
    pub seconds_per_output:   f64,
}

/// A two-feed recipe. `primary` is the Stage A product (fiber),
/// `secondary` is the second raw input (titanium ore).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DualRecipe {
    pub primary_per_output:   f64,
    pub secondary_per_output: f64,
    pub byproduct_per_output: f64,
    pub seconds_per_output:   f64,
}

impl BatchRatio {
    pub fn validate(&self) -> CalcResult<()> {
        positive("input_per_batch", self.input_per_batch)?;
        non_negative("output_per_batch", self.output_per_batch)?;
        non_negative("byproduct_per_batch", self.byproduct_per_batch)?;
        non_negative("seconds_per_batch", self.seconds_per_batch)
    }
}

impl UnitRecipe {
    pub fn validate(&self) -> CalcResult<()> {
        positive("input_per_output", self.input_per_output)?;
        non_negative("byproduct_per_output", self.byproduct_per_output)?;
        non_negative("seconds_per_output", self.seconds_per_output)
    }
}

impl DualRecipe {
    pub fn validate(&self) -> CalcResult<()> {
        positive("primary_per_output", self.primary_per_output)?;
        positive("secondary_per_output", self.secondary_per_output)?;
        non_negative("byproduct_per_output", self.byproduct_per_output)?;
        non_negative("seconds_per_output", self.seconds_per_output)
    }
}

// ── Efficiency ─────────────────────────────────────────────────────

/// Whether a cost multiplier also shortens the per-output time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeScaling {
    /// Time per output stays at the recipe constant.
    #[default]
    Fixed,
    /// Time per output is multiplied like every other cost.
    Scaled,
}

/// A global cost multiplier in (0, 1], e.g. 0.75 for a −25% discount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Efficiency {
    pub multiplier:   f64,
    #[serde(default)]
    pub time_scaling: TimeScaling,
}

impl Efficiency {
    /// No discount.
    pub const NONE: Efficiency = Efficiency {
        multiplier:   1.0,
        time_scaling: TimeScaling::Fixed,
    };

    pub fn new(multiplier: f64, time_scaling: TimeScaling) -> CalcResult<Self> {
        let efficiency = Self { multiplier, time_scaling };
        efficiency.validate()?;
        Ok(efficiency)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.multiplier > 0.0 && self.multiplier <= 1.0) {
            return Err(CalcError::invalid(format!(
                "efficiency multiplier must be in (0, 1], got {}",
                self.multiplier
            )));
        }
        Ok(())
    }

    fn cost(&self, per_output: f64) -> f64 {
        per_output * self.multiplier
    }

    fn time(&self, seconds_per_output: f64) -> f64 {
        match self.time_scaling {
            TimeScaling::Fixed  => seconds_per_output,
            TimeScaling::Scaled => seconds_per_output * self.multiplier,
        }
    }
}

impl Default for Efficiency {
    fn default() -> Self {
        Self::NONE
    }
}

// ── Results ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrimaryOutput {
    pub unit_count:         UnitCount,
    pub output_total:       f64,
    pub byproduct_total:    f64,
    pub byproduct_per_unit: f64,
    pub time_total_sec:     f64,
    pub time_per_unit_sec:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscreteOutput {
    pub unit_count:         UnitCount,
    pub output_units:       u64,
    /// Effective raw units per output after any efficiency multiplier.
    pub input_per_output:   f64,
    pub raw_consumed:       f64,
    pub raw_leftover:       f64,
    pub byproduct_total:    f64,
    pub byproduct_per_unit: f64,
    pub time_total_sec:     f64,
    pub time_per_unit_sec:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecondaryOutput {
    pub unit_count:              UnitCount,
    pub output_units:            u64,
    pub producible_by_primary:   u64,
    pub producible_by_secondary: u64,
    pub primary_used:            f64,
    pub primary_leftover:        f64,
    pub secondary_used:          f64,
    pub secondary_leftover:      f64,
    pub byproduct_total:         f64,
    pub byproduct_per_unit:      f64,
    pub time_total_sec:          f64,
    pub time_per_unit_sec:       f64,
}

// ── Stage A ────────────────────────────────────────────────────────

/// Continuous Stage A: every quantity scales linearly with `raw`.
pub fn primary_conversion(
    raw: f64,
    unit_count: UnitCount,
    ratio: &BatchRatio,
) -> CalcResult<PrimaryOutput> {
    non_negative("raw quantity", raw)?;
    ratio.validate()?;
    let units = clamp_units(unit_count);

    let batches = raw / ratio.input_per_batch;
    let output_total = batches * ratio.output_per_batch;
    let byproduct_total = batches * ratio.byproduct_per_batch;
    let time_total_sec = batches * ratio.seconds_per_batch;

    log::debug!("primary: raw={raw} units={units} -> output={output_total} time={time_total_sec}s");

    Ok(PrimaryOutput {
        unit_count: units,
        output_total,
        byproduct_total,
        byproduct_per_unit: byproduct_total / f64::from(units),
        time_total_sec,
        time_per_unit_sec: time_total_sec / f64::from(units),
    })
}

/// Discrete Stage A: only whole outputs are produced, the rest of the
/// raw input is reported as leftover.
pub fn primary_conversion_discrete(
    raw: f64,
    unit_count: UnitCount,
    recipe: &UnitRecipe,
    efficiency: &Efficiency,
) -> CalcResult<DiscreteOutput> {
    non_negative("raw quantity", raw)?;
    recipe.validate()?;
    efficiency.validate()?;
    let units = clamp_units(unit_count);

    let input_per_output = efficiency.cost(recipe.input_per_output);
    let output_units = whole_outputs(raw, input_per_output)?;
    let raw_consumed = output_units as f64 * input_per_output;
    // Never report a negative leftover from float noise at the boundary.
    let raw_leftover = (raw - raw_consumed).max(0.0);

    let byproduct_total = output_units as f64 * efficiency.cost(recipe.byproduct_per_output);
    let time_total_sec = output_units as f64 * efficiency.time(recipe.seconds_per_output);

    log::debug!(
        "discrete: raw={raw} per_output={input_per_output} -> outputs={output_units} leftover={raw_leftover}"
    );

    Ok(DiscreteOutput {
        unit_count: units,
        output_units,
        input_per_output,
        raw_consumed,
        raw_leftover,
        byproduct_total,
        byproduct_per_unit: byproduct_total / f64::from(units),
        time_total_sec,
        time_per_unit_sec: time_total_sec / f64::from(units),
    })
}

// ── Stage B ────────────────────────────────────────────────────────

/// Min-of-ratios conversion over two feeds.
pub fn secondary_conversion(
    primary_feed: f64,
    secondary_feed: f64,
    unit_count: UnitCount,
    recipe: &DualRecipe,
    efficiency: &Efficiency,
) -> CalcResult<SecondaryOutput> {
    non_negative("primary feed", primary_feed)?;
    non_negative("secondary feed", secondary_feed)?;
    recipe.validate()?;
    efficiency.validate()?;
    let units = clamp_units(unit_count);

    let primary_ratio = efficiency.cost(recipe.primary_per_output);
    let secondary_ratio = efficiency.cost(recipe.secondary_per_output);

    let producible_by_primary = whole_outputs(primary_feed, primary_ratio)?;
    let producible_by_secondary = whole_outputs(secondary_feed, secondary_ratio)?;
    let output_units = producible_by_primary.min(producible_by_secondary);

    let primary_used = output_units as f64 * primary_ratio;
    let secondary_used = output_units as f64 * secondary_ratio;

    let byproduct_total = output_units as f64 * efficiency.cost(recipe.byproduct_per_output);
    let time_total_sec = output_units as f64 * efficiency.time(recipe.seconds_per_output);

    log::debug!(
        "secondary: by_primary={producible_by_primary} by_secondary={producible_by_secondary} -> outputs={output_units}"
    );

    Ok(SecondaryOutput {
        unit_count: units,
        output_units,
        producible_by_primary,
        producible_by_secondary,
        primary_used,
        primary_leftover: (primary_feed - primary_used).max(0.0),
        secondary_used,
        secondary_leftover: (secondary_feed - secondary_used).max(0.0),
        byproduct_total,
        byproduct_per_unit: byproduct_total / f64::from(units),
        time_total_sec,
        time_per_unit_sec: time_total_sec / f64::from(units),
    })
}

// ── Helpers ────────────────────────────────────────────────────────

/// Work-unit counts below one are treated as one.
pub fn clamp_units(unit_count: UnitCount) -> UnitCount {
    unit_count.max(1)
}

fn whole_outputs(feed: f64, per_output: f64) -> CalcResult<u64> {
    floor_to_u64(feed / per_output)
}

/// Floor a non-negative quotient into a count. Quotients past `u64::MAX`
/// are rejected rather than saturated.
pub(crate) fn floor_to_u64(quotient: f64) -> CalcResult<u64> {
    let whole = quotient.floor();
    if !whole.is_finite() || whole >= u64::MAX as f64 {
        return Err(CalcError::invalid(format!(
            "quantity too large to count in whole units: {quotient}"
        )));
    }
    Ok(whole as u64)
}

fn non_negative(what: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid(format!(
            "{what} must be a finite number >= 0, got {value}"
        )));
    }
    Ok(())
}

fn positive(what: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid(format!(
            "{what} must be a finite number > 0, got {value}"
        )));
    }
    Ok(())
}
