//! Composed pipelines: Stage A -> (Stage B) -> allocation.
//!
//! Every front end (CLI, command loop, run tracker) goes through these,
//! so a given set of inputs yields the same report everywhere.

use crate::{
    allocation::{allocate, allocate_units},
    config::RefineryConfig,
    conversion::{primary_conversion, primary_conversion_discrete, secondary_conversion},
    error::{CalcError, CalcResult},
    report::{PlastaniumReport, RunReport, SpiceReport, StravidiumReport},
    run::Calculation,
    types::UnitCount,
};
use serde::{Deserialize, Serialize};

/// Per-request knobs. Refinery counts below one are treated as one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalcParams {
    pub spice_refineries: UnitCount,
    pub chem_refineries:  UnitCount,
    pub large_refineries: UnitCount,
    /// Apply the Landsraad crafting discount to fiber and plastanium.
    pub landsraad:        bool,
}

impl Default for CalcParams {
    fn default() -> Self {
        Self {
            spice_refineries: 1,
            chem_refineries:  1,
            large_refineries: 1,
            landsraad:        false,
        }
    }
}

pub struct Calculator<'a> {
    config: &'a RefineryConfig,
}

impl<'a> Calculator<'a> {
    pub fn new(config: &'a RefineryConfig) -> Self {
        Self { config }
    }

    /// Spice sand -> melange, melange split per player.
    /// The Landsraad flag never applies here.
    pub fn spice(&self, sand: f64, players: u32, params: &CalcParams) -> CalcResult<SpiceReport> {
        let conversion = primary_conversion(sand, params.spice_refineries, &self.config.spice)?;
        let allocation = allocate(conversion.output_total, players)?;
        Ok(SpiceReport { sand, conversion, allocation })
    }

    /// Stravidium mass -> fibers; fibers and titanium ore split raw.
    pub fn stravidium(
        &self,
        mass: f64,
        titanium: f64,
        players: u32,
        params: &CalcParams,
    ) -> CalcResult<StravidiumReport> {
        let efficiency = self.config.crafting_efficiency(params.landsraad);
        let fibers = primary_conversion_discrete(
            mass,
            params.chem_refineries,
            &self.config.fiber,
            &efficiency,
        )?;
        let fiber_split = allocate_units(fibers.output_units, players)?;
        let titanium_split = if titanium > 0.0 {
            Some(allocate(titanium, players)?)
        } else {
            None
        };
        Ok(StravidiumReport {
            mass,
            titanium,
            landsraad: params.landsraad.then_some(efficiency),
            fibers,
            fiber_split,
            titanium_split,
        })
    }

    /// Stravidium mass -> fibers, fibers + titanium -> plastanium, pieces split.
    pub fn plastanium(
        &self,
        mass: f64,
        titanium: f64,
        players: u32,
        params: &CalcParams,
    ) -> CalcResult<PlastaniumReport> {
        let efficiency = self.config.crafting_efficiency(params.landsraad);
        let fibers = primary_conversion_discrete(
            mass,
            params.chem_refineries,
            &self.config.fiber,
            &efficiency,
        )?;
        let craft = secondary_conversion(
            fibers.output_units as f64,
            titanium,
            params.large_refineries,
            &self.config.plastanium,
            &efficiency,
        )?;
        let split = allocate_units(craft.output_units, players)?;
        Ok(PlastaniumReport {
            mass,
            titanium,
            landsraad: params.landsraad.then_some(efficiency),
            fibers,
            craft,
            split,
        })
    }

    /// Dispatch a run's calculation to the matching pipeline.
    pub fn calculate(
        &self,
        calculation: Calculation,
        players: usize,
        params: &CalcParams,
    ) -> CalcResult<RunReport> {
        let players = u32::try_from(players)
            .map_err(|_| CalcError::invalid(format!("too many players: {players}")))?;
        let report = match calculation {
            Calculation::Spice { sand } => RunReport::Spice(self.spice(sand, players, params)?),
            Calculation::Stravidium { mass, titanium } => {
                RunReport::Stravidium(self.stravidium(mass, titanium, players, params)?)
            }
            Calculation::Plastanium { mass, titanium } => {
                RunReport::Plastanium(self.plastanium(mass, titanium, players, params)?)
            }
        };
        Ok(report)
    }
}
