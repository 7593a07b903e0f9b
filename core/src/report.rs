//! Calculation results and their text rendering.
//!
//! Reports are transient: they are rebuilt from run state on every request
//! and never written to the store.

use crate::{
    allocation::{Allocation, UnitAllocation},
    conversion::{DiscreteOutput, Efficiency, PrimaryOutput, SecondaryOutput},
    duration::format_duration,
    run::{ResourceChannel, ResourceLedger, Run, RunKind},
    types::{PlayerName, RunId, UserId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpiceReport {
    pub sand:       f64,
    pub conversion: PrimaryOutput,
    pub allocation: Allocation,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StravidiumReport {
    pub mass:           f64,
    pub titanium:       f64,
    /// The discount in effect, if any.
    pub landsraad:      Option<Efficiency>,
    pub fibers:         DiscreteOutput,
    pub fiber_split:    UnitAllocation,
    pub titanium_split: Option<Allocation>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlastaniumReport {
    pub mass:      f64,
    pub titanium:  f64,
    pub landsraad: Option<Efficiency>,
    pub fibers:    DiscreteOutput,
    pub craft:     SecondaryOutput,
    pub split:     UnitAllocation,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunReport {
    Spice(SpiceReport),
    Stravidium(StravidiumReport),
    Plastanium(PlastaniumReport),
}

impl RunReport {
    pub fn kind(&self) -> RunKind {
        match self {
            Self::Spice(_)      => RunKind::Spice,
            Self::Stravidium(_) => RunKind::Stravidium,
            Self::Plastanium(_) => RunKind::Plastanium,
        }
    }
}

/// A run's report with its identity and roster.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunCalculation {
    pub run_id:  RunId,
    pub players: Vec<PlayerName>,
    pub report:  RunReport,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub run_id:     RunId,
    pub kind:       RunKind,
    pub players:    Vec<PlayerName>,
    pub amounts:    ResourceLedger,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(run_id: &str, run: &Run) -> Self {
        Self {
            run_id:     run_id.to_string(),
            kind:       run.kind,
            players:    run.players.clone(),
            amounts:    run.amounts,
            created_by: run.created_by.clone(),
            created_at: run.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunListing {
    pub run_id:       RunId,
    pub kind:         RunKind,
    pub player_count: usize,
    pub created_by:   UserId,
}

// ── Rendering ──────────────────────────────────────────────────────

impl fmt::Display for SpiceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.conversion;
        let a = &self.allocation;
        writeln!(f, "Spice Sand: {} | Spice Refineries: {}", grouped(self.sand, 0), c.unit_count)?;
        writeln!(f, "Players: {}", a.players)?;
        writeln!(f)?;
        writeln!(f, "Total Melange: {}", grouped(c.output_total, 2))?;
        writeln!(f, "Melange per Player (floored): {}", grouped(a.per_player as f64, 0))?;
        writeln!(f, "Unallocated Remainder: {}", grouped(a.remainder, 2))?;
        writeln!(f)?;
        writeln!(f, "Total Water: {}", grouped(c.byproduct_total, 2))?;
        writeln!(f, "Water per Refinery: {}", grouped(c.byproduct_per_unit, 2))?;
        writeln!(f, "Processing Time (parallel): {}", format_duration(c.time_per_unit_sec))?;
        write!(f, "Note: Landsraad only affects crafting, not spice refining.")
    }
}

impl fmt::Display for StravidiumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fibers = &self.fibers;
        let split = &self.fiber_split;
        writeln!(
            f,
            "Stravidium Mass: {} | Chem Refineries: {}",
            grouped(self.mass, 0),
            fibers.unit_count
        )?;
        writeln!(f, "{}", landsraad_line(self.landsraad.as_ref()))?;
        writeln!(f, "Players: {}", split.players)?;
        writeln!(f)?;
        writeln!(f, "Total Fibers: {}", grouped(split.total as f64, 0))?;
        writeln!(f, "Fibers per Player (floored): {}", grouped(split.per_player as f64, 0))?;
        writeln!(f, "Unallocated Remainder: {}", grouped(split.remainder as f64, 0))?;
        if let Some(ti) = &self.titanium_split {
            writeln!(f)?;
            writeln!(f, "Titanium Ore: {}", grouped(ti.total, 0))?;
            writeln!(f, "Titanium Ore per Player (floored): {}", grouped(ti.per_player as f64, 0))?;
            writeln!(f, "Titanium Remainder: {}", grouped(ti.remainder, 2))?;
        }
        writeln!(f)?;
        writeln!(f, "Water per Chem Refinery: {:.0} mL", fibers.byproduct_per_unit)?;
        writeln!(f, "Time per Chem Refinery: {}", format_duration(fibers.time_per_unit_sec))?;
        writeln!(f)?;
        writeln!(f, "Leftovers After Fiber Stage")?;
        writeln!(f, "  Raw Stravidium Consumed: {:.2}", fibers.raw_consumed)?;
        write!(f, "  Raw Stravidium Leftover: {:.2}", fibers.raw_leftover)
    }
}

impl fmt::Display for PlastaniumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fibers = &self.fibers;
        let craft = &self.craft;
        let split = &self.split;
        writeln!(
            f,
            "Inputs: Stravidium Mass: {}, Titanium Ore: {}",
            grouped(self.mass, 0),
            grouped(self.titanium, 0)
        )?;
        writeln!(
            f,
            "Chem Refineries: {} | Large Ore Refineries: {}",
            fibers.unit_count, craft.unit_count
        )?;
        writeln!(f, "{}", landsraad_line(self.landsraad.as_ref()))?;
        writeln!(f, "Players: {}", split.players)?;
        writeln!(f)?;
        writeln!(f, "Fiber Stage (Medium Chemical Refinery)")?;
        writeln!(f, "  Fibers Produced: {}", grouped(fibers.output_units as f64, 0))?;
        writeln!(f, "  Water per Chem Refinery: {:.0} mL", fibers.byproduct_per_unit)?;
        writeln!(f, "  Time  per Chem Refinery: {}", format_duration(fibers.time_per_unit_sec))?;
        writeln!(f, "  Raw Stravidium Consumed: {:.2}", fibers.raw_consumed)?;
        writeln!(f, "  Raw Stravidium Leftover: {:.2}", fibers.raw_leftover)?;
        writeln!(f)?;
        writeln!(f, "Plastanium Stage (Large Ore Refinery)")?;
        writeln!(f, "  Water per Large Ore Refinery: {:.0} mL", craft.byproduct_per_unit)?;
        writeln!(f, "  Time  per Large Ore Refinery: {}", format_duration(craft.time_per_unit_sec))?;
        writeln!(f, "  Fiber Used: {:.2}", craft.primary_used)?;
        writeln!(f, "  Fiber Leftover: {:.2}", craft.primary_leftover)?;
        writeln!(f, "  Titanium Used: {:.2}", craft.secondary_used)?;
        writeln!(f, "  Titanium Leftover: {:.2}", craft.secondary_leftover)?;
        writeln!(f)?;
        writeln!(f, "Total Plastanium: {}", grouped(split.total as f64, 0))?;
        writeln!(f, "Plastanium per Player (floored): {}", grouped(split.per_player as f64, 0))?;
        write!(f, "Unallocated Remainder: {}", grouped(split.remainder as f64, 0))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spice(r)      => write!(f, "{r}"),
            Self::Stravidium(r) => write!(f, "{r}"),
            Self::Plastanium(r) => write!(f, "{r}"),
        }
    }
}

impl fmt::Display for RunCalculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Run {} - {}",
            self.run_id,
            self.report.kind().as_str().to_ascii_uppercase()
        )?;
        writeln!(f, "Roster: {}", self.players.join(", "))?;
        write!(f, "{}", self.report)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}", self.run_id)?;
        writeln!(f, "Type: {}", self.kind)?;
        let roster = if self.players.is_empty() {
            "(none)".to_string()
        } else {
            self.players.join(", ")
        };
        writeln!(f, "Players ({}): {}", self.players.len(), roster)?;
        if !self.created_by.is_empty() {
            writeln!(f, "Created by {} at {}", self.created_by, self.created_at.to_rfc3339())?;
        }
        write!(f, "Amounts:")?;
        for channel in ResourceChannel::ALL {
            write!(f, "\n  {}: {}", channel, self.amounts.get(channel))?;
        }
        Ok(())
    }
}

impl fmt::Display for RunListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:<10}  {} player(s)  by {}",
            self.run_id, self.kind, self.player_count, self.created_by
        )
    }
}

fn landsraad_line(efficiency: Option<&Efficiency>) -> String {
    match efficiency {
        Some(e) => format!(
            "Landsraad discount: ON (-{:.0}% crafting costs)",
            (1.0 - e.multiplier) * 100.0
        ),
        None => "Landsraad discount: OFF".to_string(),
    }
}

/// Fixed-point with thousands separators: `187500.0` -> `"187,500.00"`.
fn grouped(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, frac)) => (i, Some(frac)),
        None => (text.as_str(), None),
    };
    let digits = int_part.len();
    let mut out = String::with_capacity(text.len() + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 && ch.is_ascii_digit() {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::grouped;

    #[test]
    fn grouping_inserts_separators() {
        assert_eq!(grouped(0.0, 2), "0.00");
        assert_eq!(grouped(999.0, 0), "999");
        assert_eq!(grouped(1_000.0, 0), "1,000");
        assert_eq!(grouped(187_500.0, 2), "187,500.00");
        assert_eq!(grouped(1_234_567.891, 2), "1,234,567.89");
    }
}
