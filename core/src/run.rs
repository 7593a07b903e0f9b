//! Runs: named accumulators of raw materials shared by a roster.
//!
//! RULE: Accumulators only ever grow. There is no subtraction primitive.
//! RULE: The roster keeps insertion order and never holds a name twice.

use crate::{
    error::{CalcError, CalcResult},
    types::{PlayerName, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// ── Kind ───────────────────────────────────────────────────────────

/// Which calculation a run feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// Spice sand refined into melange.
    Spice,
    /// Stravidium mass refined into fiber, split raw.
    Stravidium,
    /// Fiber and titanium crafted into plastanium.
    Plastanium,
}

impl RunKind {
    pub const ALL: [RunKind; 3] = [Self::Spice, Self::Stravidium, Self::Plastanium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spice      => "spice",
            Self::Stravidium => "stravidium",
            Self::Plastanium => "plastanium",
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| CalcError::UnknownRunKind { name: s.to_string() })
    }
}

// ── Resource channels ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceChannel {
    Spice,
    Stravidium,
    Titanium,
    Plastanium,
}

impl ResourceChannel {
    pub const ALL: [ResourceChannel; 4] = [
        Self::Spice,
        Self::Stravidium,
        Self::Titanium,
        Self::Plastanium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spice      => "spice",
            Self::Stravidium => "stravidium",
            Self::Titanium   => "titanium",
            Self::Plastanium => "plastanium",
        }
    }
}

impl fmt::Display for ResourceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceChannel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CalcError::UnknownResource { name: s.to_string() })
    }
}

/// The four accumulators every run carries. Missing fields load as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceLedger {
    pub spice:      f64,
    pub stravidium: f64,
    pub titanium:   f64,
    pub plastanium: f64,
}

impl ResourceLedger {
    pub fn get(&self, channel: ResourceChannel) -> f64 {
        match channel {
            ResourceChannel::Spice      => self.spice,
            ResourceChannel::Stravidium => self.stravidium,
            ResourceChannel::Titanium   => self.titanium,
            ResourceChannel::Plastanium => self.plastanium,
        }
    }

    /// Add `amount` to a channel and return the new total.
    pub fn add(&mut self, channel: ResourceChannel, amount: f64) -> CalcResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CalcError::invalid(format!(
                "amount must be a finite number >= 0, got {amount}"
            )));
        }
        let slot = match channel {
            ResourceChannel::Spice      => &mut self.spice,
            ResourceChannel::Stravidium => &mut self.stravidium,
            ResourceChannel::Titanium   => &mut self.titanium,
            ResourceChannel::Plastanium => &mut self.plastanium,
        };
        let next = *slot + amount;
        if !next.is_finite() {
            return Err(CalcError::invalid(format!(
                "{channel} total would overflow: {} + {amount}",
                *slot
            )));
        }
        *slot = next;
        Ok(next)
    }
}

// ── Run ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub kind:       RunKind,
    pub players:    Vec<PlayerName>,
    #[serde(default)]
    pub amounts:    ResourceLedger,
    #[serde(default)]
    pub created_by: UserId,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Run {
    /// Build a fresh run. Names are trimmed, blanks dropped and repeats
    /// collapsed onto their first occurrence. At least one player is required.
    pub fn new<I, P>(
        kind: RunKind,
        players: I,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> CalcResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut run = Self {
            kind,
            players: Vec::new(),
            amounts: ResourceLedger::default(),
            created_by,
            created_at,
        };
        for name in players {
            run.push_player(name.as_ref());
        }
        if run.players.is_empty() {
            return Err(CalcError::invalid("provide at least one player"));
        }
        Ok(run)
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Append a player. Returns false when the name is blank or already present.
    pub fn push_player(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_player(name) {
            return false;
        }
        self.players.push(name.to_string());
        true
    }

    /// Pick the calculation for this run's kind from its accumulators.
    pub fn calculation(&self) -> CalcResult<Calculation> {
        let a = &self.amounts;
        match self.kind {
            RunKind::Spice => {
                if a.spice <= 0.0 {
                    return Err(CalcError::insufficient("No spice sand recorded."));
                }
                Ok(Calculation::Spice { sand: a.spice })
            }
            RunKind::Stravidium => {
                if a.stravidium <= 0.0 {
                    return Err(CalcError::insufficient("No stravidium mass recorded."));
                }
                Ok(Calculation::Stravidium {
                    mass:     a.stravidium,
                    titanium: a.titanium.max(0.0),
                })
            }
            RunKind::Plastanium => {
                if a.stravidium <= 0.0 || a.titanium <= 0.0 {
                    return Err(CalcError::insufficient(
                        "Plastanium run requires both stravidium mass and titanium.",
                    ));
                }
                Ok(Calculation::Plastanium {
                    mass:     a.stravidium,
                    titanium: a.titanium,
                })
            }
        }
    }
}

/// Exactly the inputs each calculator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calculation {
    Spice { sand: f64 },
    /// Titanium is optional here and split raw alongside the fibers.
    Stravidium { mass: f64, titanium: f64 },
    Plastanium { mass: f64, titanium: f64 },
}
