//! Fair allocation: floor-divide a shared pool across a roster.
//!
//! The per-player share is always floored so the pool is never
//! over-distributed. Whatever is left stays in `remainder`, and
//! `per_player * players + remainder == total` holds.

use crate::{
    conversion::floor_to_u64,
    error::{CalcError, CalcResult},
};
use serde::{Deserialize, Serialize};

/// Split of a fractional total (melange, titanium ore).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub total:      f64,
    pub players:    u32,
    pub per_player: u64,
    pub remainder:  f64,
}

/// Split of an integral total (fibers, plastanium pieces).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitAllocation {
    pub total:      u64,
    pub players:    u32,
    pub per_player: u64,
    pub remainder:  u64,
}

impl Allocation {
    /// Amount handed out across the whole roster.
    pub fn distributed(&self) -> f64 {
        self.per_player as f64 * f64::from(self.players)
    }
}

impl UnitAllocation {
    pub fn distributed(&self) -> u64 {
        self.per_player * u64::from(self.players)
    }
}

pub fn allocate(total: f64, players: u32) -> CalcResult<Allocation> {
    check_players(players)?;
    if !total.is_finite() || total < 0.0 {
        return Err(CalcError::invalid(format!(
            "total must be a finite number >= 0, got {total}"
        )));
    }

    let count = f64::from(players);
    let mut per_player = floor_to_u64(total / count)?;
    // total / count can round up across an integer boundary.
    if per_player > 0 && per_player as f64 * count > total {
        per_player -= 1;
    }
    let remainder = total - per_player as f64 * count;

    Ok(Allocation { total, players, per_player, remainder })
}

pub fn allocate_units(total: u64, players: u32) -> CalcResult<UnitAllocation> {
    check_players(players)?;
    let count = u64::from(players);
    Ok(UnitAllocation {
        total,
        players,
        per_player: total / count,
        remainder:  total % count,
    })
}

fn check_players(players: u32) -> CalcResult<()> {
    if players < 1 {
        return Err(CalcError::invalid("player count must be at least 1"));
    }
    Ok(())
}
