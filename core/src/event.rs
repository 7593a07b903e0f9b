//! Notifications emitted by run lifecycle operations.
//!
//! Every successful mutation returns exactly one event.
//! `DuplicatePlayer` is the soft-failure case: the roster is untouched
//! and the caller is told why.

use crate::{
    run::{ResourceChannel, RunKind},
    types::{PlayerName, RunId, UserId},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    RunCreated {
        run_id:     RunId,
        kind:       RunKind,
        players:    Vec<PlayerName>,
        created_by: UserId,
    },
    PlayerAdded {
        run_id: RunId,
        player: PlayerName,
        roster: Vec<PlayerName>,
    },
    DuplicatePlayer {
        run_id: RunId,
        player: PlayerName,
    },
    AmountAdded {
        run_id:    RunId,
        resource:  ResourceChannel,
        amount:    f64,
        new_total: f64,
    },
    RunDeleted {
        run_id:     RunId,
        deleted_by: UserId,
    },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunCreated { run_id, kind, players, .. } => write!(
                f,
                "Run created: {run_id}\nType: {kind}\nPlayers: {}",
                players.join(", ")
            ),
            Self::PlayerAdded { player, roster, .. } => {
                write!(f, "Added player: {player}\nRoster: {}", roster.join(", "))
            }
            Self::DuplicatePlayer { player, .. } => {
                write!(f, "Player already in roster: {player}")
            }
            Self::AmountAdded { resource, new_total, .. } => {
                write!(f, "Updated {resource}. New total: {new_total}")
            }
            Self::RunDeleted { run_id, .. } => write!(f, "Deleted run {run_id}"),
        }
    }
}
