use crate::{
    calculator::CalcParams,
    event::RunEvent,
    report::{RunCalculation, RunListing, RunSummary},
    run::{ResourceChannel, RunKind},
    types::{PlayerName, RunId},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All run-tracker requests a front end can issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum RunCommand {
    Create {
        kind:    RunKind,
        players: Vec<PlayerName>,
    },
    AddPlayer {
        run_id: RunId,
        player: PlayerName,
    },
    AddAmount {
        run_id:   RunId,
        resource: ResourceChannel,
        amount:   f64,
    },
    View {
        run_id: RunId,
    },
    List,
    Delete {
        run_id: RunId,
    },
    Calculate {
        run_id: RunId,
        #[serde(default)]
        params: CalcParams,
    },
}

impl RunCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. }    => "create",
            Self::AddPlayer { .. } => "add_player",
            Self::AddAmount { .. } => "add_amount",
            Self::View { .. }      => "view",
            Self::List             => "list",
            Self::Delete { .. }    => "delete",
            Self::Calculate { .. } => "calculate",
        }
    }

    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::AddPlayer { .. } | Self::AddAmount { .. } | Self::Delete { .. }
        )
    }
}

/// What a command produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    Event(RunEvent),
    View(RunSummary),
    List(Vec<RunListing>),
    Calculation(RunCalculation),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(e)       => write!(f, "{e}"),
            Self::View(v)        => write!(f, "{v}"),
            Self::Calculation(c) => write!(f, "{c}"),
            Self::List(runs) if runs.is_empty() => write!(f, "No runs."),
            Self::List(runs) => {
                for (i, run) in runs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{run}")?;
                }
                Ok(())
            }
        }
    }
}
