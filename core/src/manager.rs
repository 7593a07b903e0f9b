//! Run manager: lifecycle state machine for tracked runs.
//!
//! STATES: Active -> Deleted (terminal). A deleted run is simply absent.
//!
//! RULES:
//!   - The collection is loaded from the repository once, at open.
//!   - Every mutation writes through the repository BEFORE the in-memory
//!     copy changes. A failed write leaves both untouched.
//!   - Calculations are read-only and never persisted.
//!   - Identity is supplied per call; the manager holds no session.

use crate::{
    auth::{may_delete, IdentityProvider},
    calculator::{CalcParams, Calculator},
    clock::{Clock, SystemClock},
    command::{CommandOutcome, RunCommand},
    config::RefineryConfig,
    error::{CalcError, CalcResult},
    event::RunEvent,
    report::{RunCalculation, RunListing, RunSummary},
    rng::IdGenerator,
    run::{ResourceChannel, Run, RunKind},
    store::{RunMap, RunRepository},
};

/// Attempts at drawing an unused identifier before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

pub struct RunManager {
    config: RefineryConfig,
    store:  Box<dyn RunRepository>,
    runs:   RunMap,
    ids:    IdGenerator,
    clock:  Box<dyn Clock>,
}

impl RunManager {
    /// Open with the system clock and entropy-seeded identifiers.
    pub fn open(store: Box<dyn RunRepository>, config: RefineryConfig) -> CalcResult<Self> {
        Self::with_parts(store, config, IdGenerator::from_entropy(), Box::new(SystemClock))
    }

    /// Open with an explicit id source and clock. Tests use this.
    pub fn with_parts(
        store: Box<dyn RunRepository>,
        config: RefineryConfig,
        ids: IdGenerator,
        clock: Box<dyn Clock>,
    ) -> CalcResult<Self> {
        config.validate()?;
        let runs = store.load()?;
        log::info!("Run manager opened with {} stored runs", runs.len());
        Ok(Self { config, store, runs, ids, clock })
    }

    pub fn get(&self, run_id: &str) -> Option<&Run> {
        self.runs.get(run_id)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    // ── Transitions ───────────────────────────────────────────────

    pub fn create<I, P>(
        &mut self,
        kind: RunKind,
        players: I,
        identity: &dyn IdentityProvider,
    ) -> CalcResult<RunEvent>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let creator = identity.current_identity();
        let run = Run::new(kind, players, creator.clone(), self.clock.now())?;
        let run_id = self.fresh_id()?;

        self.store.put(&run_id, &run)?;
        log::info!("run {run_id}: created ({kind}) by {creator} with {} players", run.player_count());

        let event = RunEvent::RunCreated {
            run_id:     run_id.clone(),
            kind,
            players:    run.players.clone(),
            created_by: creator,
        };
        self.runs.insert(run_id, run);
        Ok(event)
    }

    /// Duplicate names are reported, not rejected.
    pub fn add_player(&mut self, run_id: &str, player: &str) -> CalcResult<RunEvent> {
        let player = player.trim();
        if player.is_empty() {
            return Err(CalcError::invalid("player name must not be empty"));
        }
        let mut run = self.require(run_id)?.clone();
        if !run.push_player(player) {
            log::info!("run {run_id}: {player} already in roster");
            return Ok(RunEvent::DuplicatePlayer {
                run_id: run_id.to_string(),
                player: player.to_string(),
            });
        }

        self.store.put(run_id, &run)?;
        log::info!("run {run_id}: added player {player}");

        let event = RunEvent::PlayerAdded {
            run_id: run_id.to_string(),
            player: player.to_string(),
            roster: run.players.clone(),
        };
        self.runs.insert(run_id.to_string(), run);
        Ok(event)
    }

    pub fn add_amount(
        &mut self,
        run_id: &str,
        resource: ResourceChannel,
        amount: f64,
    ) -> CalcResult<RunEvent> {
        let mut run = self.require(run_id)?.clone();
        let new_total = run.amounts.add(resource, amount)?;

        self.store.put(run_id, &run)?;
        log::info!("run {run_id}: {resource} += {amount} (now {new_total})");

        self.runs.insert(run_id.to_string(), run);
        Ok(RunEvent::AmountAdded {
            run_id: run_id.to_string(),
            resource,
            amount,
            new_total,
        })
    }

    /// Only the creator or a privileged identity may delete.
    pub fn delete(&mut self, run_id: &str, identity: &dyn IdentityProvider) -> CalcResult<RunEvent> {
        let run = self.require(run_id)?;
        let user = identity.current_identity();
        if !may_delete(identity, &run.created_by) {
            log::warn!("run {run_id}: delete by {user} refused (creator {})", run.created_by);
            return Err(CalcError::PermissionDenied {
                run_id:  run_id.to_string(),
                user,
                creator: run.created_by.clone(),
            });
        }

        self.store.delete(run_id)?;
        self.runs.remove(run_id);
        log::info!("run {run_id}: deleted by {user}");
        Ok(RunEvent::RunDeleted {
            run_id:     run_id.to_string(),
            deleted_by: user,
        })
    }

    // ── Reads ─────────────────────────────────────────────────────

    pub fn calculate(&self, run_id: &str, params: &CalcParams) -> CalcResult<RunCalculation> {
        let run = self.require(run_id)?;
        let calculation = run.calculation()?;
        // Legacy files may carry an empty roster; split as a single share.
        let players = run.player_count().max(1);
        let report = Calculator::new(&self.config).calculate(calculation, players, params)?;
        log::debug!("run {run_id}: calculated {}", run.kind);
        Ok(RunCalculation {
            run_id:  run_id.to_string(),
            players: run.players.clone(),
            report,
        })
    }

    pub fn view(&self, run_id: &str) -> CalcResult<RunSummary> {
        let run = self.require(run_id)?;
        Ok(RunSummary::new(run_id, run))
    }

    pub fn list(&self) -> Vec<RunListing> {
        self.runs
            .iter()
            .map(|(run_id, run)| RunListing {
                run_id:       run_id.clone(),
                kind:         run.kind,
                player_count: run.player_count(),
                created_by:   run.created_by.clone(),
            })
            .collect()
    }

    // ── Dispatch ──────────────────────────────────────────────────

    /// Execute one front-end command on behalf of `identity`.
    pub fn execute(
        &mut self,
        command: RunCommand,
        identity: &dyn IdentityProvider,
    ) -> CalcResult<CommandOutcome> {
        let name = command.name();
        let mutates = command.mutates();
        let outcome = match command {
            RunCommand::Create { kind, players } => {
                self.create(kind, players, identity).map(CommandOutcome::Event)
            }
            RunCommand::AddPlayer { run_id, player } => {
                self.add_player(&run_id, &player).map(CommandOutcome::Event)
            }
            RunCommand::AddAmount { run_id, resource, amount } => {
                self.add_amount(&run_id, resource, amount).map(CommandOutcome::Event)
            }
            RunCommand::View { run_id } => self.view(&run_id).map(CommandOutcome::View),
            RunCommand::List => Ok(CommandOutcome::List(self.list())),
            RunCommand::Delete { run_id } => {
                self.delete(&run_id, identity).map(CommandOutcome::Event)
            }
            RunCommand::Calculate { run_id, params } => {
                self.calculate(&run_id, &params).map(CommandOutcome::Calculation)
            }
        };
        match &outcome {
            Err(e) => log::warn!("command {name} rejected: {e}"),
            Ok(_) if mutates => log::debug!("command {name} applied; {} runs stored", self.runs.len()),
            Ok(_) => {}
        }
        outcome
    }

    // ── Internals ─────────────────────────────────────────────────

    fn require(&self, run_id: &str) -> CalcResult<&Run> {
        self.runs.get(run_id).ok_or_else(|| CalcError::RunNotFound {
            run_id: run_id.to_string(),
        })
    }

    fn fresh_id(&mut self) -> CalcResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let run_id = self.ids.next_run_id();
            if !self.runs.contains_key(&run_id) {
                return Ok(run_id);
            }
            log::debug!("run id {run_id} already taken; drawing again");
        }
        Err(anyhow::anyhow!("could not draw an unused run id after {MAX_ID_ATTEMPTS} attempts").into())
    }
}
