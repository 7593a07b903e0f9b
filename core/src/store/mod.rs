//! Run persistence.
//!
//! RULE: Only the store module touches files or the database.
//! The manager calls repository methods and never does I/O itself.
//!
//! Two interchangeable backends:
//!   - `JsonFileStore`: one pretty-printed JSON object keyed by run id,
//!     rewritten whole on every save. Compatible with legacy run files.
//!   - `SqliteStore`:   the same collection in an embedded database.

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::{error::CalcResult, run::Run, types::RunId};
use std::collections::BTreeMap;

/// The whole run collection, ordered by identifier.
pub type RunMap = BTreeMap<RunId, Run>;

/// Key-value access to runs. Last writer wins; no cross-process locking.
///
/// Backends must provide `load` and `save`. The single-run methods default
/// to a full read-modify-write and may be overridden with cheaper versions.
pub trait RunRepository {
    fn load(&self) -> CalcResult<RunMap>;

    fn save(&self, runs: &RunMap) -> CalcResult<()>;

    fn get(&self, run_id: &str) -> CalcResult<Option<Run>> {
        Ok(self.load()?.remove(run_id))
    }

    fn put(&self, run_id: &str, run: &Run) -> CalcResult<()> {
        let mut runs = self.load()?;
        runs.insert(run_id.to_string(), run.clone());
        self.save(&runs)
    }

    /// Returns whether a run was removed.
    fn delete(&self, run_id: &str) -> CalcResult<bool> {
        let mut runs = self.load()?;
        if runs.remove(run_id).is_none() {
            return Ok(false);
        }
        self.save(&runs)?;
        Ok(true)
    }
}
