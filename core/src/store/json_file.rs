use super::{RunMap, RunRepository};
use crate::error::CalcResult;
use std::{
    fs,
    path::PathBuf,
};

/// Flat JSON file: `{ "<run_id>": { "kind": …, "players": […], "amounts": {…} } }`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl RunRepository for JsonFileStore {
    /// A missing file is an empty collection.
    fn load(&self) -> CalcResult<RunMap> {
        if !self.path.exists() {
            log::debug!("{} does not exist yet; starting empty", self.path.display());
            return Ok(RunMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RunMap::new());
        }
        let runs: RunMap = serde_json::from_str(&content)?;
        log::debug!("Loaded {} runs from {}", runs.len(), self.path.display());
        Ok(runs)
    }

    /// Whole-file overwrite via a staging file and rename.
    fn save(&self, runs: &RunMap) -> CalcResult<()> {
        let json = serde_json::to_string_pretty(runs)?;
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        log::debug!("Saved {} runs to {}", runs.len(), self.path.display());
        Ok(())
    }
}
