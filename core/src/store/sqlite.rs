use super::{RunMap, RunRepository};
use crate::{
    error::{CalcError, CalcResult},
    run::{ResourceLedger, Run},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values, converted to a `Run` outside the row closure.
struct RunRow {
    run_id:     String,
    kind:       String,
    created_by: String,
    created_at: String,
    amounts:    ResourceLedger,
}

const SELECT_RUN: &str =
    "SELECT run_id, kind, created_by, created_at, spice, stravidium, titanium, plastanium
     FROM run";

impl SqliteStore {
    /// Open (or create) the run database at `path`.
    pub fn open(path: &str) -> CalcResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; ignore failures elsewhere.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CalcResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> CalcResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_runs.sql"))?;
        Ok(())
    }

    pub fn run_count(&self) -> CalcResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
        Ok(count)
    }

    // ── Row mapping ───────────────────────────────────────────────

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRow> {
        Ok(RunRow {
            run_id:     row.get(0)?,
            kind:       row.get(1)?,
            created_by: row.get(2)?,
            created_at: row.get(3)?,
            amounts: ResourceLedger {
                spice:      row.get(4)?,
                stravidium: row.get(5)?,
                titanium:   row.get(6)?,
                plastanium: row.get(7)?,
            },
        })
    }

    fn players_for(&self, run_id: &str) -> CalcResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM run_player WHERE run_id = ?1 ORDER BY position ASC",
        )?;
        let names = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn hydrate(&self, row: RunRow) -> CalcResult<(String, Run)> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| CalcError::invalid(format!(
                "run {} has an unreadable created_at '{}': {e}",
                row.run_id, row.created_at
            )))?
            .with_timezone(&Utc);
        let run = Run {
            kind:       row.kind.parse()?,
            players:    self.players_for(&row.run_id)?,
            amounts:    row.amounts,
            created_by: row.created_by,
            created_at,
        };
        Ok((row.run_id, run))
    }

    // ── Writes ────────────────────────────────────────────────────

    fn write_run(conn: &Connection, run_id: &str, run: &Run) -> CalcResult<()> {
        conn.execute(
            "INSERT INTO run (run_id, kind, created_by, created_at, spice, stravidium, titanium, plastanium)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (run_id) DO UPDATE SET
                 kind = excluded.kind,
                 created_by = excluded.created_by,
                 created_at = excluded.created_at,
                 spice = excluded.spice,
                 stravidium = excluded.stravidium,
                 titanium = excluded.titanium,
                 plastanium = excluded.plastanium",
            params![
                run_id,
                run.kind.as_str(),
                run.created_by,
                run.created_at.to_rfc3339(),
                run.amounts.spice,
                run.amounts.stravidium,
                run.amounts.titanium,
                run.amounts.plastanium,
            ],
        )?;
        conn.execute("DELETE FROM run_player WHERE run_id = ?1", params![run_id])?;
        for (position, name) in run.players.iter().enumerate() {
            conn.execute(
                "INSERT INTO run_player (run_id, position, name) VALUES (?1, ?2, ?3)",
                params![run_id, position as i64, name],
            )?;
        }
        Ok(())
    }

    fn remove_run(conn: &Connection, run_id: &str) -> CalcResult<bool> {
        conn.execute("DELETE FROM run_player WHERE run_id = ?1", params![run_id])?;
        let removed = conn.execute("DELETE FROM run WHERE run_id = ?1", params![run_id])?;
        Ok(removed > 0)
    }
}

impl RunRepository for SqliteStore {
    fn load(&self) -> CalcResult<RunMap> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_RUN} ORDER BY run_id ASC"))?;
        let rows = stmt
            .query_map([], Self::read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    /// Replace the whole collection in one transaction.
    fn save(&self, runs: &RunMap) -> CalcResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM run_player", [])?;
        tx.execute("DELETE FROM run", [])?;
        for (run_id, run) in runs {
            Self::write_run(&tx, run_id, run)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get(&self, run_id: &str) -> CalcResult<Option<Run>> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_RUN} WHERE run_id = ?1"),
                params![run_id],
                Self::read_row,
            )
            .optional()?;
        row.map(|r| self.hydrate(r).map(|(_, run)| run)).transpose()
    }

    fn put(&self, run_id: &str, run: &Run) -> CalcResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        Self::write_run(&tx, run_id, run)?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, run_id: &str) -> CalcResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = Self::remove_run(&tx, run_id)?;
        tx.commit()?;
        Ok(removed)
    }
}
