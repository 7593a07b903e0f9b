//! Run repositories: flat JSON file and SQLite.

use chrono::{TimeZone, Utc};
use refinery_core::{
    error::CalcError,
    run::{Run, RunKind},
    store::{JsonFileStore, RunMap, RunRepository, SqliteStore},
};
use std::{fs, path::PathBuf};

fn scratch_file() -> PathBuf {
    std::env::temp_dir().join(format!("refinery-store-{}.json", uuid::Uuid::new_v4().simple()))
}

fn sample_run(kind: RunKind, players: &[&str]) -> Run {
    let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
    Run::new(kind, players.iter().copied(), "alice".into(), at).unwrap()
}

fn sqlite() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

#[test]
fn missing_json_file_loads_empty() {
    let store = JsonFileStore::new(scratch_file());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn json_store_round_trips_collection() {
    let path = scratch_file();
    let store = JsonFileStore::new(&path);

    let mut run = sample_run(RunKind::Plastanium, &["Ana", "Bo"]);
    run.amounts.stravidium = 900.0;
    run.amounts.titanium = 1_000.5;
    store.put("a1b2c3d4", &run).unwrap();
    store.put("00ff00ff", &sample_run(RunKind::Spice, &["Cy"])).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded["a1b2c3d4"], run);
    assert!(!path.with_extension("json.tmp").exists(), "staging file left behind");

    assert!(store.delete("00ff00ff").unwrap());
    assert!(!store.delete("00ff00ff").unwrap());
    assert_eq!(store.load().unwrap().len(), 1);
    fs::remove_file(path).ok();
}

/// Files written before runs carried a creator still load.
#[test]
fn legacy_json_without_creator_loads() {
    let path = scratch_file();
    fs::write(
        &path,
        r#"{
          "3f9c01ab": {
            "kind": "stravidium",
            "players": ["Ana", "Bo"],
            "amounts": {"spice": 0, "stravidium": 901, "titanium": 40, "plastanium": 0}
          }
        }"#,
    )
    .unwrap();

    let runs = JsonFileStore::new(&path).load().unwrap();
    let run = &runs["3f9c01ab"];
    assert_eq!(run.kind, RunKind::Stravidium);
    assert_eq!(run.players, vec!["Ana", "Bo"]);
    assert_eq!(run.amounts.stravidium, 901.0);
    assert!(run.created_by.is_empty());
    fs::remove_file(path).ok();
}

#[test]
fn corrupt_json_file_is_an_error() {
    let path = scratch_file();
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        JsonFileStore::new(&path).load(),
        Err(CalcError::Serialization(_))
    ));
    fs::remove_file(path).ok();
}

#[test]
fn sqlite_put_get_delete() {
    let store = sqlite();
    let mut run = sample_run(RunKind::Spice, &["Ana", "Bo", "Cy"]);
    store.put("cafebabe", &run).unwrap();
    assert_eq!(store.get("cafebabe").unwrap(), Some(run.clone()));

    // Overwrite keeps a single row and the new roster order.
    run.push_player("Di");
    run.amounts.spice = 25_000.0;
    store.put("cafebabe", &run).unwrap();
    assert_eq!(store.run_count().unwrap(), 1);
    let stored = store.get("cafebabe").unwrap().unwrap();
    assert_eq!(stored.players, vec!["Ana", "Bo", "Cy", "Di"]);
    assert_eq!(stored.amounts.spice, 25_000.0);
    assert_eq!(stored.created_at, run.created_at);

    assert!(store.delete("cafebabe").unwrap());
    assert!(!store.delete("cafebabe").unwrap());
    assert_eq!(store.get("cafebabe").unwrap(), None);
}

#[test]
fn sqlite_save_replaces_collection() {
    let store = sqlite();
    store.put("11111111", &sample_run(RunKind::Spice, &["Ana"])).unwrap();

    let mut runs = RunMap::new();
    runs.insert("22222222".into(), sample_run(RunKind::Stravidium, &["Bo"]));
    runs.insert("33333333".into(), sample_run(RunKind::Plastanium, &["Cy", "Di"]));
    store.save(&runs).unwrap();

    assert_eq!(store.load().unwrap(), runs);
}
