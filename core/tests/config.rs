//! Ratio table loading and validation.

use refinery_core::{config::RefineryConfig, conversion::TimeScaling};
use std::{fs, path::PathBuf};

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("refinery-config-{}", uuid::Uuid::new_v4().simple()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// The shipped data/refinery.json matches the built-in table.
#[test]
fn shipped_config_matches_standard() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
    let config = RefineryConfig::load(data_dir).unwrap();
    assert_eq!(config, RefineryConfig::standard());
}

#[test]
fn admins_and_time_scaling_are_read() {
    let dir = scratch_dir();
    let mut config = RefineryConfig::standard();
    config.admins = vec!["quartermaster".into()];
    config.landsraad.time_scaling = TimeScaling::Scaled;
    fs::write(dir.join("refinery.json"), serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = RefineryConfig::load(dir.to_str().unwrap()).unwrap();
    assert_eq!(loaded.admins, vec!["quartermaster".to_string()]);
    assert_eq!(loaded.landsraad.time_scaling, TimeScaling::Scaled);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn out_of_range_discount_is_rejected() {
    let dir = scratch_dir();
    let mut config = RefineryConfig::standard();
    config.landsraad.multiplier = 1.5;
    fs::write(dir.join("refinery.json"), serde_json::to_string(&config).unwrap()).unwrap();

    let err = RefineryConfig::load(dir.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Invalid"), "{err}");
    fs::remove_dir_all(dir).ok();
}

#[test]
fn zero_ratio_is_rejected() {
    let mut config = RefineryConfig::standard();
    config.fiber.input_per_output = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = scratch_dir();
    assert!(RefineryConfig::load(dir.to_str().unwrap()).is_err());
    fs::remove_dir_all(dir).ok();
}

#[test]
fn discount_only_when_requested() {
    let config = RefineryConfig::standard();
    assert_eq!(config.crafting_efficiency(false).multiplier, 1.0);
    assert_eq!(config.crafting_efficiency(true).multiplier, 0.75);
}
