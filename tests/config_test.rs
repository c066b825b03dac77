//! Integration tests for Settings loading and their effect on new nodes.
//!
//! These tests run without a global config, so a local file layers
//! directly over compiled defaults.

use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use branching_range::config::Settings;
use branching_range::domain::{Interval, RangeForest};
use branching_range::Error;

/// Settings::load reads the process environment; loads in this file take
/// the lock so env overrides set by one test never leak into another.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("branching-range.toml");
    fs::write(&path, "split_capacity = 3\ndefault_weight = 2.5\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.split_capacity, Some(3));
    assert_eq!(settings.branch_capacity, None);
    assert_eq!(settings.default_weight, 2.5);
}

#[test]
fn given_missing_local_config_when_load_then_config_error() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn given_malformed_config_when_load_then_config_error_names_file() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "split_capacity = \"many\"\n").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(err.to_string().contains("broken.toml"), "{}", err);
}

#[test]
fn given_settings_when_serialized_then_round_trips() {
    let settings = Settings {
        split_capacity: Some(8),
        branch_capacity: Some(2),
        default_weight: 1.0,
    };

    let text = settings.to_toml().expect("serialize");

    assert!(text.contains("split_capacity = 8"));
    assert_eq!(Settings::from_toml(&text).unwrap(), settings);
}

#[test]
fn given_loaded_settings_when_forest_built_then_capacities_enforced() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("branching-range.toml");
    fs::write(&path, "split_capacity = 2\nbranch_capacity = 1\n").unwrap();
    let settings = Settings::load(Some(path.as_path())).unwrap();

    let mut forest: RangeForest<String, i64> = RangeForest::with_settings(settings);
    let root = forest.insert_root(Interval::closed_open(0, 100).unwrap());
    forest.split_range(root, 1, 50).unwrap();

    assert!(forest.split_range(root, 2, 75).is_err());
    let branch = forest.add_branch_at(root, 1, 60).unwrap();
    assert!(forest.add_branch_at(root, 1, 70).is_err());
    assert_eq!(forest.node(branch).unwrap().split_capacity(), Some(2));
}

#[test]
fn given_env_overrides_when_load_then_env_wins_over_file() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("branching-range.toml");
    fs::write(&path, "split_capacity = 3\nbranch_capacity = 2\ndefault_weight = 2.5\n").unwrap();
    env::set_var("BRANCHING_RANGE__SPLIT_CAPACITY", "7");
    env::set_var("BRANCHING_RANGE__DEFAULT_WEIGHT", "4.5");

    let result = Settings::load(Some(path.as_path()));
    let defaults_only = Settings::load(None);

    env::remove_var("BRANCHING_RANGE__SPLIT_CAPACITY");
    env::remove_var("BRANCHING_RANGE__DEFAULT_WEIGHT");

    let settings = result.expect("load settings");
    assert_eq!(settings.split_capacity, Some(7));
    assert_eq!(settings.branch_capacity, Some(2));
    assert_eq!(settings.default_weight, 4.5);

    let settings = defaults_only.expect("load settings");
    assert_eq!(settings.split_capacity, Some(7));
    assert_eq!(settings.branch_capacity, None);
    assert_eq!(settings.default_weight, 4.5);
}
