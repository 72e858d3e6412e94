//! Tests for config functionality.

use crate::config::{Config, MAX_CLEANUP_TASK_DELAY};
use crate::error::StandLockError;
use crate::world::WorldDirectory;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.data_dir, "data");
    assert!(config.worlds.is_empty());
    assert_eq!(config.armor_stand_limit, 100);
    assert!(config.auto_lock);
    assert_eq!(config.cleanup_task_delay, 1);
    assert!(config.cleanup_task_log);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
armor_stand_limit: 5
worlds: [world, world_nether]
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.armor_stand_limit, 5);
    assert_eq!(config.worlds, vec!["world", "world_nether"]);
    assert!(config.auto_lock);
    assert_eq!(config.data_dir, "data");
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = "lang: ja\nauto_lock: false\n";
    let config = Config::from_yaml(yaml).unwrap();
    assert!(!config.auto_lock);
}

#[test]
fn test_yaml_round_trip() {
    let config = Config {
        data_dir: "plugins/StandLock/data".to_string(),
        worlds: vec!["world".to_string()],
        armor_stand_limit: -1,
        auto_lock: false,
        cleanup_task_delay: -1,
        cleanup_task_log: false,
    };

    let parsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_validation_rejects_limit_below_minus_one() {
    let err = Config::from_yaml("armor_stand_limit: -2\n").unwrap_err();
    assert!(matches!(err, StandLockError::Config(_)));
    assert!(err.to_string().contains("armor_stand_limit"));
}

#[test]
fn test_validation_rejects_delay_below_minus_one() {
    let err = Config::from_yaml("cleanup_task_delay: -5\n").unwrap_err();
    assert!(err.to_string().contains("cleanup_task_delay"));
}

#[test]
fn test_validation_bounds_cleanup_delay() {
    let yaml = format!("cleanup_task_delay: {}\n", MAX_CLEANUP_TASK_DELAY);
    let config = Config::from_yaml(&yaml).unwrap();
    assert_eq!(
        config.cleanup_delay(),
        Some(Duration::from_secs(MAX_CLEANUP_TASK_DELAY as u64 * 60))
    );

    let yaml = format!("cleanup_task_delay: {}\n", MAX_CLEANUP_TASK_DELAY + 1);
    assert!(matches!(
        Config::from_yaml(&yaml),
        Err(StandLockError::Config(_))
    ));

    let err = Config::from_yaml("cleanup_task_delay: 9223372036854775807\n").unwrap_err();
    assert!(err.to_string().contains("at most"));
}

#[test]
fn test_cleanup_delay_saturates_without_validation() {
    let config = Config {
        cleanup_task_delay: i64::MAX,
        ..Config::default()
    };
    assert_eq!(config.cleanup_delay(), Some(Duration::from_secs(u64::MAX)));
}

#[test]
fn test_validation_rejects_empty_data_dir() {
    assert!(Config::from_yaml("data_dir: ''\n").is_err());
}

#[test]
fn test_validation_rejects_empty_world_name() {
    assert!(Config::from_yaml("worlds: ['']\n").is_err());
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let err = Config::from_yaml("armor_stand_limit: [").unwrap_err();
    assert!(matches!(err, StandLockError::UserError(_)));
}

#[test]
fn test_cleanup_delay() {
    let mut config = Config::default();
    assert_eq!(config.cleanup_delay(), Some(Duration::from_secs(60)));

    config.cleanup_task_delay = 0;
    assert_eq!(config.cleanup_delay(), Some(Duration::ZERO));

    config.cleanup_task_delay = -1;
    assert_eq!(config.cleanup_delay(), None);
}

#[test]
fn test_lock_limit() {
    let mut config = Config::default();
    assert_eq!(config.lock_limit(), Some(100));

    config.armor_stand_limit = -1;
    assert_eq!(config.lock_limit(), None);
}

#[test]
fn test_known_worlds_from_config() {
    let config = Config::from_yaml("worlds: [world]\n").unwrap();
    let worlds = config.known_worlds();
    assert!(worlds.world_exists("world"));
    assert!(!worlds.world_exists("nether"));
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    std::fs::write(&path, "cleanup_task_log: false\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(!config.cleanup_task_log);

    let err = Config::load(temp_dir.path().join("missing.yml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
