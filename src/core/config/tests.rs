use super::data::Config;
use super::io::ConfigError;
use crate::core::constants::{DEFAULT_TOAST_LIMIT, DEFAULT_TOAST_REMOVE_DELAY_MS};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.effective_toast_limit(), DEFAULT_TOAST_LIMIT);
    assert_eq!(
        config.effective_remove_delay(),
        Duration::from_millis(DEFAULT_TOAST_REMOVE_DELAY_MS)
    );
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        toast_limit: Some(3),
        toast_remove_delay_ms: Some(2_500),
        log_filter: Some("fonda=debug".to_string()),
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let previous = Config::mutate_at(&config_path, |config| config.toast_limit.take())
        .expect("mutate failed");
    assert_eq!(previous, Some(3));

    let reloaded = Config::load_from_path(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded.toast_limit, None);
    assert_eq!(reloaded.toast_remove_delay_ms, Some(2_500));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "toast_limit = \"many\"").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().starts_with("Invalid config in"));
}

#[test]
fn test_toast_settings_clamp_limit() {
    let config = Config {
        toast_limit: Some(0),
        toast_remove_delay_ms: Some(10),
        ..Default::default()
    };

    let settings = config.toast_settings();
    assert_eq!(settings.limit, 1);
    assert_eq!(settings.remove_delay, Duration::from_millis(10));
}

#[test]
fn test_log_filter_defaults_to_warn() {
    assert_eq!(Config::default().effective_log_filter(), "warn");
    let config = Config {
        log_filter: Some("trace".to_string()),
        ..Default::default()
    };
    assert_eq!(config.effective_log_filter(), "trace");
}

#[test]
fn test_mutate_repairs_invalid_entries() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "toast_limit = \"many\"\nlog_filter = \"fonda=debug\"\n",
    )
    .expect("write config");
    assert!(Config::load_from_path(&config_path).is_err());

    Config::mutate_at(&config_path, |config| config.toast_remove_delay_ms = Some(50))
        .expect("edit should repair the file");

    let repaired = Config::load_from_path(&config_path).expect("repaired config loads");
    assert_eq!(repaired.toast_limit, None);
    assert_eq!(repaired.toast_remove_delay_ms, Some(50));
    assert_eq!(repaired.log_filter.as_deref(), Some("fonda=debug"));
}

#[test]
fn test_mutate_refuses_malformed_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "toast_limit = [").expect("write config");

    let err = Config::mutate_at(&config_path, |config| config.toast_limit = Some(2))
        .expect_err("syntax errors are not repaired");
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert_eq!(
        std::fs::read_to_string(&config_path).expect("read config"),
        "toast_limit = ["
    );
}
