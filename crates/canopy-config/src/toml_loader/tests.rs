//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_canopy_config.toml"));
    assert!(matches!(
        result,
        Err(canopy_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[frames]
hello_timeout_ms = 3000

[hibernation.maximum_active_workspaces]
threshold = 4
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.frames.hello_timeout_ms, 3000);
    assert_eq!(
        config
            .hibernation
            .maximum_active_workspaces
            .map(|c| c.threshold),
        Some(4)
    );
    // Defaults preserved
    assert_eq!(config.frames.window_load_timeout_ms, 5000);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(canopy_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn parse_fills_missing_sections() {
    let config = parse("[logging]\nlevel = \"debug\"\n").unwrap();
    assert_eq!(config.logging.level.directive(), "canopy=debug");
    assert_eq!(config.frames.request_timeout_ms, 10_000);
    assert!(config.layouts.directory.is_none());
}

#[test]
fn out_of_range_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[frames]\nhello_timeout_ms = 10\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.frames.hello_timeout_ms, 10);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canopy").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.frames.hello_timeout_ms, 15_000);
    assert!(!config.hibernation.is_enabled());
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;

    let config = parse(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("canopy"));
        assert!(path_str.ends_with("config.toml"));
    }
}
