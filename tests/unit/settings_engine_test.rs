//! Integration-level unit tests for the SettingsEngine public API.

use serde_json::json;
use tabmix::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabmix::types::errors::SettingsError;
use tabmix::types::settings::TabMixSettings;
use tempfile::TempDir;

fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    assert_eq!(engine.load().unwrap(), TabMixSettings::default());
}

#[test]
fn test_defaults_match_stock_layout() {
    let s = TabMixSettings::default();
    assert_eq!(s.window.width, 1200);
    assert_eq!(s.window.height, 800);
    assert_eq!(s.tabs.start_url, "https://www.youtube.com");
    assert_eq!(s.mixer.media_selector, "video");
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("mixer.media_selector", json!("video, audio"))
            .unwrap();
    }

    let mut engine = engine_in_temp(&dir);
    let loaded = engine.load().unwrap();
    assert_eq!(loaded.mixer.media_selector, "video, audio");
}

#[test]
fn test_set_value_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    assert!(matches!(
        engine.set_value("mixer.nope", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(
        engine.set_value("", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
}

#[test]
fn test_set_value_rejects_wrong_type() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    assert!(matches!(
        engine.set_value("window.width", json!("wide")),
        Err(SettingsError::InvalidValue(_))
    ));
    assert_eq!(engine.get_settings().window.width, 1200);
}

#[test]
fn test_set_value_rejects_empty_selector() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    assert!(matches!(
        engine.set_value("mixer.media_selector", json!("  ")),
        Err(SettingsError::InvalidValue(_))
    ));
    assert_eq!(engine.get_settings().mixer.media_selector, "video");
}

#[test]
fn test_mixer_height_must_fit_window() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    assert!(engine.set_value("window.mixer_height", json!(800)).is_err());
    engine.set_value("window.mixer_height", json!(300)).unwrap();
    assert_eq!(engine.get_settings().window.mixer_height, 300);
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine.set_value("tabs.label_prefix", json!("Tab")).unwrap();
    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), TabMixSettings::default());

    let mut fresh = engine_in_temp(&dir);
    assert_eq!(fresh.load().unwrap(), TabMixSettings::default());
}
