//! Tests for layered configuration loading.

use super::*;
use crate::StorageProvider;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that never touch the real home directory.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = TourGuideConfig::load_from_str("{}").expect("config");
    assert_eq!(config.storage.provider, StorageProvider::File);
    assert_eq!(config.chat.title_max_chars, 50);
    assert_eq!(config.chat.preview_max_chars, 80);
    assert_eq!(config.backend.chat_url(), "http://localhost:8000/chat");
    assert!(config.campus.buildings.is_empty());
}

#[test]
fn greeting_substitutes_building() {
    let config =
        TourGuideConfig::load_from_str(r#"{ chat: { greeting: "About {building}?" } }"#)
            .expect("config");
    assert_eq!(config.chat.greeting_for("Tepper"), "About Tepper?");
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = TourGuideConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_schema_pointer_key() {
    let err = TourGuideConfig::load_from_str(r#"{ "$schema": "./tourguide.schema.json" }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_invalid_storage_provider() {
    let err = TourGuideConfig::load_from_str(r#"{ storage: { provider: "sqlite" } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("storage.provider"));
}

#[test]
fn rejects_non_string_building() {
    let err = TourGuideConfig::load_from_str("{ campus: { buildings: [\"Gates\", 3] } }")
        .unwrap_err();
    assert!(format!("{err}").contains("campus.buildings[1]"));
}

#[test]
fn rejects_reserved_and_duplicate_buildings() {
    let err = TourGuideConfig::load_from_str(r#"{ campus: { buildings: ["Error"] } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("reserved"));

    let err = TourGuideConfig::load_from_str(r#"{ campus: { buildings: ["Gates", "Gates"] } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("duplicate"));
}

#[test]
fn chat_url_joins_slashes() {
    let config = TourGuideConfig::load_from_str(
        r#"{ backend: { base_url: "https://tour.example/", chat_path: "/v1/chat" } }"#,
    )
    .expect("config");
    assert_eq!(config.backend.chat_url(), "https://tour.example/v1/chat");
}

#[test]
fn layered_config_prefers_cwd_over_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("project");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(
        &user_config,
        r#"{ storage: { provider: "memory" }, campus: { buildings: ["Gates", "Hunt"] } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ campus: { buildings: ["Tepper"] } }"#,
    );

    let mut options = isolated_options(&cwd);
    options.user_config_path = Some(user_config);
    let layered = TourGuideConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.layers.len(), 2);
    assert_eq!(layered.config.storage.provider, StorageProvider::Memory);
    assert_eq!(layered.config.campus.buildings, vec!["Tepper".to_string()]);
}

#[test]
fn runtime_layer_applies_last() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("cwd");
    fs::create_dir_all(&cwd).expect("cwd");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ backend: { base_url: "http://cwd" } }"#,
    );
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, r#"{ backend: { base_url: "http://runtime" } }"#);

    let options = isolated_options(&cwd).with_runtime_path(&runtime);
    let layered = TourGuideConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.backend.base_url, "http://runtime");
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Runtime)
    );
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = TourGuideConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn layer_schema_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        "{ chat: { title_max_chars: \"long\" } }",
    );
    let err = TourGuideConfig::load_layered_with_options(isolated_options(temp.path()))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("chat.title_max_chars"));
}
