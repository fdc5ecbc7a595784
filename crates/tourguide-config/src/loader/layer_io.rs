//! Reading `tourguide.json5` layers from the home directory, the cwd and `--config` paths.

use super::{ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_FILE, LoadedLayer, schema};
use crate::{ConfigError, DEFAULT_HOME_DIR};
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read the user or cwd layer; a missing file just means the layer is skipped.
pub(super) fn load_optional_layer(
    source: ConfigLayerSource,
    path: Option<&Path>,
) -> Result<Option<LoadedLayer>, ConfigError> {
    let Some(path) = path else {
        return Ok(None);
    };

    if path.exists() {
        return load_required_layer(source, path).map(Some);
    }
    debug!(
        "no tourguide.json5 for {} layer at {}",
        source_name(source),
        path.display()
    );
    Ok(None)
}

/// Read and schema-check one layer. Runtime (`--config`) layers always come through here.
pub(super) fn load_required_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    debug!(
        "reading {} config layer from {}",
        source_name(source),
        path.display()
    );
    let contents = fs::read_to_string(path)?;
    let value: Value = json5::from_str(&contents)?;
    schema::validate_layer_schema(&value, &layer_label(source, path))?;
    Ok(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    })
}

fn source_name(source: ConfigLayerSource) -> &'static str {
    match source {
        ConfigLayerSource::User => "user",
        ConfigLayerSource::Cwd => "cwd",
        ConfigLayerSource::Runtime => "runtime",
    }
}

/// Prefix for field errors, e.g. `cwd(./tourguide.json5)`.
fn layer_label(source: ConfigLayerSource, path: &Path) -> String {
    format!("{}({})", source_name(source), path.display())
}

/// `~/.tourguide/tourguide.json5`, when a home directory is known.
pub(super) fn default_user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_HOME_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}

/// Canonical form used to avoid loading the same file as two layers (e.g. when cwd is `~/.tourguide`).
pub(super) fn unique_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
