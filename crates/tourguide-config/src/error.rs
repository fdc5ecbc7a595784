//! Errors raised while reading `tourguide.json5` layers.

use thiserror::Error;

/// Failure to produce a usable tour guide configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    #[error("cannot read tourguide config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A layer is not valid JSON5.
    #[error("tourguide config is not valid JSON5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged layers do not match the config model.
    #[error("tourguide config does not match the expected shape: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field is missing its expected type or holds an unknown key.
    /// `path` is `<layer>:<dotted.path>`.
    #[error("bad tourguide config field {path}: {message}")]
    InvalidField { path: String, message: String },
    /// The merged config breaks a cross-field rule (catalogue, chat limits).
    #[error("tourguide config rejected: {0}")]
    Invalid(String),
}
