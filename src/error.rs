// ABOUTME: Application-wide error types for imgprobe.
// ABOUTME: Fatal errors stop the run; per-profile errors live in the probe module.

use crate::runtime::RuntimeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the whole invocation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "container engine is not reachable: {0}\nPlease start the Docker daemon and try again."
    )]
    EngineUnavailable(#[from] RuntimeError),

    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),
}

/// Problems loading profiles or resolving the requested target. Always raised
/// before the engine is contacted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("target cannot be empty")]
    EmptyTarget,

    #[error("unknown profile: {0} (pass an image reference such as alpine:latest for an ad hoc run)")]
    UnknownProfile(String),

    #[error("invalid name '{0}': must contain only letters and digits")]
    InvalidName(String),

    #[error("invalid image reference '{input}': {source}")]
    InvalidImage {
        input: String,
        #[source]
        source: crate::types::ParseImageRefError,
    },

    #[error("cannot derive an image tag from '{input}': {source}")]
    InvalidTag {
        input: String,
        #[source]
        source: crate::types::ImageTagError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
