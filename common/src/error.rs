//! Error types for Beacon

use std::path::PathBuf;

use thiserror::Error;

/// Beacon error type
#[derive(Error, Debug)]
pub enum BeaconError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Plugin evaluations directory is missing or not a directory
    #[error("evaluations directory {path:?} for plugin {plugin}: {reason}")]
    InvalidPlanDir {
        /// The configured path.
        path: PathBuf,
        /// The plugin the path belongs to.
        plugin: String,
        /// Why the path was rejected.
        reason: String,
    },
}

/// Result type for Beacon
pub type BeaconResult<T> = Result<T, BeaconError>;
