//! Compass Configuration

use std::path::Path;

use beacon_common::BeaconResult;
use serde::{Deserialize, Serialize};

/// Compass service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompassConfig {
    /// Mapper plugins, one per policy engine.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
    /// TLS certificate configuration.
    #[serde(default, rename = "certConfig")]
    pub certificate: CertConfig,
}

/// One mapper plugin entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin id; matched against the policy engine name at dispatch.
    pub id: String,
    /// Directory of assessment plan files for this plugin.
    #[serde(default, rename = "evaluations-dir")]
    pub evaluations_dir: String,
}

/// TLS certificate paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertConfig {
    /// Path to the PEM certificate.
    #[serde(default)]
    pub cert: String,
    /// Path to the PEM private key.
    #[serde(default)]
    pub key: String,
}

impl CompassConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> BeaconResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}
