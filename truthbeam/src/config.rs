//! Processor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};

/// Default request timeout for the upstream enrichment call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the TruthBeam processor.
///
/// Durations are expressed in seconds when deserialized from pipeline
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruthBeamConfig {
    /// Base URL of the Compass enrichment service. Required.
    #[serde(default)]
    pub endpoint: String,
    /// Upstream request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// Cache TTL for compliance metadata. Zero means use the default
    /// (24 hours; compliance metadata changes infrequently).
    #[serde(default, with = "duration_secs")]
    pub cache_ttl: Duration,
    /// Cache capacity in entries. Zero means use the default (100 000).
    #[serde(default)]
    pub cache_capacity: u64,
}

impl Default for TruthBeamConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl TruthBeamConfig {
    /// Check the configuration and normalize zero values to defaults.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.cache_ttl.is_zero() {
            self.cache_ttl = DEFAULT_CACHE_TTL;
        }
        if self.cache_capacity == 0 {
            self.cache_capacity = DEFAULT_CACHE_CAPACITY;
        }
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        Ok(())
    }
}

/// Configuration validation error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The enrichment endpoint was not set.
    #[error("endpoint must be specified")]
    MissingEndpoint,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_endpoint() {
        let mut config = TruthBeamConfig {
            endpoint: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_normalizes_zero_values() {
        let mut config = TruthBeamConfig {
            endpoint: "https://compass.internal:8080".into(),
            timeout: Duration::ZERO,
            cache_ttl: Duration::ZERO,
            cache_capacity: 0,
        };
        config.validate().unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_deserialize_from_pipeline_yaml() {
        let yaml = r#"
endpoint: https://compass.internal:8080
timeout: 10
cache_ttl: 3600
cache_capacity: 500
"#;
        let config: TruthBeamConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.endpoint, "https://compass.internal:8080");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_capacity, 500);
    }

    #[test]
    fn test_defaults() {
        let config = TruthBeamConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.cache_capacity, 100_000);
    }
}
