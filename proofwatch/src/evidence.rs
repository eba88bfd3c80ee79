//! Evidence interface

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;

/// Compliance evidence that can be emitted as telemetry.
///
/// Implementations normalize a source format into the shared attribute
/// vocabulary; the logger turns one evidence object into a log record, a
/// span event, and a counter increment.
pub trait Evidence {
    /// Serialize the evidence to JSON for the log body.
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error>;

    /// The evidence as semantic-convention attributes.
    fn attributes(&self) -> Vec<KeyValue>;

    /// When the evidence was generated or collected.
    fn timestamp(&self) -> DateTime<Utc>;
}
