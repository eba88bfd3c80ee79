//! ProofWatch - compliance evidence telemetry
//!
//! Emits compliance evidence as correlated OpenTelemetry signals: one log
//! record carrying the evidence attributes and JSON body, a span around the
//! emission with an `evidence.logged` event, and processed/dropped
//! counters. Providers are injected at construction so tests can run
//! against local instances; the globals are the default.

use std::time::SystemTime;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity};
use opentelemetry::metrics::Meter;
use opentelemetry::trace::{Span, Tracer};
use opentelemetry::{Array, Key, KeyValue, Value};
use thiserror::Error;

pub mod evidence;
pub mod gemara;
pub mod metrics;
pub mod ocsf;

pub use evidence::Evidence;
pub use gemara::GemaraEvidence;
pub use metrics::EvidenceObserver;
pub use ocsf::OcsfEvidence;

/// Instrumentation scope name.
pub const SCOPE_NAME: &str = "beacon/proofwatch";

/// Evidence logging failure.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// The evidence could not be serialized for the log body.
    #[error("failed to serialize evidence: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Evidence logger over OpenTelemetry log, trace, and metric signals.
pub struct ProofWatch {
    logger: Box<dyn Logger + Send + Sync>,
    tracer: BoxedTracer,
    observer: EvidenceObserver,
    severity: Severity,
}

impl ProofWatch {
    /// Create a logger using the global telemetry providers and the
    /// default severity (Info).
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start building a logger with custom providers.
    pub fn builder() -> ProofWatchBuilder {
        ProofWatchBuilder::default()
    }

    /// Log evidence at the configured severity.
    pub fn log(&self, evidence: &dyn Evidence) -> Result<(), EvidenceError> {
        self.log_with_severity(evidence, self.severity)
    }

    /// Log evidence at an explicit severity.
    pub fn log_with_severity(
        &self,
        evidence: &dyn Evidence,
        severity: Severity,
    ) -> Result<(), EvidenceError> {
        let mut span = self.tracer.start("evidence.log_evidence");
        let attrs = evidence.attributes();

        let json = match evidence.to_json() {
            Ok(json) => json,
            Err(e) => {
                self.observer.dropped(&attrs);
                span.end();
                return Err(e.into());
            }
        };

        let record = LogRecord::builder()
            .with_severity_number(severity)
            .with_severity_text(severity.name())
            .with_observed_timestamp(SystemTime::now())
            .with_timestamp(SystemTime::from(evidence.timestamp()))
            .with_attributes(to_log_attributes(&attrs))
            // Retains the original payload for downstream flexibility.
            .with_body(AnyValue::from(String::from_utf8_lossy(&json).into_owned()))
            .build();

        span.add_event("evidence.logged", attrs.clone());
        self.logger.emit(record);
        self.observer.processed(&attrs);

        span.end();
        Ok(())
    }
}

impl Default for ProofWatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ProofWatch`] with optional provider overrides.
#[derive(Default)]
pub struct ProofWatchBuilder {
    meter: Option<Meter>,
    tracer: Option<BoxedTracer>,
    logger: Option<Box<dyn Logger + Send + Sync>>,
    severity: Option<Severity>,
}

impl ProofWatchBuilder {
    /// Use a specific meter instead of the global one.
    pub fn with_meter(mut self, meter: Meter) -> Self {
        self.meter = Some(meter);
        self
    }

    /// Use a specific tracer instead of the global one.
    pub fn with_tracer(mut self, tracer: BoxedTracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Use a specific logger instead of the global one.
    pub fn with_logger(mut self, logger: Box<dyn Logger + Send + Sync>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Default severity for [`ProofWatch::log`].
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Build the logger, falling back to the global providers.
    pub fn build(self) -> ProofWatch {
        let meter = self.meter.unwrap_or_else(|| global::meter(SCOPE_NAME));
        let tracer = self.tracer.unwrap_or_else(|| global::tracer(SCOPE_NAME));
        let logger = self
            .logger
            .unwrap_or_else(|| Box::new(global::logger_provider().logger(SCOPE_NAME)));

        ProofWatch {
            observer: EvidenceObserver::new(&meter),
            tracer,
            logger,
            severity: self.severity.unwrap_or(Severity::Info),
        }
    }
}

/// Convert span/metric attributes into log record attributes.
fn to_log_attributes(attrs: &[KeyValue]) -> Vec<(Key, AnyValue)> {
    attrs
        .iter()
        .map(|kv| (kv.key.clone(), to_any_value(&kv.value)))
        .collect()
}

fn to_any_value(value: &Value) -> AnyValue {
    match value {
        Value::Bool(b) => AnyValue::Boolean(*b),
        Value::I64(i) => AnyValue::Int(*i),
        Value::F64(f) => AnyValue::Double(*f),
        Value::String(s) => AnyValue::String(s.clone()),
        Value::Array(array) => AnyValue::ListAny(array_values(array)),
        other => AnyValue::String(other.to_string().into()),
    }
}

fn array_values(array: &Array) -> Vec<AnyValue> {
    match array {
        Array::Bool(values) => values.iter().map(|v| AnyValue::Boolean(*v)).collect(),
        Array::I64(values) => values.iter().map(|v| AnyValue::Int(*v)).collect(),
        Array::F64(values) => values.iter().map(|v| AnyValue::Double(*v)).collect(),
        Array::String(values) => values.iter().map(|v| AnyValue::String(v.clone())).collect(),
        other => vec![AnyValue::String(other.to_string().into())],
    }
}
