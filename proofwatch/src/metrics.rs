//! Evidence processing metrics

use opentelemetry::metrics::{Counter, Meter};
use opentelemetry::KeyValue;

/// Counters tracking evidence flowing through the logger.
pub struct EvidenceObserver {
    processed: Counter<u64>,
    dropped: Counter<u64>,
}

impl EvidenceObserver {
    /// Create the counters on the given meter.
    pub fn new(meter: &Meter) -> Self {
        let processed = meter
            .u64_counter("evidence_processed_count")
            .with_description("The total number of evidence items processed successfully.")
            .init();
        let dropped = meter
            .u64_counter("evidence_dropped_count")
            .with_description("The total number of evidence items dropped due to processing failures.")
            .init();
        Self { processed, dropped }
    }

    /// Record one successfully processed evidence item.
    pub fn processed(&self, attrs: &[KeyValue]) {
        self.processed.add(1, attrs);
    }

    /// Record one dropped evidence item.
    pub fn dropped(&self, attrs: &[KeyValue]) {
        self.dropped.add(1, attrs);
    }
}
