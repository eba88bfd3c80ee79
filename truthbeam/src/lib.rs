//! TruthBeam - streaming compliance enrichment processor
//!
//! TruthBeam sits inside a telemetry pipeline. For each log record carrying
//! policy evidence it extracts the policy lookup attributes, asks the
//! Compass enrichment service for compliance context (through a bounded
//! TTL cache), and writes the resulting `compliance.*` attributes back onto
//! the record.
//!
//! Records that cannot be extracted or enriched pass through unmodified;
//! the processor never fails a batch.

pub mod applier;
pub mod cache;
pub mod client;
pub mod config;
pub mod pdata;
pub mod processor;
pub mod status;

pub use config::TruthBeamConfig;
pub use processor::TruthBeamProcessor;
