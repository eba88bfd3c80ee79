//! Compass - compliance enrichment service
//!
//! Compass resolves `(policy engine, policy rule)` pairs against an
//! in-memory index of assessment plans and answers with the compliance
//! context the rule satisfies: control, category, framework requirements,
//! and remediation guidance.
//!
//! The service is stateless beyond its immutable catalog scope and mapper
//! registry, both built once at startup:
//!
//! ```text
//! catalog.yaml ──┐
//!                ├──► loader ──► Scope + MapperSet ──► service ──► POST /v1/enrich
//! plans/*.yaml ──┘
//! ```

pub mod config;
pub mod loader;
pub mod mapper;
pub mod middleware;
pub mod server;
pub mod service;
pub mod tls;

pub use config::CompassConfig;
pub use service::EnrichmentService;
