//! Beacon Common - shared types for the compliance enrichment platform
//!
//! This crate provides the pieces every other Beacon component agrees on:
//! - The policy/compliance attribute vocabulary (semantic keys and enum
//!   wire forms)
//! - The enrichment wire model (`Policy`, `Compliance`, request/response)
//! - YAML schemas for control catalogs and assessment plans
//! - Error handling

#![warn(missing_docs)]

pub mod attributes;
pub mod catalog;
pub mod error;
pub mod model;
pub mod plan;

pub use error::*;
pub use model::*;
