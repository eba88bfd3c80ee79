//! Control catalog schema
//!
//! A catalog groups controls into families and maps each control onto
//! external framework requirements. Catalogs are authored as YAML and
//! loaded once at startup.

use serde::{Deserialize, Serialize};

/// A compliance control catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog metadata.
    pub metadata: CatalogMetadata,
    /// Control families in catalog order.
    #[serde(default)]
    pub control_families: Vec<ControlFamily>,
}

/// Identifying metadata for a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Unique catalog identifier.
    pub id: String,
}

/// A group of related controls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlFamily {
    /// Family title; becomes the control category on enrichment.
    pub title: String,
    /// Controls in this family.
    #[serde(default)]
    pub controls: Vec<Control>,
}

/// A single control within a family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Control {
    /// Control identifier (e.g. `AC-1`).
    pub id: String,
    /// Mappings onto external framework guidelines, in catalog order.
    #[serde(default)]
    pub guideline_mappings: Vec<GuidelineMapping>,
}

/// A mapping from a control onto one external framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuidelineMapping {
    /// Framework identifier (e.g. `NIST-800-53`).
    pub reference_id: String,
    /// Requirement entries within the framework, in catalog order.
    #[serde(default)]
    pub entries: Vec<MappingEntry>,
}

/// One requirement reference within a guideline mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Requirement identifier within the framework.
    pub reference_id: String,
}
