//! Enrichment wire model
//!
//! The request/response types for the `/v1/enrich` operation and the
//! compliance record they carry. Field names follow the published OpenAPI
//! schema (camelCase), so these types serialize directly onto the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sentinel written to control id and catalog id when no mapping exists.
pub const UNMAPPED: &str = "UNMAPPED";

/// Sentinel written to the control category when no mapping exists.
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

/// Lookup key for enrichment: one check performed by one policy engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Identifier of the evaluated rule within the engine.
    pub policy_rule_id: String,
    /// Name of the engine that evaluated the rule.
    pub policy_engine_name: String,
}

/// Outcome of a single assessment procedure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EvaluationResult {
    /// The procedure passed.
    Passed,
    /// The procedure failed.
    Failed,
    /// The procedure does not apply to the target.
    NotApplicable,
    /// The procedure was not executed.
    NotRun,
    /// The source reported something we do not recognize.
    Unknown,
}

impl EvaluationResult {
    /// Parse a source status string. Unrecognized tokens (including the
    /// empty string) map to [`EvaluationResult::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s {
            "Passed" => Self::Passed,
            "Failed" => Self::Failed,
            "Not Applicable" => Self::NotApplicable,
            "Not Run" => Self::NotRun,
            _ => Self::Unknown,
        }
    }

    /// The fixed wire form consumers match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::NotApplicable => "Not Applicable",
            Self::NotRun => "Not Run",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The control a policy rule was resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceControl {
    /// Requirement identifier when mapping succeeds, `UNMAPPED` otherwise.
    pub id: String,
    /// Identifier of the catalog the control came from.
    pub catalog_id: String,
    /// Control family title.
    pub category: String,
    /// Documentation of the procedure that tests this control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_description: Option<String>,
}

/// Framework mappings for a resolved control.
///
/// Both lists preserve catalog insertion order so downstream reports are
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceFrameworks {
    /// Requirement identifiers from the mapped frameworks.
    pub requirements: Vec<String>,
    /// Framework identifiers.
    pub frameworks: Vec<String>,
}

/// Severity of the risk posed by non-compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
    /// Informational only.
    Informational,
}

impl RiskLevel {
    /// The fixed wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Informational => "Informational",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk classification attached to a compliance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceRisk {
    /// Severity level.
    pub level: RiskLevel,
}

/// Whether enrichment found a mapping for the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    /// A catalog + procedure + control chain was found.
    Success,
    /// No mapping exists; the record carries sentinel values.
    Unmapped,
}

impl EnrichmentStatus {
    /// The fixed wire form (`success` / `unmapped`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Unmapped => "unmapped",
        }
    }
}

impl fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance context resolved for a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    /// The resolved control.
    pub control: ComplianceControl,
    /// Framework mappings for the control.
    pub frameworks: ComplianceFrameworks,
    /// Optional risk classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<ComplianceRisk>,
    /// Mapping outcome.
    pub enrichment_status: EnrichmentStatus,
}

impl Compliance {
    /// The terminal sentinel returned when no mapping can be found.
    ///
    /// Control fields carry the reserved sentinel strings and both
    /// framework lists are empty.
    pub fn unmapped() -> Self {
        Self {
            control: ComplianceControl {
                id: UNMAPPED.to_string(),
                catalog_id: UNMAPPED.to_string(),
                category: UNCATEGORIZED.to_string(),
                remediation_description: None,
            },
            frameworks: ComplianceFrameworks::default(),
            risk: None,
            enrichment_status: EnrichmentStatus::Unmapped,
        }
    }

    /// True when this record is the unmapped sentinel.
    pub fn is_unmapped(&self) -> bool {
        self.enrichment_status == EnrichmentStatus::Unmapped
    }
}

/// Request body for `POST /v1/enrich`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrichmentRequest {
    /// The policy to resolve.
    pub policy: Policy,
}

/// Response body for `POST /v1/enrich`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrichmentResponse {
    /// The resolved compliance context.
    pub compliance: Compliance,
}

/// Error envelope returned on 4xx/5xx.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}
