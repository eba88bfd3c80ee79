//! Semantic attribute keys shared by evidence producers and the enrichment
//! pipeline.
//!
//! The key set is closed: producers (OCSF/Gemara adapters) and the consumer
//! side (the enrichment applier) must agree on these exact strings, and
//! downstream consumers match on the enum wire forms written under them.

/// Unique identifier for the policy rule being evaluated or enforced.
pub const POLICY_RULE_ID: &str = "policy.rule.id";

/// Human-readable name of the policy rule.
pub const POLICY_RULE_NAME: &str = "policy.rule.name";

/// Source control URL and version of the policy-as-code file.
pub const POLICY_RULE_URI: &str = "policy.rule.uri";

/// Name of the policy engine that performed the evaluation.
pub const POLICY_ENGINE_NAME: &str = "policy.engine.name";

/// Version of the policy engine.
pub const POLICY_ENGINE_VERSION: &str = "policy.engine.version";

/// Outcome of the policy rule evaluation.
pub const POLICY_EVALUATION_RESULT: &str = "policy.evaluation.result";

/// Additional context about the policy evaluation result.
pub const POLICY_EVALUATION_MESSAGE: &str = "policy.evaluation.message";

/// Unique identifier for the resource or entity being evaluated.
pub const POLICY_TARGET_ID: &str = "policy.target.id";

/// Human-readable name of the resource or entity being evaluated.
pub const POLICY_TARGET_NAME: &str = "policy.target.name";

/// Type of the resource or entity being evaluated.
pub const POLICY_TARGET_TYPE: &str = "policy.target.type";

/// Environment where the target resource or entity exists.
pub const POLICY_TARGET_ENVIRONMENT: &str = "policy.target.environment";

/// Overall compliance determination for the assessed resource or control.
pub const COMPLIANCE_STATUS: &str = "compliance.status";

/// Result of the compliance mapping and enrichment process.
pub const COMPLIANCE_ENRICHMENT_STATUS: &str = "compliance.enrichment.status";

/// Unique identifier for the control requirement being assessed.
pub const COMPLIANCE_CONTROL_ID: &str = "compliance.control.id";

/// Unique identifier for the security control catalog.
pub const COMPLIANCE_CONTROL_CATALOG_ID: &str = "compliance.control.catalog.id";

/// Category or family that the security control belongs to.
pub const COMPLIANCE_CONTROL_CATEGORY: &str = "compliance.control.category";

/// Environments or contexts where this control applies.
pub const COMPLIANCE_CONTROL_APPLICABILITY: &str = "compliance.control.applicability";

/// Compliance requirement identifiers from the impacted frameworks.
pub const COMPLIANCE_REQUIREMENTS: &str = "compliance.requirements";

/// Regulatory or industry frameworks being evaluated.
pub const COMPLIANCE_FRAMEWORKS: &str = "compliance.frameworks";

/// Remediation action determined by the policy engine.
pub const COMPLIANCE_REMEDIATION_ACTION: &str = "compliance.remediation.action";

/// Outcome of the remediation action execution.
pub const COMPLIANCE_REMEDIATION_STATUS: &str = "compliance.remediation.status";

/// Description of the recommended remediation strategy for this control.
pub const COMPLIANCE_REMEDIATION_DESCRIPTION: &str = "compliance.remediation.description";

/// Unique identifier for an approved compliance exception.
pub const COMPLIANCE_REMEDIATION_EXCEPTION_ID: &str = "compliance.remediation.exception.id";

/// Whether the exception is active for this enforcement.
pub const COMPLIANCE_REMEDIATION_EXCEPTION_ACTIVE: &str = "compliance.remediation.exception.active";

/// Severity classification of the risk posed by non-compliance.
pub const COMPLIANCE_RISK_LEVEL: &str = "compliance.risk.level";

/// Identifier grouping findings from the same assessment run.
pub const COMPLIANCE_ASSESSMENT_ID: &str = "compliance.assessment.id";
