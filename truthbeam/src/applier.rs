//! Evidence extraction and enrichment application
//!
//! Two operations over a single log record's attribute map: pull out the
//! policy lookup attributes, and project a compliance record back onto the
//! attributes following the shared semantic conventions.

use beacon_common::attributes::{
    COMPLIANCE_CONTROL_CATALOG_ID, COMPLIANCE_CONTROL_CATEGORY, COMPLIANCE_CONTROL_ID,
    COMPLIANCE_ENRICHMENT_STATUS, COMPLIANCE_FRAMEWORKS, COMPLIANCE_REMEDIATION_DESCRIPTION,
    COMPLIANCE_REQUIREMENTS, COMPLIANCE_RISK_LEVEL, COMPLIANCE_STATUS, POLICY_ENGINE_NAME,
    POLICY_EVALUATION_RESULT, POLICY_RULE_ID,
};
use beacon_common::{Compliance, Policy};
use thiserror::Error;

use crate::pdata::LogRecord;
use crate::status::map_result;

/// Extraction failure: the record does not carry usable policy evidence.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// One or more required attributes are absent.
    #[error("missing required attributes: {0}")]
    MissingAttributes(String),

    /// A required attribute is present but blank.
    #[error("required attribute {0} is empty")]
    EmptyAttribute(&'static str),
}

/// Application failure. Enrichment application is best-effort; a record may
/// be left partially mutated.
#[derive(Debug, Error)]
pub enum ApplyError {}

/// Applies enrichment data to log records.
pub struct Applier;

impl Applier {
    /// Create a new applier.
    pub fn new() -> Self {
        Self
    }

    /// Extract the policy lookup key and evaluation result from a record.
    ///
    /// All three of `policy.rule.id`, `policy.engine.name`, and
    /// `policy.evaluation.result` must be present and non-blank; values are
    /// returned trimmed.
    pub fn extract(&self, record: &LogRecord) -> Result<(Policy, String), ExtractError> {
        let mut missing = Vec::new();

        let rule_id = record.get(POLICY_RULE_ID);
        if rule_id.is_none() {
            missing.push(POLICY_RULE_ID);
        }
        let engine_name = record.get(POLICY_ENGINE_NAME);
        if engine_name.is_none() {
            missing.push(POLICY_ENGINE_NAME);
        }
        let result = record.get(POLICY_EVALUATION_RESULT);
        if result.is_none() {
            missing.push(POLICY_EVALUATION_RESULT);
        }

        if !missing.is_empty() {
            return Err(ExtractError::MissingAttributes(missing.join(", ")));
        }

        let rule_id = rule_id.map(|v| v.as_string()).unwrap_or_default();
        let engine_name = engine_name.map(|v| v.as_string()).unwrap_or_default();
        let result = result.map(|v| v.as_string()).unwrap_or_default();

        let rule_id = rule_id.trim();
        let engine_name = engine_name.trim();
        let result = result.trim();

        if rule_id.is_empty() {
            return Err(ExtractError::EmptyAttribute(POLICY_RULE_ID));
        }
        if engine_name.is_empty() {
            return Err(ExtractError::EmptyAttribute(POLICY_ENGINE_NAME));
        }
        if result.is_empty() {
            return Err(ExtractError::EmptyAttribute(POLICY_EVALUATION_RESULT));
        }

        Ok((
            Policy {
                policy_rule_id: rule_id.to_string(),
                policy_engine_name: engine_name.to_string(),
            },
            result.to_string(),
        ))
    }

    /// Project a compliance record onto the log record's attributes.
    ///
    /// Writes the derived compliance status and the enrichment status; when
    /// the enrichment is unmapped nothing further is written. Idempotent:
    /// re-applying the same inputs leaves the attribute map unchanged.
    pub fn apply(
        &self,
        record: &mut LogRecord,
        compliance: &Compliance,
        result: &str,
    ) -> Result<(), ApplyError> {
        let status = map_result(result);
        record.put_str(COMPLIANCE_STATUS, status.as_str());
        record.put_str(
            COMPLIANCE_ENRICHMENT_STATUS,
            compliance.enrichment_status.as_str(),
        );
        if compliance.is_unmapped() {
            return Ok(());
        }

        record.put_str(COMPLIANCE_CONTROL_ID, compliance.control.id.as_str());
        record.put_str(
            COMPLIANCE_CONTROL_CATALOG_ID,
            compliance.control.catalog_id.as_str(),
        );
        record.put_str(
            COMPLIANCE_CONTROL_CATEGORY,
            compliance.control.category.as_str(),
        );

        record.put_str_array(
            COMPLIANCE_REQUIREMENTS,
            compliance.frameworks.requirements.iter().cloned(),
        );
        record.put_str_array(
            COMPLIANCE_FRAMEWORKS,
            compliance.frameworks.frameworks.iter().cloned(),
        );

        if let Some(description) = &compliance.control.remediation_description {
            record.put_str(COMPLIANCE_REMEDIATION_DESCRIPTION, description.as_str());
        }
        if let Some(risk) = &compliance.risk {
            record.put_str(COMPLIANCE_RISK_LEVEL, risk.level.as_str());
        }

        Ok(())
    }
}

impl Default for Applier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_common::{
        ComplianceControl, ComplianceFrameworks, ComplianceRisk, EnrichmentStatus, RiskLevel,
    };
    use crate::pdata::AnyValue;

    fn evidence_record() -> LogRecord {
        let mut record = LogRecord::default();
        record.put_str(POLICY_RULE_ID, "AC-1");
        record.put_str(POLICY_ENGINE_NAME, "test-policy-engine");
        record.put_str(POLICY_EVALUATION_RESULT, "Passed");
        record
    }

    fn mapped_compliance() -> Compliance {
        Compliance {
            control: ComplianceControl {
                id: "AC-1-REQ".into(),
                catalog_id: "test-catalog".into(),
                category: "Access Control".into(),
                remediation_description: Some("Test procedure".into()),
            },
            frameworks: ComplianceFrameworks {
                requirements: vec!["AC-1".into(), "AC-2".into()],
                frameworks: vec!["NIST-800-53".into()],
            },
            risk: Some(ComplianceRisk {
                level: RiskLevel::High,
            }),
            enrichment_status: EnrichmentStatus::Success,
        }
    }

    #[test]
    fn test_extract_returns_trimmed_values() {
        let mut record = LogRecord::default();
        record.put_str(POLICY_RULE_ID, "  AC-1  ");
        record.put_str(POLICY_ENGINE_NAME, " engine ");
        record.put_str(POLICY_EVALUATION_RESULT, " Passed ");

        let (policy, result) = Applier::new().extract(&record).unwrap();
        assert_eq!(policy.policy_rule_id, "AC-1");
        assert_eq!(policy.policy_engine_name, "engine");
        assert_eq!(result, "Passed");
    }

    #[test]
    fn test_extract_lists_all_missing_attributes() {
        let record = LogRecord::default();
        let err = Applier::new().extract(&record).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(POLICY_RULE_ID));
        assert!(message.contains(POLICY_ENGINE_NAME));
        assert!(message.contains(POLICY_EVALUATION_RESULT));
    }

    #[test]
    fn test_extract_each_key_required() {
        for key in [POLICY_RULE_ID, POLICY_ENGINE_NAME, POLICY_EVALUATION_RESULT] {
            let mut record = evidence_record();
            record.attributes.remove(key);
            let err = Applier::new().extract(&record).unwrap_err();
            assert!(err.to_string().contains(key), "missing {key} not reported");
        }
    }

    #[test]
    fn test_extract_names_blank_attribute() {
        let mut record = evidence_record();
        record.put_str(POLICY_ENGINE_NAME, "   ");
        let err = Applier::new().extract(&record).unwrap_err();
        assert!(err.to_string().contains(POLICY_ENGINE_NAME));
    }

    #[test]
    fn test_apply_writes_full_attribute_set() {
        let mut record = evidence_record();
        let applier = Applier::new();
        applier
            .apply(&mut record, &mapped_compliance(), "Passed")
            .unwrap();

        let get = |key: &str| record.get(key).unwrap().as_string();
        assert_eq!(get(COMPLIANCE_STATUS), "Compliant");
        assert_eq!(get(COMPLIANCE_ENRICHMENT_STATUS), "success");
        assert_eq!(get(COMPLIANCE_CONTROL_ID), "AC-1-REQ");
        assert_eq!(get(COMPLIANCE_CONTROL_CATALOG_ID), "test-catalog");
        assert_eq!(get(COMPLIANCE_CONTROL_CATEGORY), "Access Control");
        assert_eq!(get(COMPLIANCE_REMEDIATION_DESCRIPTION), "Test procedure");
        assert_eq!(get(COMPLIANCE_RISK_LEVEL), "High");

        let Some(AnyValue::Array(requirements)) = record.get(COMPLIANCE_REQUIREMENTS) else {
            panic!("expected requirements array");
        };
        let ids: Vec<_> = requirements.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(ids, ["AC-1", "AC-2"]);
    }

    #[test]
    fn test_apply_on_unmapped_writes_exactly_two_attributes() {
        let mut record = LogRecord::default();
        Applier::new()
            .apply(&mut record, &Compliance::unmapped(), "Passed")
            .unwrap();

        assert_eq!(record.attributes.len(), 2);
        assert_eq!(
            record.get(COMPLIANCE_STATUS).unwrap().as_string(),
            "Compliant"
        );
        assert_eq!(
            record.get(COMPLIANCE_ENRICHMENT_STATUS).unwrap().as_string(),
            "unmapped"
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let applier = Applier::new();
        let compliance = mapped_compliance();

        let mut once = evidence_record();
        applier.apply(&mut once, &compliance, "Failed").unwrap();

        let mut twice = evidence_record();
        applier.apply(&mut twice, &compliance, "Failed").unwrap();
        applier.apply(&mut twice, &compliance, "Failed").unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_skips_optional_fields_when_absent() {
        let mut compliance = mapped_compliance();
        compliance.control.remediation_description = None;
        compliance.risk = None;

        let mut record = LogRecord::default();
        Applier::new()
            .apply(&mut record, &compliance, "Passed")
            .unwrap();

        assert!(record.get(COMPLIANCE_REMEDIATION_DESCRIPTION).is_none());
        assert!(record.get(COMPLIANCE_RISK_LEVEL).is_none());
    }
}
