//! Gemara evidence adapter
//!
//! Normalizes assessment-log records from the Gemara compliance framework
//! into the shared attribute vocabulary. Unlike OCSF evidence these records
//! already carry control linkage, so the adapter forwards it directly.

use beacon_common::attributes::{
    COMPLIANCE_ASSESSMENT_ID, COMPLIANCE_CONTROL_CATALOG_ID, COMPLIANCE_CONTROL_ID,
    COMPLIANCE_REMEDIATION_DESCRIPTION, POLICY_ENGINE_NAME, POLICY_EVALUATION_MESSAGE,
    POLICY_EVALUATION_RESULT, POLICY_RULE_ID,
};
use beacon_common::EvaluationResult;
use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};

use crate::evidence::Evidence;

/// Evidence from a Gemara assessment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemaraEvidence {
    /// Assessment metadata.
    pub metadata: GemaraMetadata,
    /// The assessment log entry.
    pub assessment_log: AssessmentLog,
}

/// Assessment run metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GemaraMetadata {
    /// Assessment run identifier.
    #[serde(default)]
    pub id: String,
    /// The author (engine) that performed the assessment.
    #[serde(default)]
    pub author: GemaraAuthor,
}

/// The assessing engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GemaraAuthor {
    /// Engine name.
    #[serde(default)]
    pub name: String,
}

/// One assessment log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentLog {
    /// The requirement that was assessed.
    #[serde(default)]
    pub requirement: EntryRef,
    /// The procedure that ran.
    #[serde(default)]
    pub procedure: EntryRef,
    /// Procedure outcome.
    pub result: EvaluationResult,
    /// Additional result context.
    #[serde(default)]
    pub message: String,
    /// Remediation recommendation.
    #[serde(default)]
    pub recommendation: String,
    /// RFC3339 end time of the assessment.
    #[serde(default)]
    pub end: String,
}

/// Reference into a catalog: an entry plus the catalog that defines it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryRef {
    /// Entry identifier.
    #[serde(default)]
    pub entry_id: String,
    /// Identifier of the defining catalog.
    #[serde(default)]
    pub reference_id: String,
}

impl Evidence for GemaraEvidence {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    fn attributes(&self) -> Vec<KeyValue> {
        let log = &self.assessment_log;
        let mut attrs = vec![
            KeyValue::new(POLICY_ENGINE_NAME, self.metadata.author.name.clone()),
            KeyValue::new(COMPLIANCE_CONTROL_ID, log.requirement.entry_id.clone()),
            KeyValue::new(
                COMPLIANCE_CONTROL_CATALOG_ID,
                log.requirement.reference_id.clone(),
            ),
            KeyValue::new(POLICY_EVALUATION_RESULT, log.result.to_string()),
            KeyValue::new(POLICY_RULE_ID, log.procedure.entry_id.clone()),
            KeyValue::new(COMPLIANCE_ASSESSMENT_ID, self.metadata.id.clone()),
        ];

        if !log.message.is_empty() {
            attrs.push(KeyValue::new(POLICY_EVALUATION_MESSAGE, log.message.clone()));
        }
        if !log.recommendation.is_empty() {
            attrs.push(KeyValue::new(
                COMPLIANCE_REMEDIATION_DESCRIPTION,
                log.recommendation.clone(),
            ));
        }

        attrs
    }

    fn timestamp(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.assessment_log.end)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(attrs: &[KeyValue], key: &str) -> String {
        attrs
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| match &kv.value {
                opentelemetry::Value::String(s) => s.as_str().to_string(),
                other => format!("{other:?}"),
            })
            .unwrap_or_else(|| panic!("missing attribute {key}"))
    }

    fn evidence() -> GemaraEvidence {
        GemaraEvidence {
            metadata: GemaraMetadata {
                id: "run-42".into(),
                author: GemaraAuthor {
                    name: "privateer".into(),
                },
            },
            assessment_log: AssessmentLog {
                requirement: EntryRef {
                    entry_id: "AC-1-REQ".into(),
                    reference_id: "test-catalog".into(),
                },
                procedure: EntryRef {
                    entry_id: "AC-1".into(),
                    reference_id: String::new(),
                },
                result: EvaluationResult::NotApplicable,
                message: "out of scope".into(),
                recommendation: "enable the control".into(),
                end: "2024-06-01T12:00:00Z".into(),
            },
        }
    }

    #[test]
    fn test_attributes_derivation() {
        let attrs = evidence().attributes();
        assert_eq!(attr(&attrs, POLICY_ENGINE_NAME), "privateer");
        assert_eq!(attr(&attrs, COMPLIANCE_CONTROL_ID), "AC-1-REQ");
        assert_eq!(attr(&attrs, COMPLIANCE_CONTROL_CATALOG_ID), "test-catalog");
        assert_eq!(attr(&attrs, POLICY_EVALUATION_RESULT), "Not Applicable");
        assert_eq!(attr(&attrs, POLICY_RULE_ID), "AC-1");
        assert_eq!(attr(&attrs, COMPLIANCE_ASSESSMENT_ID), "run-42");
        assert_eq!(attr(&attrs, POLICY_EVALUATION_MESSAGE), "out of scope");
        assert_eq!(
            attr(&attrs, COMPLIANCE_REMEDIATION_DESCRIPTION),
            "enable the control"
        );
    }

    #[test]
    fn test_optional_attributes_omitted_when_empty() {
        let mut e = evidence();
        e.assessment_log.message = String::new();
        e.assessment_log.recommendation = String::new();

        let attrs = e.attributes();
        assert!(attrs
            .iter()
            .all(|kv| kv.key.as_str() != POLICY_EVALUATION_MESSAGE));
        assert!(attrs
            .iter()
            .all(|kv| kv.key.as_str() != COMPLIANCE_REMEDIATION_DESCRIPTION));
    }

    #[test]
    fn test_timestamp_parses_rfc3339() {
        let e = evidence();
        assert_eq!(
            e.timestamp(),
            DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn test_timestamp_falls_back_to_now_on_parse_failure() {
        let mut e = evidence();
        e.assessment_log.end = "not-a-timestamp".into();

        let before = Utc::now();
        let ts = e.timestamp();
        assert!(ts >= before);
    }
}
