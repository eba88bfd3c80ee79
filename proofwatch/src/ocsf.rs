//! OCSF evidence adapter
//!
//! Normalizes OCSF scan-activity events carrying the security-control
//! profile into the shared attribute vocabulary. Validation warns on
//! missing critical fields but never fails; defaults keep the pipeline
//! moving with incomplete data.

use beacon_common::attributes::{
    COMPLIANCE_REMEDIATION_ACTION, COMPLIANCE_REMEDIATION_STATUS, POLICY_ENGINE_NAME,
    POLICY_EVALUATION_MESSAGE, POLICY_EVALUATION_RESULT, POLICY_RULE_ID, POLICY_RULE_NAME,
    POLICY_TARGET_ID, POLICY_TARGET_TYPE,
};
use chrono::{DateTime, TimeZone, Utc};
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::evidence::Evidence;

/// An OCSF scan-activity event with security-control profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsfEvidence {
    /// Event time in milliseconds since the epoch.
    #[serde(default)]
    pub time: i64,
    /// Raw evaluation status from the engine (`success` / `failure`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form event message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The evaluated policy.
    #[serde(default)]
    pub policy: OcsfPolicy,
    /// Event metadata, including the producing product.
    #[serde(default)]
    pub metadata: OcsfMetadata,
    /// The scan that produced the event.
    #[serde(default)]
    pub scan: OcsfScan,
    /// Enforcement action name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Enforcement action id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<i32>,
    /// Disposition name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    /// Disposition id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition_id: Option<i32>,
}

/// OCSF policy object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsfPolicy {
    /// Policy unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Policy display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// OCSF event metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsfMetadata {
    /// The producing product.
    #[serde(default)]
    pub product: OcsfProduct,
}

/// OCSF product object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsfProduct {
    /// Product name; used as the policy engine name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// OCSF scan object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsfScan {
    /// Scan target id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Scan target type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub scan_type: Option<String>,
}

impl Evidence for OcsfEvidence {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    fn attributes(&self) -> Vec<KeyValue> {
        if let Err(e) = self.validate() {
            warn!(err = e, "validation error, using default values");
        }

        let mut attrs = vec![
            KeyValue::new(
                POLICY_RULE_ID,
                string_val(&self.policy.uid, "unknown_policy_id"),
            ),
            KeyValue::new(
                POLICY_RULE_NAME,
                string_val(&self.policy.name, "unknown_policy_name"),
            ),
            KeyValue::new(
                POLICY_ENGINE_NAME,
                string_val(&self.metadata.product.name, "unknown_source"),
            ),
            KeyValue::new(
                POLICY_EVALUATION_RESULT,
                map_evaluation_status(self.status.as_deref()),
            ),
            KeyValue::new(POLICY_EVALUATION_MESSAGE, string_val(&self.message, "")),
            KeyValue::new(
                COMPLIANCE_REMEDIATION_ACTION,
                map_enforcement_action(self.action_id),
            ),
            KeyValue::new(
                COMPLIANCE_REMEDIATION_STATUS,
                map_enforcement_status(self.action_id, self.disposition_id),
            ),
        ];

        if let Some(uid) = self.scan.uid.as_deref().filter(|v| !v.is_empty()) {
            attrs.push(KeyValue::new(POLICY_TARGET_ID, uid.to_string()));
        }
        if let Some(scan_type) = self.scan.scan_type.as_deref().filter(|v| !v.is_empty()) {
            attrs.push(KeyValue::new(POLICY_TARGET_TYPE, scan_type.to_string()));
        }

        attrs
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.time)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

impl OcsfEvidence {
    /// Check the fields the mapping depends on. Missing data is reported,
    /// not fatal: callers log a warning and fall back to defaults.
    fn validate(&self) -> Result<(), &'static str> {
        if self.policy.uid.as_deref().unwrap_or("").is_empty() {
            return Err("event is missing a policy id");
        }
        if self.metadata.product.name.as_deref().unwrap_or("").is_empty() {
            return Err("event is missing a policy source");
        }
        if self.status.as_deref().unwrap_or("").is_empty() {
            return Err("event is missing a policy status");
        }
        Ok(())
    }
}

fn string_val(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

/// Map the engine's raw status onto an evaluation result string.
fn map_evaluation_status(status: Option<&str>) -> &'static str {
    match status {
        Some("success") => "Passed",
        Some("failure") => "Failed",
        _ => "Unknown",
    }
}

/// Map the OCSF action id onto a remediation action.
fn map_enforcement_action(action_id: Option<i32>) -> &'static str {
    match action_id {
        // No action specified: the engine observed and reported.
        None => "Notify",
        Some(2) => "Block",
        Some(4) => "Remediate",
        Some(3) | Some(16) | Some(17) => "Notify",
        Some(_) => "Unknown",
    }
}

/// Map the (action, disposition) pair onto a remediation outcome.
fn map_enforcement_status(action_id: Option<i32>, disposition_id: Option<i32>) -> &'static str {
    let Some(action_id) = action_id else {
        return "Skipped";
    };
    match (action_id, disposition_id) {
        // Blocked, Dropped
        (2, Some(2)) | (2, Some(6)) => "Success",
        // Corrected
        (4, Some(11)) => "Success",
        (2, Some(_)) => "Fail",
        (4, Some(_)) => "Fail",
        _ => "Unknown",
    }
}
