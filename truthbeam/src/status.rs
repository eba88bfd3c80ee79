//! Compliance status mapping

use std::fmt;

use beacon_common::EvaluationResult;

/// Compliance determination derived from an evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceStatus {
    /// No explicit determination could be made.
    Unknown,
    /// The resource is compliant.
    Compliant,
    /// The resource is not compliant.
    NonCompliant,
    /// The check does not apply to the resource.
    NotApplicable,
    /// The resource has an active compliance exception.
    Exempt,
}

impl ComplianceStatus {
    /// The fixed wire form consumers match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Compliant => "Compliant",
            Self::NonCompliant => "Non-Compliant",
            Self::NotApplicable => "Not Applicable",
            Self::Exempt => "Exempt",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an evaluation result string to a compliance status. Total: every
/// input, including the empty string, yields a status.
pub fn map_result(result: &str) -> ComplianceStatus {
    match EvaluationResult::parse(result) {
        EvaluationResult::Passed => ComplianceStatus::Compliant,
        EvaluationResult::Failed => ComplianceStatus::NonCompliant,
        EvaluationResult::NotApplicable | EvaluationResult::NotRun => {
            ComplianceStatus::NotApplicable
        }
        EvaluationResult::Unknown => ComplianceStatus::Unknown,
    }
}
