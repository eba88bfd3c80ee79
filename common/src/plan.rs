//! Assessment plan schema
//!
//! A plan links one control to the concrete procedures that test it. Each
//! procedure id matches a policy rule id, which is how evidence records are
//! resolved back to controls.

use serde::{Deserialize, Serialize};

/// A plan describing how one control is assessed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentPlan {
    /// The control this plan assesses.
    pub control: ControlRef,
    /// Assessments grouped by requirement.
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

/// Reference to a control, carrying its catalog linkage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlRef {
    /// Control identifier within the catalog.
    #[serde(default)]
    pub entry_id: String,
    /// Identifier of the catalog the control belongs to. Plans with an
    /// empty reference are not routable and are dropped at load.
    #[serde(default)]
    pub reference_id: String,
}

/// Procedures assessing one requirement of the control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assessment {
    /// The requirement under assessment.
    pub requirement: RequirementRef,
    /// Procedures testing the requirement.
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

/// Reference to a requirement within a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementRef {
    /// Requirement identifier.
    #[serde(default)]
    pub entry_id: String,
}

/// A concrete test procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Procedure {
    /// Procedure identifier; matches the policy rule id of the evidence
    /// this procedure produces.
    pub id: String,
    /// What the procedure does, surfaced as remediation guidance.
    #[serde(default)]
    pub documentation: String,
}
