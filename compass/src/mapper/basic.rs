//! Basic mapper
//!
//! Resolves a policy rule through the two-level index: procedure id to
//! control, then control to family category and framework mappings. The
//! first catalog that yields a full chain wins; catalogs are tried in
//! lexicographic id order so ties resolve deterministically.

use std::collections::{BTreeMap, HashMap};

use beacon_common::catalog::{Catalog, GuidelineMapping};
use beacon_common::plan::AssessmentPlan;
use beacon_common::{
    Compliance, ComplianceControl, ComplianceFrameworks, EnrichmentStatus, Policy,
};
use tracing::warn;

use super::{Mapper, MapperId, Scope};

/// Procedure lookup entry: which control and requirement a procedure tests.
struct ProcedureInfo<'a> {
    control_id: &'a str,
    requirement_id: &'a str,
    documentation: &'a str,
}

/// Control lookup entry: framework mappings plus the owning family title.
struct ControlData<'a> {
    mappings: &'a [GuidelineMapping],
    category: &'a str,
}

/// Mapper backed by registered assessment plans.
pub struct BasicMapper {
    plans: BTreeMap<String, Vec<AssessmentPlan>>,
}

impl BasicMapper {
    /// Create an empty mapper.
    pub fn new() -> Self {
        Self {
            plans: BTreeMap::new(),
        }
    }

    /// Number of catalogs with registered plans.
    pub fn catalog_count(&self) -> usize {
        self.plans.len()
    }

    /// Flatten plans into procedure id lookups. Duplicate procedure ids
    /// keep the last occurrence.
    fn build_procedure_index<'a>(
        plans: &'a [AssessmentPlan],
    ) -> HashMap<&'a str, ProcedureInfo<'a>> {
        let mut procedures = HashMap::new();
        for plan in plans {
            for assessment in &plan.assessments {
                for procedure in &assessment.procedures {
                    procedures.insert(
                        procedure.id.as_str(),
                        ProcedureInfo {
                            control_id: &plan.control.entry_id,
                            requirement_id: &assessment.requirement.entry_id,
                            documentation: &procedure.documentation,
                        },
                    );
                }
            }
        }
        procedures
    }

    /// Index a catalog's controls by id, carrying the family title.
    fn build_control_index(catalog: &Catalog) -> HashMap<&str, ControlData<'_>> {
        let mut controls = HashMap::new();
        for family in &catalog.control_families {
            for control in &family.controls {
                controls.insert(
                    control.id.as_str(),
                    ControlData {
                        mappings: &control.guideline_mappings,
                        category: &family.title,
                    },
                );
            }
        }
        controls
    }

    /// Requirement ids from the mappings, preserving catalog order.
    fn extract_requirements(mappings: &[GuidelineMapping]) -> Vec<String> {
        mappings
            .iter()
            .flat_map(|m| m.entries.iter().map(|e| e.reference_id.clone()))
            .collect()
    }

    /// Framework ids from the mappings, preserving catalog order.
    fn extract_frameworks(mappings: &[GuidelineMapping]) -> Vec<String> {
        mappings.iter().map(|m| m.reference_id.clone()).collect()
    }
}

impl Default for BasicMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper for BasicMapper {
    fn name(&self) -> MapperId {
        MapperId::new("basic")
    }

    fn map(&self, policy: &Policy, scope: &Scope) -> Compliance {
        let mut failure_reasons: Vec<&str> = Vec::new();

        for (catalog_id, plans) in &self.plans {
            let Some(catalog) = scope.get(catalog_id) else {
                warn!(
                    %catalog_id,
                    policy_rule_id = %policy.policy_rule_id,
                    "catalog not found in scope for policy"
                );
                failure_reasons.push("catalog not found");
                continue;
            };

            let procedures = Self::build_procedure_index(plans);
            let controls = Self::build_control_index(catalog);

            let Some(procedure) = procedures.get(policy.policy_rule_id.as_str()) else {
                warn!(
                    policy_rule_id = %policy.policy_rule_id,
                    %catalog_id,
                    "policy rule not found in procedures for catalog"
                );
                failure_reasons.push("policy rule not found");
                continue;
            };

            let Some(control) = controls.get(procedure.control_id) else {
                warn!(
                    control_id = procedure.control_id,
                    %catalog_id,
                    policy_rule_id = %policy.policy_rule_id,
                    "control data not found for control id in catalog"
                );
                failure_reasons.push("control data not found");
                continue;
            };

            return Compliance {
                control: ComplianceControl {
                    id: procedure.requirement_id.to_string(),
                    catalog_id: catalog_id.clone(),
                    category: control.category.to_string(),
                    remediation_description: Some(procedure.documentation.to_string()),
                },
                frameworks: ComplianceFrameworks {
                    requirements: Self::extract_requirements(control.mappings),
                    frameworks: Self::extract_frameworks(control.mappings),
                },
                risk: None,
                enrichment_status: EnrichmentStatus::Success,
            };
        }

        if !failure_reasons.is_empty() {
            warn!(
                policy_rule_id = %policy.policy_rule_id,
                policy_engine_name = %policy.policy_engine_name,
                reasons = ?failure_reasons,
                "failed to map policy from engine"
            );
        }

        Compliance::unmapped()
    }

    fn add_plan(&mut self, catalog_id: &str, plan: AssessmentPlan) {
        self.plans
            .entry(catalog_id.to_string())
            .or_default()
            .push(plan);
    }
}
