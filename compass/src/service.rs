//! Enrichment service
//!
//! The single `/v1/enrich` operation: dispatch the policy to the mapper
//! registered for its engine and return the resolved compliance context.
//! Unknown engines fall back to a fresh default mapper so the endpoint
//! stays total; the result is simply unmapped.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use beacon_common::{ApiError, Compliance, EnrichmentRequest, EnrichmentResponse, Policy};
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::mapper::basic::BasicMapper;
use crate::mapper::{Mapper, MapperId, MapperSet, Scope};

/// Immutable service state: the mapper registry and catalog scope.
pub struct EnrichmentService {
    set: MapperSet,
    scope: Scope,
}

impl EnrichmentService {
    /// Create a service over a loaded mapper set and scope.
    pub fn new(set: MapperSet, scope: Scope) -> Self {
        Self { set, scope }
    }

    /// Resolve a policy to compliance context.
    pub fn enrich(&self, policy: &Policy) -> Compliance {
        let id = MapperId::new(policy.policy_engine_name.clone());
        let compliance = match self.set.get(&id) {
            Some(mapper) => {
                debug!(mapper_id = %mapper.name(), "mapper selected");
                mapper.map(policy, &self.scope)
            }
            None => {
                warn!(
                    policy_engine_name = %policy.policy_engine_name,
                    "policy engine not found in mapper set, using basic mapper fallback"
                );
                BasicMapper::new().map(policy, &self.scope)
            }
        };

        debug!(
            mapping_status = %compliance.enrichment_status,
            compliance_catalog = %compliance.control.catalog_id,
            compliance_control = %compliance.control.id,
            "enrich result"
        );
        compliance
    }
}

/// Enrich a policy evaluation with compliance context
#[utoipa::path(
    post,
    path = "/v1/enrich",
    request_body = EnrichmentRequest,
    responses(
        (status = 200, description = "Resolved compliance context", body = EnrichmentResponse),
        (status = 400, description = "Malformed enrichment request", body = ApiError)
    ),
    tag = "enrichment"
)]
pub async fn post_v1_enrich(
    State(service): State<Arc<EnrichmentService>>,
    body: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "invalid enrichment request");
            return api_error(StatusCode::BAD_REQUEST, "Invalid format for enrichment");
        }
    };

    debug!(
        policy_rule_id = %request.policy.policy_rule_id,
        policy_engine_name = %request.policy.policy_engine_name,
        "enrich request received"
    );

    let compliance = service.enrich(&request.policy);
    Json(EnrichmentResponse { compliance }).into_response()
}

/// Health response payload
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status string.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

fn api_error(code: StatusCode, message: &str) -> Response {
    let body = ApiError {
        code: code.as_u16() as i32,
        message: message.to_string(),
    };
    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_common::catalog::{
        Catalog, CatalogMetadata, Control, ControlFamily, GuidelineMapping, MappingEntry,
    };
    use beacon_common::plan::{
        Assessment, AssessmentPlan, ControlRef, Procedure, RequirementRef,
    };
    use beacon_common::EnrichmentStatus;
    use crate::mapper::factory;

    fn test_service() -> EnrichmentService {
        let catalog = Catalog {
            metadata: CatalogMetadata {
                id: "test-catalog".into(),
            },
            control_families: vec![ControlFamily {
                title: "Access Control".into(),
                controls: vec![Control {
                    id: "AC-1".into(),
                    guideline_mappings: vec![GuidelineMapping {
                        reference_id: "NIST-800-53".into(),
                        entries: vec![MappingEntry {
                            reference_id: "AC-1".into(),
                        }],
                    }],
                }],
            }],
        };
        let mut scope = Scope::new();
        scope.insert("test-catalog".into(), catalog);

        let plan = AssessmentPlan {
            control: ControlRef {
                entry_id: "AC-1".into(),
                reference_id: "test-catalog".into(),
            },
            assessments: vec![Assessment {
                requirement: RequirementRef {
                    entry_id: "AC-1-REQ".into(),
                },
                procedures: vec![Procedure {
                    id: "AC-1".into(),
                    documentation: "Test procedure".into(),
                }],
            }],
        };

        let id = MapperId::new("test-policy-engine");
        let mut mapper = factory::mapper_for(&id);
        mapper.add_plan("test-catalog", plan);
        let mut set = MapperSet::new();
        set.insert(id, mapper);

        EnrichmentService::new(set, scope)
    }

    #[test]
    fn test_enrich_dispatches_to_registered_mapper() {
        let service = test_service();
        let compliance = service.enrich(&Policy {
            policy_rule_id: "AC-1".into(),
            policy_engine_name: "test-policy-engine".into(),
        });
        assert_eq!(compliance.enrichment_status, EnrichmentStatus::Success);
        assert_eq!(compliance.control.id, "AC-1-REQ");
    }

    #[test]
    fn test_enrich_unknown_engine_falls_back_to_unmapped() {
        let service = test_service();
        let compliance = service.enrich(&Policy {
            policy_rule_id: "AC-1".into(),
            policy_engine_name: "unknown-engine".into(),
        });
        assert!(compliance.is_unmapped());
    }
}
