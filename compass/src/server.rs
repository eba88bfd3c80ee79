//! HTTP server assembly
//!
//! Builds the enrichment router with its OpenAPI document and serves it,
//! plain or behind TLS 1.3.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use beacon_common::{BeaconError, BeaconResult};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CertConfig;
use crate::middleware;
use crate::service::{self, EnrichmentService};
use crate::tls;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Compass Enrichment API",
        description = "Resolves policy evaluations to compliance context",
        license(name = "Apache-2.0")
    ),
    paths(service::post_v1_enrich, service::health_check),
    components(
        schemas(
            beacon_common::EnrichmentRequest,
            beacon_common::EnrichmentResponse,
            beacon_common::Policy,
            beacon_common::Compliance,
            beacon_common::ComplianceControl,
            beacon_common::ComplianceFrameworks,
            beacon_common::ComplianceRisk,
            beacon_common::RiskLevel,
            beacon_common::EnrichmentStatus,
            beacon_common::ApiError,
            service::HealthResponse,
        )
    ),
    tags(
        (name = "enrichment", description = "Policy enrichment"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Build the enrichment router
pub fn build_router(service: Arc<EnrichmentService>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(service::health_check))
        .route("/v1/enrich", post(service::post_v1_enrich))
        .layer(axum::middleware::from_fn(middleware::access_log))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve without TLS.
pub async fn serve(router: Router, port: u16) -> BeaconResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "compass listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Serve behind TLS 1.3.
pub async fn serve_tls(router: Router, port: u16, certificate: &CertConfig) -> BeaconResult<()> {
    let tls_config = tls::server_config(&certificate.cert, &certificate.key)
        .map_err(|e| BeaconError::Config(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "compass listening (TLS)");

    axum_server::bind_rustls(addr, tls_config)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}
