//! REST API layer: route handlers, DTOs, middleware and router composition.
//!
//! Every route is mounted at the root (`/computer`, `/ssr`, `/health`,
//! `/metrics`). Routed requests are counted in the metrics registry.

pub mod dto;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI description of the catalog.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Computer Catalog API",
        description = "PC build catalog with a primary/replica PostgreSQL split and a live pool metrics dashboard"
    ),
    paths(
        handlers::computer::list_computers,
        handlers::computer::stream_computers,
        handlers::computer::create_computer,
        handlers::computer::search_by_gpu,
        handlers::computer::search_by_ram,
        handlers::computer::paginate,
        handlers::computer::delete_computer,
        handlers::dashboard::dashboard_page,
        handlers::dashboard::dashboard_data,
        handlers::system::health_handler,
        handlers::system::metrics_handler,
    ),
    components(schemas(
        crate::domain::Computer,
        crate::domain::ComputerDescription,
        crate::monitoring::MetricsSnapshot,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "Computers", description = "Catalog reads (replica) and writes (primary)"),
        (name = "Dashboard", description = "Metrics history and its HTML view"),
        (name = "System", description = "Health and Prometheus exposition"),
    )
)]
pub struct ApiDoc;

/// Builds the complete application router with state applied.
///
/// Transport layers (tracing, CORS, timeout) are added by the caller.
pub fn build_router(state: AppState) -> Router {
    let metrics = Arc::clone(&state.metrics);

    let router = handlers::routes().route_layer(axum::middleware::from_fn_with_state(
        metrics,
        middleware::track_http_requests,
    ));

    with_api_docs(router).with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    router.merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    router.route(
        OPENAPI_PATH,
        axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_catalog_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/computer",
            "/computer/stream",
            "/computer/search/gpu/{q}",
            "/computer/search/ram/{gb}",
            "/computer/pagination",
            "/computer/{name}",
            "/ssr",
            "/ssr/data",
            "/health",
            "/metrics",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
