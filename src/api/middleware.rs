//! Request counting middleware.

use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::monitoring::MetricsRegistry;

/// Counts each completed request in `http_server_requests`.
///
/// The `uri` label is the matched route template (`/computer/{name}`), so
/// path parameters do not inflate label cardinality. Installed with
/// `route_layer`, so only routed requests are counted.
pub async fn track_http_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;
    metrics.record_http_request(method.as_str(), &uri, response.status().as_u16());
    response
}
