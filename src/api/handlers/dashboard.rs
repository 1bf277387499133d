//! Metrics dashboard: the HTML page and its JSON feed.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::monitoring::MetricsSnapshot;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// `GET /ssr`: self-contained dashboard page.
///
/// The page polls `/ssr/data` every 30 seconds and plots reads vs writes,
/// in-use connections and waiting borrowers for both pools.
#[utoipa::path(
    get,
    path = "/ssr",
    tag = "Dashboard",
    summary = "Metrics dashboard",
    responses(
        (status = 200, description = "Dashboard page", content_type = "text/html"),
    )
)]
pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// `GET /ssr/data`: snapshot history, oldest first.
#[utoipa::path(
    get,
    path = "/ssr/data",
    tag = "Dashboard",
    summary = "Metrics history",
    description = "The retained metrics snapshots in collection order.",
    responses(
        (status = 200, description = "Snapshot history", body = Vec<MetricsSnapshot>),
    )
)]
pub async fn dashboard_data(State(state): State<AppState>) -> Json<Vec<MetricsSnapshot>> {
    Json(state.metrics_store.get_all())
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ssr", get(dashboard_page))
        .route("/ssr/data", get(dashboard_data))
}
