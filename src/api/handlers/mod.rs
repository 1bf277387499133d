//! REST endpoint handlers organized by resource.

pub mod computer;
pub mod dashboard;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes every resource route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(computer::routes())
        .merge(dashboard::routes())
        .merge(system::routes())
}
