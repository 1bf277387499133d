//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::monitoring::{MetricsRegistry, MetricsStore};
use crate::service::{ComputerReadService, ComputerWriteService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Replica-bound queries.
    pub read_service: Arc<ComputerReadService>,
    /// Primary-bound mutations.
    pub write_service: Arc<ComputerWriteService>,
    /// Request counters and pool gauges.
    pub metrics: Arc<MetricsRegistry>,
    /// Snapshot history served by the dashboard.
    pub metrics_store: Arc<MetricsStore>,
}
