//! Request and connection-pool monitoring.
//!
//! - [`registry`] holds the live Prometheus counters and gauges.
//! - [`snapshot`] defines the immutable sample the dashboard plots.
//! - [`store`] keeps the bounded snapshot history.
//! - [`collector`] samples the registry into the store on a timer.

pub mod collector;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use collector::{CollectorError, DEFAULT_COLLECT_INTERVAL, MetricsCollector};
pub use registry::{MetricsRegistry, PoolGauges};
pub use snapshot::MetricsSnapshot;
pub use store::{DEFAULT_HISTORY_CAPACITY, MetricsStore};
