//! Process-wide metrics registry.
//!
//! [`MetricsRegistry`] owns a Prometheus [`Registry`] holding the HTTP
//! request counter and the per-datasource pool gauges. The request
//! pipeline and the datasources write to it; the collector reads it back
//! through name/label selectors ([`MetricsRegistry::counter_sum`],
//! [`MetricsRegistry::gauge_sum`]), so nothing is reset between samples.

use std::fmt;

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::error::CatalogError;

/// Completed HTTP requests, labelled by `method`, `uri` and `status`.
pub const HTTP_SERVER_REQUESTS: &str = "http_server_requests";

/// Connections currently borrowed from a pool, labelled by `clientName`.
pub const POOL_IN_USE: &str = "postgresql_current";

/// Callers currently waiting for a connection, labelled by `clientName`.
pub const POOL_QUEUE_SIZE: &str = "postgresql_queue_size";

/// Label carrying the HTTP method.
pub const METHOD_LABEL: &str = "method";

/// Label carrying the datasource's logical name.
pub const CLIENT_NAME_LABEL: &str = "clientName";

/// Gauge pair tracking one connection pool.
#[derive(Debug, Clone)]
pub struct PoolGauges {
    /// Borrowed connections.
    pub in_use: IntGauge,
    /// Queued borrowers.
    pub pending: IntGauge,
}

/// Registry of the counters and gauges sampled by the collector.
pub struct MetricsRegistry {
    registry: Registry,
    http_requests: IntCounterVec,
    pool_in_use: IntGaugeVec,
    pool_pending: IntGaugeVec,
}

impl fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("families", &self.registry.gather().len())
            .finish_non_exhaustive()
    }
}

impl MetricsRegistry {
    /// Creates a registry with all catalog metrics registered.
    ///
    /// # Errors
    ///
    /// Returns a [`prometheus::Error`] if a metric descriptor is invalid.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(HTTP_SERVER_REQUESTS, "Completed HTTP requests"),
            &[METHOD_LABEL, "uri", "status"],
        )?;
        let pool_in_use = IntGaugeVec::new(
            Opts::new(POOL_IN_USE, "Connections currently borrowed from the pool"),
            &[CLIENT_NAME_LABEL],
        )?;
        let pool_pending = IntGaugeVec::new(
            Opts::new(POOL_QUEUE_SIZE, "Callers waiting for a pooled connection"),
            &[CLIENT_NAME_LABEL],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(pool_in_use.clone()))?;
        registry.register(Box::new(pool_pending.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            pool_in_use,
            pool_pending,
        })
    }

    /// Counts one completed HTTP request.
    pub fn record_http_request(&self, method: &str, uri: &str, status: u16) {
        self.http_requests
            .with_label_values(&[method, uri, &status.to_string()])
            .inc();
    }

    /// Returns the gauges for the pool registered under `client_name`.
    ///
    /// Both gauges are created at zero, so the pool shows up in the
    /// exposition before its first borrow.
    #[must_use]
    pub fn pool_gauges(&self, client_name: &str) -> PoolGauges {
        PoolGauges {
            in_use: self.pool_in_use.with_label_values(&[client_name]),
            pending: self.pool_pending.with_label_values(&[client_name]),
        }
    }

    /// Sums every counter named `name` whose `label` equals `value`.
    ///
    /// An absent family or label contributes 0.
    #[must_use]
    pub fn counter_sum(&self, name: &str, label: &str, value: &str) -> f64 {
        self.sum_matching(name, label, value, |m| m.get_counter().get_value())
    }

    /// Sums every gauge named `name` whose `label` equals `value`.
    ///
    /// An absent family or label contributes 0.
    #[must_use]
    pub fn gauge_sum(&self, name: &str, label: &str, value: &str) -> f64 {
        self.sum_matching(name, label, value, |m| m.get_gauge().get_value())
    }

    /// Renders the registry in the Prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Internal`] if encoding fails.
    pub fn encode_text(&self) -> Result<String, CatalogError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| CatalogError::Internal(e.to_string()))
    }

    fn sum_matching<F>(&self, name: &str, label: &str, value: &str, read: F) -> f64
    where
        F: Fn(&prometheus::proto::Metric) -> f64,
    {
        self.registry
            .gather()
            .iter()
            .filter(|family: &&MetricFamily| family.get_name() == name)
            .flat_map(|family| family.get_metric().iter())
            .filter(|metric| {
                metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == label && pair.get_value() == value)
            })
            .map(read)
            .sum()
    }
}
