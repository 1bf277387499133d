//! Periodic metrics sampler.
//!
//! [`MetricsCollector`] reads the HTTP request counters and both pools'
//! gauges from the [`MetricsRegistry`], packs them into a
//! [`MetricsSnapshot`] and appends it to the [`MetricsStore`]. A tick is
//! synchronous and in-memory; [`MetricsCollector::spawn`] drives it from a
//! Tokio interval that runs independently of the request path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{MissedTickBehavior, interval};

use super::registry::{
    CLIENT_NAME_LABEL, HTTP_SERVER_REQUESTS, METHOD_LABEL, POOL_IN_USE, POOL_QUEUE_SIZE,
};
use super::{MetricsRegistry, MetricsSnapshot, MetricsStore};
use crate::persistence::{PRIMARY_CLIENT_NAME, REPLICA_CLIENT_NAME};

/// Default sampling period.
pub const DEFAULT_COLLECT_INTERVAL: Duration = Duration::from_secs(30);

const READ_METHODS: &[&str] = &["GET"];
const WRITE_METHODS: &[&str] = &["POST", "PUT", "DELETE"];

/// Reasons a tick is skipped.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// A sampled value was negative, NaN or infinite.
    #[error("invalid sample for {metric}: {value}")]
    InvalidSample {
        /// Which field failed.
        metric: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Samples the registry into the snapshot history.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    registry: Arc<MetricsRegistry>,
    store: Arc<MetricsStore>,
}

impl MetricsCollector {
    /// Creates a collector writing into `store`.
    #[must_use]
    pub fn new(registry: Arc<MetricsRegistry>, store: Arc<MetricsStore>) -> Self {
        Self { registry, store }
    }

    /// Reads the registry into a snapshot without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::InvalidSample`] if any value is negative
    /// or not finite.
    pub fn sample(&self) -> Result<MetricsSnapshot, CollectorError> {
        let http_reads = self.sum_requests(READ_METHODS);
        let http_writes = self.sum_requests(WRITE_METHODS);
        let primary_in_use = self.pool_gauge(POOL_IN_USE, PRIMARY_CLIENT_NAME);
        let primary_pending = self.pool_gauge(POOL_QUEUE_SIZE, PRIMARY_CLIENT_NAME);
        let replica_in_use = self.pool_gauge(POOL_IN_USE, REPLICA_CLIENT_NAME);
        let replica_pending = self.pool_gauge(POOL_QUEUE_SIZE, REPLICA_CLIENT_NAME);

        for (metric, value) in [
            ("httpReads", http_reads),
            ("httpWrites", http_writes),
            ("primaryPoolInUse", primary_in_use),
            ("primaryPoolPending", primary_pending),
            ("replicaPoolInUse", replica_in_use),
            ("replicaPoolPending", replica_pending),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CollectorError::InvalidSample { metric, value });
            }
        }

        Ok(MetricsSnapshot::of(
            http_reads,
            http_writes,
            primary_in_use,
            primary_pending,
            replica_in_use,
            replica_pending,
        ))
    }

    /// Runs one tick: samples and appends to the store.
    ///
    /// # Errors
    ///
    /// Propagates [`MetricsCollector::sample`] failures; the store is left
    /// untouched in that case.
    pub fn collect(&self) -> Result<MetricsSnapshot, CollectorError> {
        let snapshot = self.store.add(self.sample()?);
        tracing::info!(
            http_reads = snapshot.http_reads(),
            http_writes = snapshot.http_writes(),
            primary_in_use = snapshot.primary_pool_in_use(),
            primary_pending = snapshot.primary_pool_pending(),
            replica_in_use = snapshot.replica_pool_in_use(),
            replica_pending = snapshot.replica_pool_pending(),
            "metrics snapshot collected"
        );
        Ok(snapshot)
    }

    /// Spawns the ticker. The first tick fires immediately; late ticks are
    /// skipped rather than bunched. The task exits when `shutdown_rx`
    /// fires or its sender is dropped.
    pub fn spawn(
        self,
        period: Duration,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if let Err(e) = self.collect() {
                            tracing::warn!(error = %e, "metrics tick skipped");
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
            tracing::debug!("metrics collector shutting down");
        })
    }

    fn sum_requests(&self, methods: &[&str]) -> f64 {
        methods
            .iter()
            .map(|method| {
                self.registry
                    .counter_sum(HTTP_SERVER_REQUESTS, METHOD_LABEL, method)
            })
            .sum()
    }

    fn pool_gauge(&self, name: &str, client_name: &str) -> f64 {
        self.registry.gauge_sum(name, CLIENT_NAME_LABEL, client_name)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn collector_with_capacity(capacity: usize) -> (MetricsCollector, Arc<MetricsRegistry>, Arc<MetricsStore>) {
        let Ok(registry) = MetricsRegistry::new() else {
            panic!("registry creation failed");
        };
        let registry = Arc::new(registry);
        let store = Arc::new(MetricsStore::new(capacity));
        let collector = MetricsCollector::new(Arc::clone(&registry), Arc::clone(&store));
        (collector, registry, store)
    }

    #[test]
    fn empty_registry_yields_zero_snapshot() {
        let (collector, _, store) = collector_with_capacity(20);
        let Ok(snapshot) = collector.collect() else {
            panic!("collect failed");
        };
        assert_eq!(snapshot.values(), [0.0; 6]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reads_and_writes_are_split_by_method() {
        let (collector, registry, _) = collector_with_capacity(20);
        registry.record_http_request("GET", "/computer", 200);
        registry.record_http_request("GET", "/ssr", 200);
        registry.record_http_request("POST", "/computer", 201);
        registry.record_http_request("PUT", "/computer", 405);
        registry.record_http_request("DELETE", "/computer/{name}", 404);
        registry.record_http_request("OPTIONS", "/computer", 200);

        let Ok(snapshot) = collector.sample() else {
            panic!("sample failed");
        };
        assert_eq!(snapshot.http_reads(), 2.0);
        assert_eq!(snapshot.http_writes(), 3.0);
    }

    #[test]
    fn pool_gauges_are_attributed_by_client_name() {
        let (collector, registry, _) = collector_with_capacity(20);
        let primary = registry.pool_gauges(PRIMARY_CLIENT_NAME);
        let replica = registry.pool_gauges(REPLICA_CLIENT_NAME);
        primary.in_use.set(2);
        primary.pending.set(1);
        replica.in_use.set(5);
        replica.pending.set(4);

        let Ok(snapshot) = collector.sample() else {
            panic!("sample failed");
        };
        assert_eq!(snapshot.primary_pool_in_use(), 2.0);
        assert_eq!(snapshot.primary_pool_pending(), 1.0);
        assert_eq!(snapshot.replica_pool_in_use(), 5.0);
        assert_eq!(snapshot.replica_pool_pending(), 4.0);
    }

    #[test]
    fn negative_gauge_skips_the_tick() {
        let (collector, registry, store) = collector_with_capacity(20);
        registry.pool_gauges(REPLICA_CLIENT_NAME).pending.set(-1);

        let result = collector.collect();
        assert!(matches!(
            result,
            Err(CollectorError::InvalidSample { metric: "replicaPoolPending", .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn twenty_one_ticks_keep_the_latest_twenty() {
        let (collector, registry, store) = collector_with_capacity(20);
        let mut collected = Vec::new();
        for _ in 0..21 {
            registry.record_http_request("GET", "/computer", 200);
            let Ok(snapshot) = collector.collect() else {
                panic!("collect failed");
            };
            collected.push(snapshot);
        }

        let history = store.get_all();
        assert_eq!(history.len(), 20);
        assert_eq!(history.first().map(MetricsSnapshot::http_reads), Some(2.0));
        assert_eq!(history.last(), collected.last());
        assert!(!history.iter().any(|s| s.http_reads() == 1.0));
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let (collector, _, store) = collector_with_capacity(20);
        let future = chrono::Utc::now() + chrono::Duration::hours(1);
        let _ = store.add(MetricsSnapshot::at(future, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        let Ok(snapshot) = collector.collect() else {
            panic!("collect failed");
        };
        assert!(snapshot.timestamp() >= future);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_samples_until_shutdown() {
        let (collector, _, store) = collector_with_capacity(20);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = collector.spawn(Duration::from_secs(30), shutdown_rx);

        tokio::time::sleep(Duration::from_secs(95)).await;
        let _ = shutdown_tx.send(());
        assert!(handle.await.is_ok());

        // Ticks at 0s, 30s, 60s and 90s.
        assert_eq!(store.len(), 4);
    }
}
