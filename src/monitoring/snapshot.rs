//! Immutable metrics sample.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One point-in-time sample of request counters and pool gauges.
///
/// Built only through [`MetricsSnapshot::of`] (or [`MetricsSnapshot::at`]);
/// fields are read-only afterwards. Serialized with the camelCase names
/// the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    timestamp: DateTime<Utc>,
    http_reads: f64,
    http_writes: f64,
    primary_pool_in_use: f64,
    primary_pool_pending: f64,
    replica_pool_in_use: f64,
    replica_pool_pending: f64,
}

impl MetricsSnapshot {
    /// Stamps the current instant on a new sample.
    #[must_use]
    pub fn of(
        http_reads: f64,
        http_writes: f64,
        primary_pool_in_use: f64,
        primary_pool_pending: f64,
        replica_pool_in_use: f64,
        replica_pool_pending: f64,
    ) -> Self {
        Self::at(
            Utc::now(),
            http_reads,
            http_writes,
            primary_pool_in_use,
            primary_pool_pending,
            replica_pool_in_use,
            replica_pool_pending,
        )
    }

    /// Builds a sample with an explicit timestamp.
    #[must_use]
    pub const fn at(
        timestamp: DateTime<Utc>,
        http_reads: f64,
        http_writes: f64,
        primary_pool_in_use: f64,
        primary_pool_pending: f64,
        replica_pool_in_use: f64,
        replica_pool_pending: f64,
    ) -> Self {
        Self {
            timestamp,
            http_reads,
            http_writes,
            primary_pool_in_use,
            primary_pool_pending,
            replica_pool_in_use,
            replica_pool_pending,
        }
    }

    /// Moves the timestamp up to `floor` if it is earlier.
    #[must_use]
    pub fn not_before(mut self, floor: DateTime<Utc>) -> Self {
        self.timestamp = self.timestamp.max(floor);
        self
    }

    /// Instant the sample was taken.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Completed `GET` requests since startup.
    #[must_use]
    pub const fn http_reads(&self) -> f64 {
        self.http_reads
    }

    /// Completed `POST`, `PUT` and `DELETE` requests since startup.
    #[must_use]
    pub const fn http_writes(&self) -> f64 {
        self.http_writes
    }

    /// Borrowed primary connections.
    #[must_use]
    pub const fn primary_pool_in_use(&self) -> f64 {
        self.primary_pool_in_use
    }

    /// Callers queued on the primary pool.
    #[must_use]
    pub const fn primary_pool_pending(&self) -> f64 {
        self.primary_pool_pending
    }

    /// Borrowed replica connections.
    #[must_use]
    pub const fn replica_pool_in_use(&self) -> f64 {
        self.replica_pool_in_use
    }

    /// Callers queued on the replica pool.
    #[must_use]
    pub const fn replica_pool_pending(&self) -> f64 {
        self.replica_pool_pending
    }

    /// All numeric fields, in wire order.
    #[must_use]
    pub const fn values(&self) -> [f64; 6] {
        [
            self.http_reads,
            self.http_writes,
            self.primary_pool_in_use,
            self.primary_pool_pending,
            self.replica_pool_in_use,
            self.replica_pool_pending,
        ]
    }
}
