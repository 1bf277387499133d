//! Persistence layer: instrumented PostgreSQL datasources and row mapping.
//!
//! Each [`DataSource`] wraps one `sqlx::PgPool` under a logical client
//! name and keeps its pool gauges in the [`crate::monitoring::MetricsRegistry`]
//! current. The primary (`"<default>"`) takes writes, the replica
//! (`"leitura"`) serves reads; the two are never mixed.

pub mod datasource;
pub mod row_mapper;

pub use datasource::{DataSource, PRIMARY_CLIENT_NAME, REPLICA_CLIENT_NAME, TrackedConnection};
pub use row_mapper::{COMPUTER_COLUMNS, ComputerRowMapper};
