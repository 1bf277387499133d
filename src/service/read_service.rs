//! Replica-bound queries.

use chrono::NaiveDateTime;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use sqlx::postgres::PgRow;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::Computer;
use crate::error::CatalogError;
use crate::persistence::{COMPUTER_COLUMNS, ComputerRowMapper, DataSource};

/// Rows buffered between the streaming query and its consumer.
const STREAM_BUFFER: usize = 32;

/// Read-only access to the `computers` table through the replica.
///
/// Every method borrows from the replica [`DataSource`] only, for the span
/// of one query, and never opens a transaction.
#[derive(Debug, Clone)]
pub struct ComputerReadService {
    replica: DataSource,
}

impl ComputerReadService {
    /// Creates a read service over `replica`.
    #[must_use]
    pub fn new(replica: DataSource) -> Self {
        Self { replica }
    }

    /// Returns the underlying datasource.
    #[must_use]
    pub const fn datasource(&self) -> &DataSource {
        &self.replica
    }

    /// All rows in primary-key order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on driver failure.
    pub async fn list_all(&self) -> Result<Vec<Computer>, CatalogError> {
        let mut conn = self.replica.acquire().await?;
        let sql = format!("SELECT {COMPUTER_COLUMNS} FROM computers ORDER BY id");
        let rows = sqlx::query(&sql)
            .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// All rows, one at a time as they arrive from the driver.
    ///
    /// Nothing is borrowed until the stream is first polled. The query then
    /// runs on a spawned task holding one replica connection until the
    /// result set is exhausted or the stream is dropped; dropping it also
    /// abandons a borrow still queued on the pool. Only a small fixed
    /// buffer of rows is held in memory. The stream ends after the first
    /// error.
    #[must_use]
    pub fn stream_all(&self) -> BoxStream<'static, Result<Computer, CatalogError>> {
        let replica = self.replica.clone();
        stream::once(async move {
            let (tx, rx) = mpsc::channel(STREAM_BUFFER);
            tokio::spawn(pump_rows(replica, tx));
            ReceiverStream::new(rx)
        })
        .flatten()
        .boxed()
    }

    /// Keyset page ordered by `(created_at DESC, id DESC)`.
    ///
    /// Returns up to `limit` rows strictly older than the cursor
    /// `(created_at, id)`. A missing `created_at` means "now", a missing
    /// `id` means no bound on `id`. Pass the [`Computer::cursor`] of the
    /// last row to get the next page.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if `limit <= 0`, or
    /// [`CatalogError::Storage`] on driver failure.
    pub async fn paginate(
        &self,
        created_at: Option<NaiveDateTime>,
        id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Computer>, CatalogError> {
        if limit <= 0 {
            return Err(CatalogError::Validation(format!(
                "limit must be positive, got {limit}"
            )));
        }

        let mut conn = self.replica.acquire().await?;
        let sql = format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers \
             WHERE created_at < COALESCE($1, LOCALTIMESTAMP) \
                OR (created_at = COALESCE($1, LOCALTIMESTAMP) AND id < $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(created_at)
            .bind(id.unwrap_or(i64::MAX))
            .bind(limit)
            .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Rows whose video card model contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on driver failure.
    pub async fn search_by_gpu(&self, query: &str) -> Result<Vec<Computer>, CatalogError> {
        let mut conn = self.replica.acquire().await?;
        let sql = format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers \
             WHERE description -> 'placa_video' ->> 'modelo' ILIKE '%' || $1 || '%' \
             ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(query)
            .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Rows whose total RAM equals `gb`.
    ///
    /// Rows without a numeric `memoria_ram.capacidade_total_gb` never
    /// match.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on driver failure.
    pub async fn search_by_ram_capacity(&self, gb: i64) -> Result<Vec<Computer>, CatalogError> {
        let mut conn = self.replica.acquire().await?;
        let sql = format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers \
             WHERE CASE \
                 WHEN (description -> 'memoria_ram' ->> 'capacidade_total_gb') ~ '^[0-9]+$' \
                 THEN (description -> 'memoria_ram' ->> 'capacidade_total_gb')::numeric \
             END = $1 \
             ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(gb)
            .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }
}

/// Feeds `tx` from one replica query. Every await also watches for the
/// receiver going away, so an abandoned stream releases its queue slot or
/// connection without waiting for the next row.
async fn pump_rows(replica: DataSource, tx: mpsc::Sender<Result<Computer, CatalogError>>) {
    let acquired = tokio::select! {
        () = tx.closed() => {
            tracing::debug!("stream consumer went away before a connection was borrowed");
            return;
        }
        acquired = replica.acquire() => acquired,
    };
    let mut conn = match acquired {
        Ok(conn) => conn,
        Err(e) => {
            let _ = tx.send(Err(e)).await;
            return;
        }
    };

    let sql = format!("SELECT {COMPUTER_COLUMNS} FROM computers ORDER BY id");
    let mut rows = sqlx::query(&sql)
        .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
        .fetch(&mut *conn);

    loop {
        let next = tokio::select! {
            () = tx.closed() => {
                tracing::debug!("stream consumer went away, releasing connection");
                break;
            }
            next = rows.next() => next,
        };
        let Some(item) = next else {
            break;
        };
        let item = item.map_err(CatalogError::from);
        let failed = item.is_err();
        if tx.send(item).await.is_err() || failed {
            break;
        }
    }
}
