//! Primary-bound mutations.

use futures_util::FutureExt;
use sqlx::postgres::PgRow;

use crate::domain::{Computer, ComputerDescription};
use crate::error::CatalogError;
use crate::persistence::{COMPUTER_COLUMNS, ComputerRowMapper, DataSource};

/// Writes to the `computers` table through the primary.
///
/// Each call runs in its own transaction via [`DataSource::with_tx`].
#[derive(Debug, Clone)]
pub struct ComputerWriteService {
    primary: DataSource,
}

impl ComputerWriteService {
    /// Creates a write service over `primary`.
    #[must_use]
    pub fn new(primary: DataSource) -> Self {
        Self { primary }
    }

    /// Returns the underlying datasource.
    #[must_use]
    pub const fn datasource(&self) -> &DataSource {
        &self.primary
    }

    /// Inserts a computer built from `description`.
    ///
    /// `name` and `price` come from the description's top-level fields; the
    /// whole document is stored in `description`. Returns the row as the
    /// database produced it.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] if `name` is blank or too long.
    /// - [`CatalogError::Serialization`] if the description cannot be encoded.
    /// - [`CatalogError::Storage`] on driver or transaction failure.
    pub async fn create(&self, description: &ComputerDescription) -> Result<Computer, CatalogError> {
        description.validate()?;
        let document = description.encode().inspect_err(|e| {
            tracing::error!(
                fingerprint = %description.fingerprint(),
                error = %e,
                "computer description could not be encoded"
            );
        })?;

        let name = description.name.clone();
        let price = description.price;
        let sql = format!(
            "INSERT INTO computers (name, price, description) \
             VALUES ($1, $2, $3::jsonb) \
             RETURNING {COMPUTER_COLUMNS}"
        );

        let computer = self
            .primary
            .with_tx(move |conn| {
                async move {
                    sqlx::query(&sql)
                        .bind(name)
                        .bind(price)
                        .bind(document)
                        .try_map(|row: PgRow| ComputerRowMapper::map_row(&row))
                        .fetch_one(conn)
                        .await
                        .map_err(CatalogError::from)
                }
                .boxed()
            })
            .await?;

        tracing::info!(id = computer.id, name = %computer.name, "computer created");
        Ok(computer)
    }

    /// Deletes every row named `name` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on driver or transaction failure.
    pub async fn delete_by_name(&self, name: &str) -> Result<u64, CatalogError> {
        let name = name.to_string();
        let deleted = self
            .primary
            .with_tx(move |conn| {
                async move {
                    sqlx::query("DELETE FROM computers WHERE name = $1")
                        .bind(name)
                        .execute(conn)
                        .await
                        .map(|done| done.rows_affected())
                        .map_err(CatalogError::from)
                }
                .boxed()
            })
            .await?;

        tracing::info!(deleted, "computers deleted");
        Ok(deleted)
    }
}
