//! Mapping from `computers` result rows to [`Computer`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::Computer;

/// Select list every computer query uses.
///
/// `description` is cast to text so the stored document comes back
/// verbatim instead of being decoded into a JSON value.
pub const COMPUTER_COLUMNS: &str = "id, name, price, description::text AS description, created_at";

/// Stateless row-to-record converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputerRowMapper;

impl ComputerRowMapper {
    /// Reads `id`, `name`, `price`, `description` and `created_at` from
    /// `row`.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if a column is missing or has an
    /// incompatible type.
    pub fn map_row(row: &PgRow) -> Result<Computer, sqlx::Error> {
        Ok(Computer {
            id: row.try_get::<i64, _>("id")?,
            name: row.try_get::<String, _>("name")?,
            price: row.try_get::<Option<Decimal>, _>("price")?,
            description: row.try_get::<Option<String>, _>("description")?,
            created_at: row.try_get::<NaiveDateTime, _>("created_at")?,
        })
    }
}
