//! Persisted computer record.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// A row of the `computers` table.
///
/// Rows are created by [`crate::service::ComputerWriteService::create`] and
/// never updated afterwards; `id` and `created_at` are assigned by the
/// store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Computer {
    /// Primary key (`bigserial`).
    pub id: i64,

    /// Identifying name, at most 40 characters. Deletion key.
    pub name: String,

    /// Build price.
    pub price: Option<Decimal>,

    /// The stored description document, verbatim (not re-parsed).
    pub description: Option<String>,

    /// Insert timestamp; first component of the pagination cursor.
    pub created_at: NaiveDateTime,
}

impl Computer {
    /// Keyset cursor `(created_at, id)` pointing just past this row.
    #[must_use]
    pub const fn cursor(&self) -> (NaiveDateTime, i64) {
        (self.created_at, self.id)
    }
}
