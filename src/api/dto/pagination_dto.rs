//! Keyset pagination query parameters.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, de};
use utoipa::IntoParams;

/// Page size used when `limit` is omitted.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Query of `GET /computer/pagination`.
///
/// `createdAt` and `id` are the cursor of the last row of the previous
/// page; both may be omitted (or left empty) for the first page.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Cursor timestamp, `YYYY-MM-DDTHH:MM:SS[.ffffff]`. Defaults to now.
    #[serde(rename = "createdAt", default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2024-05-01T12:30:00.123456")]
    pub created_at: Option<NaiveDateTime>,

    /// Cursor id. Unbounded when omitted.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<i64>,

    /// Maximum rows returned; must be positive.
    #[serde(default = "default_limit")]
    #[param(default = 20, minimum = 1)]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    fn parse(query: &str) -> Option<PaginationQuery> {
        let Ok(uri) = format!("/computer/pagination?{query}").parse::<Uri>() else {
            panic!("bad test uri");
        };
        Query::<PaginationQuery>::try_from_uri(&uri).ok().map(|q| q.0)
    }

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let Some(query) = parse("") else {
            panic!("empty query must parse");
        };
        assert_eq!(query.created_at, None);
        assert_eq!(query.id, None);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn parses_a_full_cursor() {
        let Some(query) = parse("createdAt=2024-05-01T12:30:00.123456&id=42&limit=2") else {
            panic!("cursor query must parse");
        };
        let Ok(expected) = NaiveDateTime::parse_from_str(
            "2024-05-01T12:30:00.123456",
            "%Y-%m-%dT%H:%M:%S%.f",
        ) else {
            panic!("bad expected timestamp");
        };
        assert_eq!(query.created_at, Some(expected));
        assert_eq!(query.id, Some(42));
        assert_eq!(query.limit, 2);
    }

    #[test]
    fn empty_cursor_values_are_absent() {
        let Some(query) = parse("createdAt=&id=&limit=5") else {
            panic!("empty cursor values must parse");
        };
        assert_eq!(query.created_at, None);
        assert_eq!(query.id, None);
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(parse("createdAt=yesterday").is_none());
        assert!(parse("id=abc").is_none());
        assert!(parse("limit=ten").is_none());
    }
}
