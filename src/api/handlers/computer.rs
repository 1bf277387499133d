//! Computer catalog handlers: list, stream, create, search, paginate, delete.

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::Json;
use futures_util::{StreamExt, stream};

use crate::api::dto::PaginationQuery;
use crate::app_state::AppState;
use crate::domain::{Computer, ComputerDescription};
use crate::error::{CatalogError, ErrorResponse};

/// `GET /computer`: List every computer.
///
/// # Errors
///
/// Returns [`CatalogError::Storage`] if the replica query fails.
#[utoipa::path(
    get,
    path = "/computer",
    tag = "Computers",
    summary = "List computers",
    description = "Returns every computer in primary-key order, read from the replica.",
    responses(
        (status = 200, description = "All computers", body = Vec<Computer>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_computers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Computer>>, CatalogError> {
    Ok(Json(state.read_service.list_all().await?))
}

/// `GET /computer/stream`: Stream every computer as NDJSON.
///
/// Rows are written as they arrive from the replica. A failure before the
/// first row yields a regular error response; a later failure aborts the
/// body.
///
/// # Errors
///
/// Returns [`CatalogError::Storage`] if the replica cannot be reached.
#[utoipa::path(
    get,
    path = "/computer/stream",
    tag = "Computers",
    summary = "Stream computers",
    description = "Streams every computer as newline-delimited JSON, one object per line.",
    responses(
        (status = 200, description = "One Computer per line", content_type = "application/x-ndjson", body = Computer),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn stream_computers(State(state): State<AppState>) -> Result<Response, CatalogError> {
    let mut rows = state.read_service.stream_all();
    let first = match rows.next().await {
        Some(Err(e)) => return Err(e),
        other => other,
    };

    let lines = stream::iter(first)
        .chain(rows)
        .map(|row| row.and_then(|computer| ndjson_line(&computer)));

    Ok(([(CONTENT_TYPE, "application/x-ndjson")], Body::from_stream(lines)).into_response())
}

fn ndjson_line(computer: &Computer) -> Result<String, CatalogError> {
    let mut line =
        serde_json::to_string(computer).map_err(|e| CatalogError::Serialization(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

/// `POST /computer`: Create a computer from its description.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] on a malformed body or invalid
/// name, [`CatalogError::Serialization`] or [`CatalogError::Storage`] on
/// server-side failures.
#[utoipa::path(
    post,
    path = "/computer",
    tag = "Computers",
    summary = "Create a computer",
    description = "Stores the description document on the primary. The top-level `name` and `price` become the row's columns.",
    request_body = ComputerDescription,
    responses(
        (status = 201, description = "Computer created", body = Computer),
        (status = 400, description = "Malformed body or invalid name", body = ErrorResponse),
        (status = 500, description = "Serialization or storage failure", body = ErrorResponse),
    )
)]
pub async fn create_computer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, CatalogError> {
    let json = std::str::from_utf8(&body)
        .map_err(|_| CatalogError::Validation("request body is not valid UTF-8".to_string()))?;
    let description = ComputerDescription::decode(json)?;
    let computer = state.write_service.create(&description).await?;
    Ok((StatusCode::CREATED, Json(computer)))
}

/// `GET /computer/search/gpu/{q}`: Search by video card model.
///
/// # Errors
///
/// Returns [`CatalogError::Storage`] if the replica query fails.
#[utoipa::path(
    get,
    path = "/computer/search/gpu/{q}",
    tag = "Computers",
    summary = "Search by GPU",
    description = "Case-insensitive substring match on `placa_video.modelo`.",
    params(
        ("q" = String, Path, description = "Substring of the GPU model"),
    ),
    responses(
        (status = 200, description = "Matching computers", body = Vec<Computer>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn search_by_gpu(
    State(state): State<AppState>,
    Path(q): Path<String>,
) -> Result<Json<Vec<Computer>>, CatalogError> {
    Ok(Json(state.read_service.search_by_gpu(&q).await?))
}

/// `GET /computer/search/ram/{gb}`: Search by total RAM.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] if `gb` is not an integer, or
/// [`CatalogError::Storage`] if the replica query fails.
#[utoipa::path(
    get,
    path = "/computer/search/ram/{gb}",
    tag = "Computers",
    summary = "Search by RAM capacity",
    description = "Exact match on `memoria_ram.capacidade_total_gb`.",
    params(
        ("gb" = i64, Path, description = "Total RAM in GB"),
    ),
    responses(
        (status = 200, description = "Matching computers", body = Vec<Computer>),
        (status = 400, description = "`gb` is not an integer", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn search_by_ram(
    State(state): State<AppState>,
    Path(gb): Path<String>,
) -> Result<Json<Vec<Computer>>, CatalogError> {
    let gb: i64 = gb
        .parse()
        .map_err(|_| CatalogError::Validation(format!("gb must be an integer, got {gb:?}")))?;
    Ok(Json(state.read_service.search_by_ram_capacity(gb).await?))
}

/// `GET /computer/pagination`: Keyset page, newest first.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] on a malformed query or
/// non-positive `limit`, or [`CatalogError::Storage`] if the replica
/// query fails.
#[utoipa::path(
    get,
    path = "/computer/pagination",
    tag = "Computers",
    summary = "Paginate computers",
    description = "Returns up to `limit` computers older than the `(createdAt, id)` cursor, newest first. Pass the last row's `created_at` and `id` to fetch the next page.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of computers", body = Vec<Computer>),
        (status = 400, description = "Malformed cursor or non-positive limit", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn paginate(
    State(state): State<AppState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<Vec<Computer>>, CatalogError> {
    let Query(query) = query.map_err(|rejection| CatalogError::Validation(rejection.body_text()))?;
    let page = state
        .read_service
        .paginate(query.created_at, query.id, query.limit)
        .await?;
    Ok(Json(page))
}

/// `DELETE /computer/{name}`: Delete every computer with this name.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] if no row matched, or
/// [`CatalogError::Storage`] if the primary transaction fails.
#[utoipa::path(
    delete,
    path = "/computer/{name}",
    tag = "Computers",
    summary = "Delete computers by name",
    params(
        ("name" = String, Path, description = "Computer name"),
    ),
    responses(
        (status = 204, description = "At least one computer deleted"),
        (status = 404, description = "No computer with this name"),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_computer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, CatalogError> {
    delete_named(&state, &name).await
}

// `stream` and `pagination` are also valid computer names; their static GET
// routes would otherwise shadow `DELETE /computer/{name}`.
async fn delete_named_stream(State(state): State<AppState>) -> Result<StatusCode, CatalogError> {
    delete_named(&state, "stream").await
}

async fn delete_named_pagination(
    State(state): State<AppState>,
) -> Result<StatusCode, CatalogError> {
    delete_named(&state, "pagination").await
}

async fn delete_named(state: &AppState, name: &str) -> Result<StatusCode, CatalogError> {
    let deleted = state.write_service.delete_by_name(name).await?;
    if deleted == 0 {
        return Err(CatalogError::NotFound(format!("no computer named {name:?}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Computer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/computer", get(list_computers).post(create_computer))
        .route(
            "/computer/stream",
            get(stream_computers).delete(delete_named_stream),
        )
        .route(
            "/computer/pagination",
            get(paginate).delete(delete_named_pagination),
        )
        .route("/computer/search/gpu/{q}", get(search_by_gpu))
        .route("/computer/search/ram/{gb}", get(search_by_ram))
        .route("/computer/{name}", delete(delete_computer))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn ndjson_line_is_one_terminated_object() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_micro_opt(12, 30, 0, 123_456));
        let Some(created_at) = created_at else {
            panic!("bad test timestamp");
        };
        let computer = Computer {
            id: 7,
            name: "box1".to_string(),
            price: Some(Decimal::new(100_050, 2)),
            description: Some(r#"{"name":"box1"}"#.to_string()),
            created_at,
        };
        let Ok(line) = ndjson_line(&computer) else {
            panic!("serialization failed");
        };
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains(r#""id":7"#));
        assert!(line.contains(r#""created_at":"2024-05-01T12:30:00.123456""#));
    }
}
