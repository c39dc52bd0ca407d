//! Cache controller.

use crate::{
    responses::{no_content, ok, ok_or_no_content, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use cachedeck_core::CacheDeckError;
use serde_json::Value;
use tracing::debug;

/// Creates the cache router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cache", get(list_caches))
        .route("/cache/:cache_name", get(lookup_cache).delete(delete_cache))
        .route("/cache/:cache_name/:key", get(get_entry).post(put_entry))
}

/// List every known cache name.
#[utoipa::path(
    get,
    path = "/cache",
    tag = "cache",
    responses(
        (status = 200, description = "Known cache names, sorted", body = Vec<String>),
        (status = 500, description = "Store command failed", body = cachedeck_core::ErrorResponse),
        (status = 503, description = "Store unreachable", body = cachedeck_core::ErrorResponse)
    )
)]
pub async fn list_caches(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    debug!("List caches request");

    let names = state.cache_service.list_caches().await?;
    ok(names.into_iter().map(String::from).collect())
}

/// Resolve a cache by name.
#[utoipa::path(
    get,
    path = "/cache/{cache_name}",
    tag = "cache",
    params(("cache_name" = String, Path, description = "Cache name")),
    responses(
        (status = 200, description = "Cache name", body = String),
        (status = 204, description = "Cache cannot be resolved"),
        (status = 400, description = "Invalid cache name", body = cachedeck_core::ErrorResponse)
    )
)]
pub async fn lookup_cache(
    State(state): State<AppState>,
    Path(cache_name): Path<String>,
) -> Result<Response, AppError> {
    debug!("Lookup cache request: {}", cache_name);

    let name = state.cache_service.lookup_cache(&cache_name).await?;
    ok_or_no_content(name.map(String::from))
}

/// Clear a cache and remove it from the directory.
#[utoipa::path(
    delete,
    path = "/cache/{cache_name}",
    tag = "cache",
    params(("cache_name" = String, Path, description = "Cache name")),
    responses(
        (status = 204, description = "Cache cleared"),
        (status = 400, description = "Invalid cache name", body = cachedeck_core::ErrorResponse)
    )
)]
pub async fn delete_cache(
    State(state): State<AppState>,
    Path(cache_name): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete cache request: {}", cache_name);

    state.cache_service.delete_cache(&cache_name).await?;
    Ok(no_content())
}

/// Read one entry.
#[utoipa::path(
    get,
    path = "/cache/{cache_name}/{key}",
    tag = "cache",
    params(
        ("cache_name" = String, Path, description = "Cache name"),
        ("key" = String, Path, description = "Entry key")
    ),
    responses(
        (status = 200, description = "Stored value", body = serde_json::Value),
        (status = 204, description = "Cache or entry absent"),
        (status = 400, description = "Invalid cache name", body = cachedeck_core::ErrorResponse)
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path((cache_name, key)): Path<(String, String)>,
) -> Result<Response, AppError> {
    debug!("Get entry request: {}/{}", cache_name, key);

    let value = state.cache_service.get_entry(&cache_name, &key).await?;
    ok_or_no_content(value)
}

/// Store one entry.
///
/// A body sent as `application/json` is stored as that JSON value; any
/// other body is stored as a string.
#[utoipa::path(
    post,
    path = "/cache/{cache_name}/{key}",
    tag = "cache",
    params(
        ("cache_name" = String, Path, description = "Cache name"),
        ("key" = String, Path, description = "Entry key")
    ),
    request_body(content = String, description = "Raw value", content_type = "text/plain"),
    responses(
        (status = 204, description = "Value stored"),
        (status = 400, description = "Invalid cache name or malformed JSON", body = cachedeck_core::ErrorResponse),
        (status = 404, description = "Cache is not configured", body = cachedeck_core::ErrorResponse)
    )
)]
pub async fn put_entry(
    State(state): State<AppState>,
    Path((cache_name, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    debug!("Put entry request: {}/{}", cache_name, key);

    let value = parse_value(&headers, body)?;
    state.cache_service.put_entry(&cache_name, &key, value).await?;
    Ok(no_content())
}

fn parse_value(headers: &HeaderMap, body: String) -> Result<Value, AppError> {
    if is_json(headers) {
        serde_json::from_str(&body).map_err(|e| {
            AppError(CacheDeckError::validation(format!("Malformed JSON body: {}", e)))
        })
    } else {
        Ok(Value::String(body))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
