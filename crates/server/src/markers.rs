use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use service::marker::Marker;
use tracing::info;

use crate::{errors::ApiError, metrics, state::AppState};

#[utoipa::path(
    get, path = "/api/markers", tag = "markers",
    responses(
        (status = 200, description = "All markers", body = [crate::openapi::MarkerDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Marker>>, ApiError> {
    let res = state.markers.list().await;
    metrics::record("list", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    get, path = "/api/markers/{id}", tag = "markers",
    params(("id" = i64, Path, description = "Marker ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::MarkerDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Marker>, ApiError> {
    let Path(id) = id?;
    let res = state.markers.get_by_id(id).await;
    metrics::record("get", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    post, path = "/api/markers", tag = "markers",
    request_body = crate::openapi::MarkerDoc,
    responses(
        (status = 200, description = "Stored marker with its assigned id", body = crate::openapi::MarkerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "A marker already exists at these coordinates", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<Marker>, JsonRejection>,
) -> Result<Json<Marker>, ApiError> {
    let Json(marker) = payload?;
    let res = state.markers.add(marker).await;
    metrics::record("add", &res);
    let stored = res?;
    info!(id = ?stored.id, kind = stored.kind.as_str(), "created marker");
    Ok(Json(stored))
}

#[utoipa::path(
    put, path = "/api/markers", tag = "markers",
    request_body = crate::openapi::MarkerDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MarkerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "A marker already exists at these coordinates", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<Marker>, JsonRejection>,
) -> Result<Json<Marker>, ApiError> {
    let Json(marker) = payload?;
    let res = state.markers.update(marker).await;
    metrics::record("update", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    delete, path = "/api/markers/{id}", tag = "markers",
    params(("id" = i64, Path, description = "Marker ID")),
    responses(
        (status = 204, description = "Deleted (or already absent)"),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let res = state.markers.delete(id).await;
    metrics::record("delete", &res);
    res?;
    Ok(StatusCode::NO_CONTENT)
}
