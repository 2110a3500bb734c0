use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::error;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self(e) }
}

// 请求体或路径参数无法解析时，统一返回 JSON 错误体
impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self { Self(ServiceError::Validation(rej.body_text())) }
}

impl From<PathRejection> for ApiError {
    fn from(rej: PathRejection) -> Self { Self(ServiceError::Validation(rej.body_text())) }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ServiceError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self.0, "storage failure");
        }
        let body = ErrorBody { error: code, message: self.0.to_string() };
        (status, Json(body)).into_response()
    }
}
