use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::{ErrorKind, ServiceError};
use tracing::error;

/// JSON error body shared by every endpoint: `{ "error": ..., "details"?: ... }`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Self {
        Self { status, error: error.into(), details }
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", entity), None)
    }

    /// Map a service failure; `summary` names the operation (e.g. "Failed to create category").
    pub fn from_service(e: ServiceError, summary: &str) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, e.to_string(), None),
            ErrorKind::Validation => Self::new(StatusCode::BAD_REQUEST, summary, Some(e.to_string())),
            ErrorKind::Internal => {
                error!(err = %e, summary, "store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, summary, Some(e.to_string()))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_details() {
        let e = JsonApiError::from_service(ServiceError::Validation("price must be greater than 0".into()), "Failed to create product");
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.error, "Failed to create product");
        assert_eq!(e.details.as_deref(), Some("validation error: price must be greater than 0"));
    }

    #[test]
    fn not_found_has_no_details() {
        let e = JsonApiError::from_service(ServiceError::not_found("Category"), "Failed to fetch category");
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        let body = serde_json::to_value(&e).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Category not found"}));
    }

    #[test]
    fn db_failure_is_internal() {
        let e = JsonApiError::from_service(ServiceError::Db("connection reset".into()), "Failed to fetch products");
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
