use std::fmt::Display;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Errors surfaced to clients. Each variant renders as
/// `{"success": false, "error": <code>, "message": <text>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(source) = &self {
            tracing::error!("Internal error: {source:#}");
        }
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Internal(error.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected JSON body: {}", rejection.body_text());
        ApiError::Unprocessable
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", rejection.body_text());
        ApiError::NotFound
    }
}

/// Collapses any failure into the single error code a handler reports,
/// logging the underlying cause.
pub trait Collapse<T> {
    fn or_not_found(self) -> Result<T, ApiError>;
    fn or_unprocessable(self) -> Result<T, ApiError>;
}

impl<T, E: Display> Collapse<T> for Result<T, E> {
    fn or_not_found(self) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::warn!("Reporting not found: {e}");
            ApiError::NotFound
        })
    }

    fn or_unprocessable(self) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::warn!("Reporting unprocessable: {e}");
            ApiError::Unprocessable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_generic_error_body() {
        let (status, body) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 404, "message": "resource not found"})
        );

        let (status, body) = body_json(ApiError::Unprocessable).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], 422);
        assert_eq!(body["message"], "unprocessable");

        let (status, body) = body_json(ApiError::BadRequest).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let (status, body) = body_json(sqlx::Error::PoolTimedOut.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], 500);
        assert_eq!(body["message"], "internal server error");
    }

    #[test]
    fn collapse_maps_every_error_to_one_code() {
        let missing: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        assert!(matches!(missing.or_unprocessable(), Err(ApiError::Unprocessable)));

        let outage: Result<(), sqlx::Error> = Err(sqlx::Error::PoolClosed);
        assert!(matches!(outage.or_not_found(), Err(ApiError::NotFound)));

        let ok: Result<i64, sqlx::Error> = Ok(3);
        assert_eq!(ok.or_not_found().unwrap(), 3);
    }
}
