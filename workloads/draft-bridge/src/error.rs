//! Error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use draft_commerce::CommerceError;
use serde::Serialize;
use thiserror::Error;

/// Message returned for internal faults; the detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Everything a draft route can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No rows, or a body that is not the expected JSON.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Normalization left nothing to submit.
    #[error("Nothing to submit")]
    EmptyOrder,

    /// The shop rejected the draft or could not be reached.
    #[error("Upstream failure: {details}")]
    Upstream { status: Option<u16>, details: String },

    /// Anything unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::EmptyOrder => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this failure is reported to the alert sink.
    pub fn should_alert(&self) -> bool {
        matches!(self, ApiError::Upstream { .. } | ApiError::Internal(_))
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Invalid request",
            ApiError::EmptyOrder => "Draft order would be empty",
            ApiError::Upstream { .. } => "Failed to create draft order",
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            ApiError::Validation(details) | ApiError::Upstream { details, .. } => Some(details),
            ApiError::EmptyOrder | ApiError::Internal(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::Validation(details) => ApiError::Validation(details),
            CommerceError::InvalidAmount(_) | CommerceError::InvalidPercent(_) => {
                ApiError::Validation(e.to_string())
            }
            CommerceError::EmptyOrder => ApiError::EmptyOrder,
            CommerceError::Upstream { status, details } => ApiError::Upstream { status, details },
            CommerceError::CatalogUnavailable(details) => ApiError::Upstream {
                status: None,
                details,
            },
            CommerceError::Overflow | CommerceError::Serialization(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // === Status mapping ===

    #[tokio::test]
    async fn test_validation_is_400_with_details() {
        let (status, body) = body_json(ApiError::Validation("quote has no rows".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "quote has no rows");
    }

    #[tokio::test]
    async fn test_empty_order_is_400_without_details() {
        let (status, body) = body_json(ApiError::EmptyOrder).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_upstream_is_502_with_upstream_text() {
        let (status, body) = body_json(ApiError::Upstream {
            status: Some(422),
            details: "line_items invalid".into(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["details"], "line_items invalid");
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let (status, body) = body_json(ApiError::Internal("overflow at row 3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }

    // === Conversions ===

    #[test]
    fn test_from_commerce_error() {
        assert_eq!(ApiError::from(CommerceError::EmptyOrder), ApiError::EmptyOrder);
        assert!(matches!(
            ApiError::from(CommerceError::InvalidAmount("abc".into())),
            ApiError::Validation(_)
        ));
        assert_eq!(
            ApiError::from(CommerceError::upstream(Some(500), "boom")),
            ApiError::Upstream {
                status: Some(500),
                details: "boom".into()
            }
        );
        assert!(matches!(
            ApiError::from(CommerceError::Overflow),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_alerting_kinds() {
        assert!(!ApiError::Validation("x".into()).should_alert());
        assert!(!ApiError::EmptyOrder.should_alert());
        assert!(ApiError::Internal("x".into()).should_alert());
        assert!(ApiError::Upstream {
            status: None,
            details: "x".into()
        }
        .should_alert());
    }
}
