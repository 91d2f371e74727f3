use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::types::Envelope;

/// Error classes surfaced to HTTP callers of either service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    MethodNotAllowed,
    UpstreamUnavailable,
    InternalError,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), details: None }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self { Self::new(ErrorKind::InvalidInput, message) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(ErrorKind::NotFound, message) }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self { Self::new(ErrorKind::InternalError, message) }

    /// Unknown route, or a path that does not parse into a valid resource id.
    pub fn route_not_found() -> Self { Self::not_found("route not found") }

    /// Known route, unsupported verb.
    pub fn method_not_allowed() -> Self { Self::new(ErrorKind::MethodNotAllowed, "method not allowed") }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn kind(&self) -> ErrorKind { self.kind }

    pub fn message(&self) -> &str { &self.message }

    pub fn details(&self) -> Option<&str> { self.details.as_deref() }

    pub fn status(&self) -> StatusCode { self.kind.status_code() }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.message, details = ?self.details, "request failed");
        }
        let mut body = Envelope::error(self.message);
        if let Some(details) = self.details {
            body = body.with_details(details);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ApiError::invalid_input("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::upstream_unavailable("x").status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::method_not_allowed().status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn renders_error_envelope() {
        async fn failing() -> ApiError {
            ApiError::upstream_unavailable("item store is unavailable").with_details("connection refused")
        }

        let app = Router::new().route("/fail", get(failing));
        let request = Request::builder().uri("/fail").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "item store is unavailable");
        assert_eq!(body["details"], "connection refused");
    }
}
