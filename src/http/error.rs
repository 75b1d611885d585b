//! API error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::request::MalformedUrlError;
use crate::session::StoreError;
use crate::transport::TransportError;

/// Failures surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    MalformedUrl(#[from] MalformedUrlError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(e) => store_status(e),
            ApiError::MalformedUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(DispatchError::Store(e)) => store_status(e),
            ApiError::Dispatch(DispatchError::MalformedUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(DispatchError::Transport { source, .. }) => match source {
                TransportError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                TransportError::UnsupportedScheme(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidMethod(_) | StoreError::MalformedUrl(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "API request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(StoreError::NotFound(3)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(MalformedUrlError::new("x", "bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DispatchError::Store(StoreError::NotFound(1))).status(),
            StatusCode::NOT_FOUND
        );

        let timeout = DispatchError::Transport {
            attempts: 3,
            source: TransportError::Timeout { stage: "read", after_ms: 10 },
        };
        assert_eq!(ApiError::from(timeout).status(), StatusCode::GATEWAY_TIMEOUT);

        let refused = DispatchError::Transport {
            attempts: 1,
            source: TransportError::EmptyResponse,
        };
        assert_eq!(ApiError::from(refused).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_body_message() {
        let err = ApiError::from(StoreError::NotFound(12));
        assert_eq!(err.to_string(), "session 12 not found");
    }
}
