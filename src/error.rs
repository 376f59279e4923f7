use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Every way a quote request can fail.
///
/// The `Display` form carries diagnostic detail for logs; callers only ever
/// see [`QuoteError::public_message`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuoteError {
    #[error("symbol is required")]
    InvalidInput,

    #[error("upstream unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("upstream body is not valid JSON: {0}")]
    UpstreamMalformed(String),

    #[error("no chart metadata for {0}")]
    NotFound(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl QuoteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable(_) | Self::UpstreamError { .. } | Self::UpstreamMalformed(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "symbol is required",
            Self::UpstreamUnavailable(_) => "Upstream request failed",
            Self::UpstreamError { .. } => "Failed to fetch quote",
            Self::UpstreamMalformed(_) => "Invalid upstream response",
            Self::NotFound(_) => "No data found",
            Self::MethodNotAllowed => "Method not allowed",
        }
    }

    /// Short outcome class used in log lines.
    pub fn class(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamError { .. } => "upstream_error",
            Self::UpstreamMalformed(_) => "upstream_malformed",
            Self::NotFound(_) => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
