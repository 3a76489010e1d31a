use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gemini_client::GeminiError;
use playlaunch_core::error::LaunchError;

use crate::interstitial::DismissError;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit status codes
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Carries an explicit HTTP 502 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadGatewayError(String);

impl std::fmt::Display for BadGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadGatewayError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 400 Bad Request.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// 502 Bad Gateway: the language model answered with something unusable.
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self(BadGatewayError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<BadGatewayError>().is_some() {
            return StatusCode::BAD_GATEWAY;
        }
        if self.0.downcast_ref::<DismissError>().is_some() {
            return StatusCode::CONFLICT;
        }
        if let Some(e) = self.0.downcast_ref::<GeminiError>() {
            return match e {
                GeminiError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                GeminiError::Http(_)
                | GeminiError::Api { .. }
                | GeminiError::EmptyResponse
                | GeminiError::Parse { .. } => StatusCode::BAD_GATEWAY,
            };
        }
        if let Some(e) = self.0.downcast_ref::<LaunchError>() {
            return match e {
                LaunchError::NotInitialized => StatusCode::BAD_REQUEST,
                LaunchError::ChecklistItemNotFound(_) => StatusCode::NOT_FOUND,
                LaunchError::InvalidStep(_)
                | LaunchError::InvalidLanguage(_)
                | LaunchError::InvalidCategory(_)
                | LaunchError::InvalidPercent(_) => StatusCode::BAD_REQUEST,
                LaunchError::EmptyResponse => StatusCode::BAD_GATEWAY,
                LaunchError::AdLoad(_)
                | LaunchError::Io(_)
                | LaunchError::Yaml(_)
                | LaunchError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "request failed: {:#}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
