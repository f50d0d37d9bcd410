//! Error types for the feed service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Feed Error Enum ==
/// Unified error type for the feed service.
///
/// A cache miss is not represented here: lookups return `Option` and a miss
/// simply sends the caller to the upstream source.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Caller supplied an argument outside its domain (e.g. zero items per row)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The upstream photo API failed or answered with a non-200 meta code
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Upstream(err.to_string())
    }
}

impl From<QueryRejection> for FeedError {
    fn from(rejection: QueryRejection) -> Self {
        FeedError::InvalidArgument(rejection.body_text())
    }
}

impl FeedError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            FeedError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            FeedError::Upstream(_) => StatusCode::BAD_GATEWAY,
            FeedError::Config(_) | FeedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the feed service.
pub type Result<T> = std::result::Result<T, FeedError>;
