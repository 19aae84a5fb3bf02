// SPDX-License-Identifier: Apache-2.0
//! Error types for the contact relay

use crate::mailer::MailerError;
use crate::validator::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal failures of a relay request
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid input")]
    Validation(Vec<FieldError>),

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error(transparent)]
    Provider(#[from] MailerError),

    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Provider(_) | RelayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RelayError>;
