// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay.
//!
//! A submission is rate limited, validated, rendered with every field
//! escaped, and forwarded once to the email provider. There are no
//! retries; the caller decides whether to try again.

use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{Mailer, OutboundEmail};
use crate::template::ContactEmail;
use crate::validator::ContactValidator;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Identifier used when no forwarding header names the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub validator: ContactValidator,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Successful relay response.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Client identifier from `x-forwarded-for`, then `x-real-ip`.
///
/// The header value is used verbatim as the rate-limit key.
pub fn client_identifier(headers: &HeaderMap) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Relay a contact form submission to the site owner.
pub async fn send_contact_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<SendResponse>> {
    let client = client_identifier(&headers);

    if let RateLimitResult::Limited { retry_after } = state.limiter.check_and_record(&client).await
    {
        info!(
            client = %client,
            retry_after_secs = retry_after.as_secs(),
            "Rate limit exceeded"
        );
        return Err(RelayError::RateLimited);
    }

    let body = body.map_err(|rejection| {
        error!(client = %client, error = %rejection, "Unreadable request body");
        RelayError::Transport(rejection.body_text())
    })?;

    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(client = %client, error = %e, "Malformed request body");
        RelayError::from(e)
    })?;

    let submission = state.validator.validate(&raw).map_err(|details| {
        info!(client = %client, errors = ?details, "Validation failed");
        RelayError::Validation(details)
    })?;

    info!(from = %submission.email, "Sending contact form email");

    let rendered = ContactEmail::compose(&submission);
    let email = OutboundEmail {
        from: state.config.mail.from.clone(),
        to: state.config.mail.to.clone(),
        reply_to: submission.email.clone(),
        subject: rendered.subject,
        html: rendered.html,
    };

    match state.mailer.send(&email).await {
        Ok(receipt) => {
            info!(id = ?receipt.id, "Email sent successfully");
            Ok(Json(SendResponse { success: true }))
        }
        Err(e) => {
            warn!(client = %client, error = %e, "Email dispatch failed");
            Err(RelayError::Provider(e))
        }
    }
}
