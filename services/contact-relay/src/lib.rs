// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! Relays portfolio contact form submissions to the site owner's inbox:
//!
//! - Per-client sliding-window rate limiting (3 per hour default)
//! - Strict validation of `name`, `email`, `subject`, `message`
//! - HTML escaping of every submitted value
//! - Single-shot dispatch through the Resend HTTP API
//! - Permissive CORS on every response, including errors

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod template;
pub mod validator;

pub use config::Config;
pub use error::RelayError;
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{Mailer, OutboundEmail, ResendMailer};
pub use validator::{ContactSubmission, ContactValidator, FieldError};

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use config::{ConfigError, CorsConfig};
use handlers::{health, send_contact_email, AppState};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Largest accepted request body. A maximal valid submission is well
/// under this; larger bodies fail as transport errors.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the CORS layer. `OPTIONS` requests are answered here and never
/// reach a handler.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origin = if config.allow_origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        let value = HeaderValue::from_str(config.allow_origin.trim())
            .map_err(|_| ConfigError::InvalidCors(config.allow_origin.clone()))?;
        AllowOrigin::exact(value)
    };

    let headers = config
        .allow_headers
        .iter()
        .map(|h| {
            HeaderName::from_bytes(h.trim().as_bytes())
                .map_err(|_| ConfigError::InvalidCors(h.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list(headers)))
}

/// Assemble the service router.
pub fn build_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let cors = cors_layer(&state.config.cors)?;

    Ok(Router::new()
        .route("/", post(send_contact_email))
        .route("/send-contact-email", post(send_contact_email))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
