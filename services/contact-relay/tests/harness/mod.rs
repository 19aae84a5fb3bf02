// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for driving the relay router in-process.
//!
//! Provides mailers that record or refuse messages, and helpers for
//! building requests and reading JSON responses.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use contact_relay::{
    build_router,
    config::{Config, MailConfig, RateLimitConfig},
    handlers::AppState,
    limiter::RateLimiter,
    mailer::{Mailer, MailerError, OutboundEmail, SendReceipt},
    validator::ContactValidator,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Mailer that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailerError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(SendReceipt {
            id: Some("test-message-id".to_string()),
        })
    }
}

/// Mailer that always fails the way a provider rejection does.
pub struct RejectingMailer {
    pub message: String,
}

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<SendReceipt, MailerError> {
        Err(MailerError::Rejected {
            status: 403,
            message: self.message.clone(),
        })
    }
}

pub fn test_config() -> Config {
    let mut mail = MailConfig::with_api_key("re_test");
    mail.to = vec!["owner@example.com".to_string()];
    Config::new(mail)
}

/// Router backed by `mailer`, with the given limiter settings.
pub fn router_with(mailer: Arc<dyn Mailer>, rate_limit: RateLimitConfig) -> Router {
    let config = test_config();
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(rate_limit),
        validator: ContactValidator::new(),
        mailer,
        config,
    });
    build_router(state).unwrap()
}

/// Router with default limits and a recording mailer.
pub fn recording_router() -> (Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let router = router_with(mailer.clone(), RateLimitConfig::default());
    (router, mailer)
}

pub fn post_json(client_ip: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client_ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub const VALID_SUBMISSION: &str =
    r#"{"name":"Jo","email":"jo@example.com","subject":"Hi","message":"Hello\nWorld"}"#;
