// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email dispatch.
//!
//! [`Mailer`] is the seam between the relay handler and the transactional
//! email provider. [`ResendMailer`] talks to the Resend HTTP API.

use crate::config::MailConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Email dispatch errors.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// A fully rendered message ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

/// Sends rendered messages through an email provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailerError>;
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Resend API client.
pub struct ResendMailer {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResendMailer {
    /// Create a new client from mail configuration.
    pub fn new(config: &MailConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.api_url)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailerError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let receipt: SendReceipt = response.json().await?;
            debug!(id = ?receipt.id, "Provider accepted message");
            Ok(receipt)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("Email provider error: {}", status));
            Err(MailerError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}
