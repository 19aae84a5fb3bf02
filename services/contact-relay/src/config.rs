// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay.
//!
//! Values come from environment variables, falling back to the defaults
//! below. Only the provider API key has no default.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid CORS setting: {0}")]
    InvalidCors(String),
}

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Outbound mail configuration
    pub mail: MailConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Per-client submission limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per client within the window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: usize,

    /// Rolling window length in milliseconds (default: 1 hour)
    #[serde(default = "default_time_window_ms")]
    pub time_window_ms: u64,

    /// How often idle clients are evicted, in seconds (default: 300)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Email provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Provider API key, never written back out
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Provider base URL (default: https://api.resend.com)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Sender identity shown on every message
    #[serde(default = "default_from")]
    pub from: String,

    /// Site owner address(es) receiving submissions
    #[serde(default = "default_to")]
    pub to: Vec<String>,
}

// Keep the key out of logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Cross-origin settings applied to every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origin, `*` for any (default: *)
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,

    /// Request headers browsers may send
    #[serde(default = "default_allow_headers")]
    pub allow_headers: Vec<String>,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_submissions() -> usize {
    3
}

fn default_time_window_ms() -> u64 {
    3_600_000
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}

fn default_to() -> Vec<String> {
    vec!["mugiranezaelisee0@gmail.com".to_string()]
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_allow_headers() -> Vec<String> {
    ["authorization", "x-client-info", "apikey", "content-type"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            time_window_ms: default_time_window_ms(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
            allow_headers: default_allow_headers(),
        }
    }
}

impl MailConfig {
    /// Mail settings with every default except the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            from: default_from(),
            to: default_to(),
        }
    }
}

impl RateLimitConfig {
    /// Get the cleanup interval, never shorter than one second
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Config {
    /// Build a config with defaults everywhere but the mail key.
    pub fn new(mail: MailConfig) -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            mail,
            cors: CorsConfig::default(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RESEND_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar("RESEND_API_KEY"))?;

        let mut mail = MailConfig::with_api_key(api_key);
        if let Some(url) = lookup("RESEND_API_URL") {
            mail.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(from) = lookup("CONTACT_FROM") {
            mail.from = from;
        }
        if let Some(to) = lookup("CONTACT_TO") {
            let recipients: Vec<String> = to
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            if !recipients.is_empty() {
                mail.to = recipients;
            }
        }

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_submissions: parse_var(&lookup, "MAX_SUBMISSIONS")
                .unwrap_or(defaults.max_submissions),
            time_window_ms: parse_var(&lookup, "TIME_WINDOW_MS").unwrap_or(defaults.time_window_ms),
            cleanup_interval_secs: parse_var(&lookup, "CLEANUP_INTERVAL_SECS")
                .unwrap_or(defaults.cleanup_interval_secs),
        };

        let mut cors = CorsConfig::default();
        if let Some(origin) = lookup("CORS_ALLOW_ORIGIN") {
            cors.allow_origin = origin;
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit,
            mail,
            cors,
        })
    }
}

/// Parse a variable, treating unparseable values as absent.
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
