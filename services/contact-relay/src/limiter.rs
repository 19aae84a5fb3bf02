// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window submission limiter.
//!
//! Each client identifier keeps the millisecond timestamps of its accepted
//! submissions. A new submission is admitted only while fewer than
//! `max_submissions` of them fall inside the trailing window. Rejected
//! attempts are not recorded.
//!
//! State is process-local: every instance counts independently and all
//! history is lost on restart.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission admitted and recorded
    Allowed {
        /// Submissions still available in the current window
        remaining: usize,
    },
    /// Submission rejected
    Limited {
        /// Time until the oldest counted submission leaves the window
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Thread-safe per-client submission limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    submissions: Arc<Mutex<HashMap<String, Vec<u64>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            submissions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check and record a submission for `identifier` at the current time.
    pub async fn check_and_record(&self, identifier: &str) -> RateLimitResult {
        self.check_and_record_at(identifier, now_ms()).await
    }

    /// Check and record a submission for `identifier` at `now_ms`.
    ///
    /// The prune, count and append happen under a single lock, so
    /// concurrent submissions from one client cannot over-admit.
    pub async fn check_and_record_at(&self, identifier: &str, now_ms: u64) -> RateLimitResult {
        let window = self.config.time_window_ms;
        let mut submissions = self.submissions.lock().await;
        let times = submissions.entry(identifier.to_string()).or_default();

        times.retain(|&t| now_ms.saturating_sub(t) < window);

        if times.len() >= self.config.max_submissions {
            let oldest = times.first().copied().unwrap_or(now_ms);
            let reopens_at = oldest.saturating_add(window);
            let retry_after = Duration::from_millis(reopens_at.saturating_sub(now_ms));
            debug!(%identifier, ?retry_after, "Submission limit reached");
            return RateLimitResult::Limited { retry_after };
        }

        times.push(now_ms);
        let remaining = self.config.max_submissions - times.len();
        debug!(%identifier, remaining, "Submission recorded");
        RateLimitResult::Allowed { remaining }
    }

    /// Drop clients with no submissions left inside the window.
    pub async fn cleanup(&self) {
        self.cleanup_at(now_ms()).await;
    }

    pub async fn cleanup_at(&self, now_ms: u64) {
        let window = self.config.time_window_ms;
        let mut submissions = self.submissions.lock().await;
        let before = submissions.len();

        submissions.retain(|_, times| {
            times.retain(|&t| now_ms.saturating_sub(t) < window);
            !times.is_empty()
        });

        let evicted = before - submissions.len();
        if evicted > 0 {
            debug!(evicted, tracked = submissions.len(), "Evicted idle clients");
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
