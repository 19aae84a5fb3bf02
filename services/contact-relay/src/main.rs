// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Accepts contact form submissions from the portfolio site and forwards
//! them to the site owner by email.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! read first when present):
//!
//! - `RESEND_API_KEY`: Email provider API key (required)
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_FROM` / `CONTACT_TO`: Sender identity and recipients
//! - `MAX_SUBMISSIONS`: Submissions per client per window (default: 3)
//! - `TIME_WINDOW_MS`: Window length in milliseconds (default: 3600000)
//! - `CORS_ALLOW_ORIGIN`: Allowed origin (default: *)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::{
    build_router,
    config::Config,
    handlers::AppState,
    limiter::RateLimiter,
    mailer::ResendMailer,
    validator::ContactValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        time_window_ms = config.rate_limit.time_window_ms,
        recipients = ?config.mail.to,
        "Starting contact relay"
    );

    let mailer = Arc::new(ResendMailer::new(&config.mail));
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        validator: ContactValidator::new(),
        mailer,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_every = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
        }
    });

    let app = build_router(state)?;

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
