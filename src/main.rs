// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker API Server
//!
//! Serves activity logging, teams, leaderboards and profiles for the
//! OctoFit student fitness app.

use octofit_tracker::{config::Config, db::MemoryDb, seed, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting OctoFit Tracker API");

    let db = MemoryDb::new();
    if config.seed_sample_data {
        seed::load_sample_data(&db, chrono::Utc::now(), config.demo_login_enabled)?;
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    spawn_snapshot_task(state.clone(), config.leaderboard_snapshot_hours);

    // Build router
    let app = octofit_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically record leaderboard ranks so rank changes have a baseline.
fn spawn_snapshot_task(state: Arc<AppState>, hours: u64) {
    if hours == 0 {
        tracing::info!("Leaderboard snapshots disabled");
        return;
    }

    let period = Duration::from_secs(hours * 60 * 60);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately; seeded ranks stand until the first period ends
        interval.tick().await;
        loop {
            interval.tick().await;
            state
                .leaderboard_service
                .roll_snapshot(chrono::Utc::now().date_naive());
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("octofit_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
