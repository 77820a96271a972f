// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout-Kit API Server
//!
//! Serves workout routes, plans and effort scores from the health store.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_kit::{
    config::Config,
    db::{HealthStore, InMemoryHealthStore},
    services::CapabilityGate,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        platform = %config.platform_version,
        "Starting Workout-Kit API"
    );

    // Initialize the health store
    let store = InMemoryHealthStore::new(config.platform_version)
        .with_location_batch_size(config.location_batch_size);

    if let Some(path) = config.fixture_path.as_deref() {
        tracing::info!(path, "Loading workout fixture");
        store
            .load_fixture_file(path)
            .expect("Failed to load workout fixture");
    }

    let gate = CapabilityGate::new(store.platform_version());
    for status in gate.capabilities() {
        tracing::info!(
            operation = %status.operation,
            supported = status.supported,
            "Capability"
        );
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), Arc::new(store), gate));

    // Build router
    let app = workout_kit::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("workout_kit=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
