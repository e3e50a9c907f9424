//! DriveHub Server: per-user cloud drive backend.
//!
//! Main entry point that loads configuration, sets up logging and starts
//! the HTTP server.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use drivehub_core::config::{AppConfig, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("DRIVEHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&env)
        .with_context(|| format!("Failed to load configuration for environment '{env}'"))?;

    init_logging(&config.logging);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %env,
        "Configuration loaded"
    );

    drivehub_api::run_server(config)
        .await
        .context("DriveHub server exited with an error")
}

/// Initialize tracing/logging. `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
