//! # Authflow CLI
//!
//! Terminal front end for the auth flow controller.

mod config;
mod console;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;
    tracing::info!(
        base_url = %config.api.base_url,
        storage = ?config.storage,
        "Starting authflow console"
    );

    let state = AppState::new(&config).await?;
    console::run(state).await
}
