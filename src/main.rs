//! HTTP server for the payroll engine.
//!
//! Reads `PAYROLL_CONFIG_DIR` (default `config/mauritius`) and
//! `PAYROLL_ADDR` (default `0.0.0.0:3000`), optionally from a `.env` file.

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "config/mauritius";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payroll_engine=info,tower_http=info".into()),
        )
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = std::env::var("PAYROLL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir).map_err(|e| {
        tracing::error!(config_dir = %config_dir, "Failed to load rate tables: {e}");
        e
    })?;

    let app = create_router(AppState::in_memory(config)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Payroll engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
