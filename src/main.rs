// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::{load_app_config, load_widgets_config};
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let app_config = load_app_config()?;
    let widgets_config = load_widgets_config()?;

    // Initialize tracing; RUST_LOG wins over the debug flag
    let default_level = if app_config.server.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if !app_config.server.debug && app_config.server.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; using the development default");
    }

    // Build widgets and pages; wiring mistakes stop the process here
    let dashboard_service = DashboardService::from_config(&app_config, &widgets_config)?;
    tracing::info!(
        "Registered {} widgets across {} pages",
        dashboard_service.widgets().len(),
        dashboard_service.pages().count()
    );

    let addr = app_config.server.socket_addr()?;
    let state = Arc::new(AppState {
        dashboard_service,
        settings: app_config.server,
    });
    let router = build_router(state);

    tracing::info!("Starting wellness-dashboard on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
