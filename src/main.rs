use color_eyre::Result;
use iss_tracker::{api::IssClient, config::Config, logging, server};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Config first so logging knows where to write
    let config = Config::load();
    let _log_guard = logging::initialize_logging(&config.logging, config.debug_mode);

    info!("Loaded configuration for profile '{}'.", config.profile);

    let client = IssClient::new(&config.upstream)?;
    info!("Proxying ISS position from {}", client.api_url());
    if config.debug_mode {
        info!("Debug mode enabled, error responses include details.");
    }

    let app = server::router(server::AppState::new(client, config.debug_mode));
    let listener = TcpListener::bind(config.server.bind_address.as_str()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown requested.");
}
