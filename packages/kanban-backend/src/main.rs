use std::path::PathBuf;

use kanban_backend::config::{default_config_path, load_config};
use kanban_backend::server::spawn_server;
use kanban_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let config = load_config(&config_path);

    let stores = kanban_backend::open_storage(&config)?;
    let state = AppState::new(stores, config.port, &config.bind_address);
    let (port, server) = spawn_server(state).await?;
    log::info!("Server started on port {}", port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => log::info!("Shutting down"),
        _ = server => log::warn!("HTTP server stopped"),
    }
    Ok(())
}
