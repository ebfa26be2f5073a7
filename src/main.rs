use anyhow::Result;
use clap::Parser;
use tracing::info;

use ladder_league::api::{self, AppState};
use ladder_league::config::Config;
use ladder_league::db::Database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);
    info!("{} user(s) registered", db.count_users()?);

    let app = api::router(AppState { db }, config.cors_permissive);
    let addr = config.socket_addr()?;
    info!("Ladder league API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
