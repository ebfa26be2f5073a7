use clap::{ArgAction, Parser};
use std::net::SocketAddr;

/// Ladder league API server
#[derive(Parser, Debug, Clone)]
#[command(name = "ladder-league", version, about)]
pub struct Config {
    /// Address the API listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "ladder_league.db")]
    pub database_path: String,

    /// Allow cross-origin requests from any site (the web client is served separately)
    #[arg(
        long,
        env = "CORS_PERMISSIVE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub cors_permissive: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_path.trim().is_empty() {
            anyhow::bail!("database_path must not be empty");
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen_addr '{}': {}", self.listen_addr, e))
    }
}
