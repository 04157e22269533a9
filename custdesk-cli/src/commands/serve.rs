//! HTTP server command
//!
//! Composition root: builds the MySQL executor from config and hands it to
//! the router as shared state.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use custdesk_server::http::{run_server, HeaderValue, ServerConfig};
use custdesk_server::MySqlExecutor;
use sqlx::mysql::MySqlConnectOptions;

use crate::config::{DbArgs, DbConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allowed CORS origin (repeatable); all origins when omitted
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Connect on the first request instead of at startup
    #[arg(long)]
    pub lazy_connect: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    fn server_config(&self) -> Result<ServerConfig> {
        let cors_origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ServerConfig {
            bind_addr: self.bind,
            cors_origins,
            request_timeout: Duration::from_secs(self.timeout),
            warm_up: !self.lazy_connect,
        })
    }
}

pub(crate) fn build_executor(db: &DbConfig) -> MySqlExecutor {
    let options: MySqlConnectOptions = db.connect_options();
    MySqlExecutor::with_max_connections(options, db.max_connections)
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config()?;
    let db = DbConfig::from(args.db);
    tracing::info!(?db, "Starting custdesk server on {}", config.bind_addr);

    let executor = Arc::new(build_executor(&db));

    // Run server (blocks until shutdown)
    run_server(executor, config).await.context("Server error")?;

    Ok(())
}
