//! custdesk CLI - customer records over HTTP
//!
//! - `serve`: run the HTTP API backed by MySQL
//! - `check`: verify the database is reachable and count customers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "custdesk",
    author,
    version,
    about = "Customer records CRUD service backed by MySQL"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Check database connectivity and print the customer count
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables win over it.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })
        .context("Failed to initialize tracing")?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await?,
        Commands::Check(args) => commands::check::run_check(args).await?,
    }

    Ok(())
}
