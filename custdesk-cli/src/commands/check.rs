//! Connectivity check: count customers through the same executor the server uses

use anyhow::{Context, Result};
use clap::Parser;
use custdesk_server::db::CustomerRepo;

use super::serve::build_executor;
use crate::config::{DbArgs, DbConfig};

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let db = DbConfig::from(args.db);
    tracing::debug!(?db, "Checking database connectivity");

    let executor = build_executor(&db);
    let count = CustomerRepo::new(&executor)
        .count()
        .await
        .with_context(|| format!("Failed to query {}@{}:{}/{}", db.user, db.host, db.port, db.database))?;

    println!("ok: {} customers in {}", count, db.database);
    Ok(())
}
