//! Apply the embedded user schema migrations to a PostgreSQL database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use userbase::outbound::persistence::run_migrations;

const DATABASE_URL_ENV: &str = "USERBASE_DATABASE_URL";

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrate",
    about = "Apply pending user schema migrations",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `USERBASE_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| env::var(DATABASE_URL_ENV).ok())
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| eyre!("pass --database-url or set {DATABASE_URL_ENV}"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let database_url = resolve_database_url(args.database_url)?;
    let applied = run_migrations(&database_url).wrap_err("apply database migrations")?;
    if applied.is_empty() {
        info!("database schema already up to date");
    }
    for name in &applied {
        info!(migration = %name, "applied migration");
    }
    Ok(())
}
