//! Userbase entry-point: loads settings, prepares the user store and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use userbase::inbound::http::health::HealthState;
use userbase::outbound::persistence::{DbPool, run_migrations};
use userbase::settings::ServerSettings;

/// Apply embedded migrations on a blocking thread.
async fn migrate(database_url: String) -> Result<()> {
    tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("apply database migrations")?;
    Ok(())
}

async fn build_config(settings: &ServerSettings) -> Result<ServerConfig> {
    let config = ServerConfig::new(settings.bind_addr());
    let Some(pool_config) = settings.pool_config() else {
        return Ok(config);
    };

    if settings.skip_migrations {
        warn!("skipping database migrations");
    } else {
        migrate(pool_config.database_url().to_owned()).await?;
    }
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("create database pool")?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("load server settings: {err}"))?;
    let config = build_config(&settings).await?;
    let (host, port) = config.bind_addr();
    info!(host, port, "starting HTTP server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("bind HTTP server")?;
    let result = server.await.wrap_err("run HTTP server");
    health_state.mark_unhealthy();
    result
}
