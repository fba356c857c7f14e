//! Dashboard entry-point: loads settings, prepares the ledger and serves the
//! JSON API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dashboard::inbound::http::health::HealthState;
use dashboard::inbound::http::session_config::{BuildMode, session_settings};
use dashboard::outbound::persistence::{DbPool, run_pending_migrations};
use dashboard::settings::{AppSettings, ResolvedSettings};
use server::{ServerConfig, build_http_state, create_server};

/// Load CLI, environment and file layers, then validate them.
fn load_settings<I>(args: I) -> color_eyre::Result<ResolvedSettings>
where
    I: IntoIterator<Item = OsString>,
{
    let settings = AppSettings::load_from_iter(args)
        .map_err(|error| eyre!("failed to load configuration: {error}"))?
        .validate()?;
    Ok(settings)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    info!(settings = ?settings, "configuration loaded");

    run_pending_migrations(&settings.database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(settings.pool.clone())
        .await
        .wrap_err("failed to create database pool")?;

    let session = session_settings(
        settings.secret_key.as_ref(),
        settings.cookie_secure,
        BuildMode::from_debug_assertions(),
    )?;
    let http_state = build_http_state(&settings, pool)?;
    let config = ServerConfig::new(session, settings.bind_addr);
    info!(addr = %config.bind_addr(), "starting HTTP server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    server.await?;
    Ok(())
}
