//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API, short-link redirects and OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::AppSettings;
use foodgram::inbound::http::health::HealthState;
use foodgram::inbound::http::session_key::load_session_key;
use foodgram::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|e| eyre!("failed to load settings: {e}"))?;
    let key = load_session_key(
        &settings.session_key_file(),
        cfg!(debug_assertions) || settings.session_allow_ephemeral,
    )?;

    run_pending_migrations(&settings.database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(
        PoolConfig::new(settings.database_url.clone())
            .with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to open database pool")?;

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        bind_addr,
        pool,
        settings.media_root(),
    )
    .with_presentation(settings.presentation())
    .with_recipe_limits(settings.recipe_limits())
    .with_short_links(settings.hash_length()?, settings.short_link_attempts());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            health_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });
    info!(%bind_addr, "foodgram listening");
    server.await?;
    Ok(())
}
