//! Server entry-point: loads settings, prepares the store, and serves the
//! capture, REST, health, and OpenAPI endpoints.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use webhook_inspector::inbound::http::health::HealthState;
use webhook_inspector::outbound::persistence::{DbPool, PoolConfig, run_migrations};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load server settings")?;
    let page_size = settings
        .page_size()
        .wrap_err("invalid WEBHOOK_INSPECTOR_PAGE_SIZE")?;

    let mut config = ServerConfig::new(settings.bind_addr())
        .with_page_size(page_size)
        .with_max_body_bytes(settings.max_body_bytes());

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            run_migrations(database_url)
                .await
                .wrap_err("failed to apply migrations")?;
        } else {
            info!("skipping migrations");
        }
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to build connection pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
