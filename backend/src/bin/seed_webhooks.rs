//! Replace the capture store's contents with synthetic webhook deliveries.
//!
//! Settings come from `--count`, `--days-range`, `--rng-seed`,
//! `--atomic-replace` and `--database-url`, or the matching
//! `WEBHOOK_SEED_*` environment variables. `DATABASE_URL` is used when no
//! seed-specific URL is set.

use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};
use webhook_inspector::seed::{SeedSettings, run_seed_job};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SeedSettings::load_from_iter(std::env::args_os())
        .context("failed to load seed settings")?;
    run_seed_job(&settings)
        .await
        .inspect_err(|err| error!(error = %err, "seed job failed"))?;
    Ok(())
}
