//! Seed job orchestration: resolve settings into a plan, prepare the
//! database, and run the seeder.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::{info, warn};

use super::SeedSettings;
use crate::domain::ports::WebhookRepository;
use crate::domain::{SeedMode, SeedPlan, SeedReport, WebhookSeeder, WebhookSeedingError};
use crate::outbound::persistence::{
    DbPool, DieselWebhookRepository, PoolConfig, PoolError, run_migrations,
};

/// Errors raised by the seed job.
#[derive(Debug, Error)]
pub enum SeedJobError {
    /// Neither `WEBHOOK_SEED_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("no database URL configured; set WEBHOOK_SEED_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// The configured window cannot be represented.
    #[error("days range {days} is out of range")]
    InvalidWindow { days: u32 },
    /// Migrations or pool construction failed.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The seeding run failed.
    #[error(transparent)]
    Seeding(#[from] WebhookSeedingError),
}

/// Resolve settings into a concrete plan.
///
/// When no seed is configured one is drawn from entropy and logged so the
/// run can be reproduced.
///
/// # Errors
///
/// Returns [`SeedJobError::InvalidWindow`] if the day range overflows.
pub fn plan_from(settings: &SeedSettings) -> Result<SeedPlan, SeedJobError> {
    let days = settings.days_range();
    let window = TimeDelta::try_days(i64::from(days))
        .ok_or(SeedJobError::InvalidWindow { days })?;
    let rng_seed = settings.rng_seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        info!(rng_seed = seed, "no seed configured; drew one from entropy");
        seed
    });
    let mode = if settings.atomic_replace {
        SeedMode::AtomicReplace
    } else {
        SeedMode::ClearThenInsert
    };
    Ok(SeedPlan {
        count: settings.count(),
        window,
        rng_seed,
        mode,
    })
}

/// Seed `repository` according to `plan` and log the outcome.
///
/// # Errors
///
/// Propagates [`WebhookSeedingError`] from the seeder.
pub async fn seed_repository<R>(
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    plan: &SeedPlan,
) -> Result<SeedReport, WebhookSeedingError>
where
    R: WebhookRepository + ?Sized,
{
    info!(
        count = plan.count,
        window_days = plan.window.num_days(),
        rng_seed = plan.rng_seed,
        mode = ?plan.mode,
        "seeding webhooks"
    );
    let report = WebhookSeeder::new(repository, clock).seed(plan).await?;
    for (event_type, count) in &report.by_event_type {
        info!(event_type = %event_type, count, "seeded event type");
    }
    info!(
        inserted = report.inserted,
        earliest = ?report.earliest,
        latest = ?report.latest,
        rng_seed = report.rng_seed,
        "webhook seeding complete"
    );
    Ok(report)
}

/// Run the seed job against the configured database.
///
/// # Errors
///
/// Returns [`SeedJobError`] when configuration is incomplete or any step
/// fails.
pub async fn run_seed_job(settings: &SeedSettings) -> Result<SeedReport, SeedJobError> {
    let Some(database_url) = settings.database_url() else {
        warn!("seed job requires a database URL");
        return Err(SeedJobError::MissingDatabaseUrl);
    };
    let plan = plan_from(settings)?;

    run_migrations(&database_url).await?;
    let pool = DbPool::new(PoolConfig::new(&database_url)).await?;
    let repository = DieselWebhookRepository::new(pool);

    Ok(seed_repository(Arc::new(repository), Arc::new(DefaultClock), &plan).await?)
}
