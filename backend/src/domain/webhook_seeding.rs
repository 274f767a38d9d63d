//! Bulk seeding of the capture store with synthetic deliveries.
//!
//! The seeder spreads `count` timestamps over a window ending at the injected
//! clock's "now", generates one fixture per timestamp from a seeded random
//! source, and writes the batch in a single store call.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::debug;
use webhook_fixtures::{FixtureGenerator, GenerationError, WebhookFixture, linear_schedule};

use crate::domain::NewWebhook;
use crate::domain::ports::{WebhookRepository, WebhookRepositoryError};
use crate::domain::webhook_service::{WebhookServiceError, validate_batch};

/// How existing records are removed before the batch lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Clear, then insert. Assumes no concurrent writers.
    #[default]
    ClearThenInsert,
    /// Clear and insert in one transaction.
    AtomicReplace,
}

/// Parameters of one seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    /// Number of records to generate.
    pub count: usize,
    /// Span between the oldest and newest record.
    pub window: TimeDelta,
    /// Seed for the fixture random source.
    pub rng_seed: u64,
    /// Clear strategy.
    pub mode: SeedMode,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Records inserted.
    pub inserted: usize,
    /// Records generated per event type.
    pub by_event_type: BTreeMap<String, usize>,
    /// Oldest generated timestamp.
    pub earliest: Option<DateTime<Utc>>,
    /// Newest generated timestamp.
    pub latest: Option<DateTime<Utc>>,
    /// Seed used, so the run can be reproduced.
    pub rng_seed: u64,
}

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum WebhookSeedingError {
    /// Fixture generation or scheduling failed.
    #[error("fixture generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated record failed domain validation.
    #[error("generated record rejected: {0}")]
    Invalid(WebhookServiceError),
    /// The store failed.
    #[error("webhook store error: {0}")]
    Persistence(#[from] WebhookRepositoryError),
}

/// Orchestrates seeding runs against a capture store.
pub struct WebhookSeeder<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> WebhookSeeder<R> {
    /// Create a seeder over `repository`, reading "now" from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> WebhookSeeder<R>
where
    R: WebhookRepository + ?Sized,
{
    /// Replace the store's contents with `plan.count` synthetic records.
    ///
    /// Generation happens before the store is touched, so a generation
    /// failure leaves existing records in place.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookSeedingError`] if generation, validation, or
    /// persistence fails.
    pub async fn seed(&self, plan: &SeedPlan) -> Result<SeedReport, WebhookSeedingError> {
        let now = self.clock.utc();
        let schedule = linear_schedule(now, plan.count, plan.window)?;
        let fixtures = FixtureGenerator::from_seed(plan.rng_seed).generate_batch(&schedule)?;

        let mut by_event_type = BTreeMap::new();
        for fixture in &fixtures {
            *by_event_type.entry(fixture.event_type.clone()).or_insert(0) += 1;
        }

        let batch = validate_batch(fixtures.into_iter().map(into_new_webhook).collect())
            .map_err(WebhookSeedingError::Invalid)?;

        let ids = match plan.mode {
            SeedMode::ClearThenInsert => {
                let cleared = self.repository.clear().await?;
                debug!(cleared, "capture store cleared before seeding");
                self.repository.insert_many(&batch).await?
            }
            SeedMode::AtomicReplace => self.repository.replace_all(&batch).await?,
        };

        Ok(SeedReport {
            inserted: ids.len(),
            by_event_type,
            earliest: schedule.first().copied(),
            latest: schedule.last().copied(),
            rng_seed: plan.rng_seed,
        })
    }
}

fn into_new_webhook(fixture: WebhookFixture) -> NewWebhook {
    let WebhookFixture {
        method,
        pathname,
        ip,
        status_code,
        content_type,
        content_length,
        query_params,
        headers,
        body,
        created_at,
        ..
    } = fixture;
    NewWebhook {
        method,
        pathname,
        ip,
        status_code,
        content_type,
        content_length,
        query_params,
        headers: Some(headers),
        body: Some(body),
        created_at,
    }
}
