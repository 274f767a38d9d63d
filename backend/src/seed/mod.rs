//! Command-line seeding of the capture store with synthetic deliveries.

mod config;
mod job;

pub use config::{DATABASE_URL_ENV, SeedSettings};
pub use job::{SeedJobError, plan_from, run_seed_job, seed_repository};
