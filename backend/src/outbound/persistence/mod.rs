//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs (`models.rs`) and the table definition (`schema.rs`) stay
//! private to this module; callers only see domain types and
//! [`WebhookRepositoryError`](crate::domain::ports::WebhookRepositoryError).
//!
//! # Example
//!
//! ```ignore
//! use webhook_inspector::outbound::persistence::{DbPool, DieselWebhookRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/webhooks")).await?;
//! let repo = DieselWebhookRepository::new(pool);
//! ```

mod diesel_webhook_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_webhook_repository::DieselWebhookRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
