//! Domain primitives, services, and ports.
//!
//! Purpose: define the captured-webhook model and the use-cases over it
//! without reference to HTTP or SQL. Adapters in `inbound` and `outbound`
//! depend on this module; never the reverse.
//!
//! Public surface:
//! - [`Webhook`], [`NewWebhook`], [`WebhookId`]: the delivery record.
//! - [`WebhookBoundary`]: keyset position encoded into page cursors.
//! - [`WebhookService`]: listing, lookup, capture, and handler generation.
//! - [`WebhookSeeder`]: bulk seeding from synthetic fixtures.
//! - [`Error`], [`ErrorCode`], [`TraceId`]: transport-agnostic failures.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod webhook;
pub mod webhook_cursor;
pub mod webhook_seeding;
pub mod webhook_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::webhook::{NewWebhook, Webhook, WebhookId, WebhookValidationError};
pub use self::webhook_cursor::{WebhookBoundary, WebhookCursorError};
pub use self::webhook_seeding::{
    SeedMode, SeedPlan, SeedReport, WebhookSeeder, WebhookSeedingError,
};
pub use self::webhook_service::{WebhookService, WebhookServiceError};
