//! Synthetic payment provider webhook fixtures.
//!
//! This crate fabricates webhook deliveries that look like the ones a payments
//! provider sends: an event envelope wrapping a `data.object` whose shape is
//! fixed per event family, with randomised amounts, names, and identifiers.
//! It is independent of the backend's domain types so the backend can depend
//! on it for seeding without a cycle.
//!
//! # Overview
//!
//! - [`EventType`] enumerates the known event names; [`EventFamily`]
//!   classifies any event name into one of the payload variants.
//! - [`FixtureGenerator`] owns an injected random source and builds
//!   [`WebhookFixture`] records. Seeding the source fixes the output.
//! - [`linear_schedule`] spreads timestamps evenly across a window for bulk
//!   seeding.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use webhook_fixtures::FixtureGenerator;
//!
//! let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
//! let mut generator = FixtureGenerator::from_seed(42);
//! let fixture = generator.generate(created_at).expect("fixture generated");
//!
//! assert_eq!(fixture.method, "POST");
//! assert_eq!(fixture.content_length, Some(fixture.body.len() as u64));
//! ```

mod error;
mod generator;
mod payload;
mod random;
mod schedule;
mod taxonomy;

pub use error::GenerationError;
pub use generator::{
    API_VERSION, EventData, EventEnvelope, EventRequest, FixtureGenerator, JSON_CONTENT_TYPE,
    PROVIDER_USER_AGENT, WEBHOOK_PATHNAME, WebhookFixture,
};
pub use payload::{
    Address, ChargeObject, ChargeStatus, CheckoutSessionObject, Currency, CustomerMetadata,
    CustomerObject, EventObject, InvoiceObject, InvoiceStatus, ObjectBase, PaymentIntentMetadata,
    PaymentIntentObject, PaymentIntentStatus, Plan, PlanInterval, Price, SubscriptionItem,
    SubscriptionItems, SubscriptionObject, SubscriptionStatus, build_event_object,
};
pub use schedule::linear_schedule;
pub use taxonomy::{EventFamily, EventType};
