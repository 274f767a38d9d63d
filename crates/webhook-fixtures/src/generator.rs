//! Fixture generation over an injected random source.
//!
//! [`FixtureGenerator`] draws an event type, builds the family-specific
//! payload, wraps it in the provider's event envelope, and renders the
//! delivery record around it. Given the same seed and timestamps the output
//! is identical byte for byte.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::GenerationError;
use crate::payload::{EventObject, build_event_object};
use crate::random::{domain_name, hex_digest, ipv4, prefixed_id, uuid_v4};
use crate::taxonomy::EventType;

/// API version stamped on every envelope.
pub const API_VERSION: &str = "2023-10-16";

/// Path fixtures claim to have been delivered to.
pub const WEBHOOK_PATHNAME: &str = "/webhooks/stripe";

/// Content type of fixture bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// User agent the provider sends with deliveries.
pub const PROVIDER_USER_AGENT: &str = "Stripe/1.0 (+https://stripe.com/docs/webhooks)";

/// Idempotency details of the API request that caused the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    /// Request identifier, `req_` prefixed.
    pub id: String,
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
}

/// Wrapper around the event's object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventData {
    /// Family-specific payload.
    pub object: EventObject,
}

/// The provider's event envelope, serialised as the delivery body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventEnvelope {
    /// Event identifier, `evt_` prefixed.
    pub id: String,
    /// Always `event`.
    pub object: &'static str,
    /// API version of the payload schema.
    pub api_version: &'static str,
    /// Unix seconds of the delivery timestamp.
    pub created: i64,
    /// Event name, e.g. `charge.succeeded`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    pub data: EventData,
    /// Whether the event came from live mode.
    pub livemode: bool,
    /// Deliveries still pending for this event.
    pub pending_webhooks: u8,
    /// Originating request.
    pub request: EventRequest,
}

/// One synthetic webhook delivery, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookFixture {
    /// Event name carried in the body.
    pub event_type: String,
    /// HTTP method, always `POST`.
    pub method: String,
    /// Request path.
    pub pathname: String,
    /// Source address.
    pub ip: String,
    /// Recorded response status.
    pub status_code: u16,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// Byte length of `body`.
    pub content_length: Option<u64>,
    /// Query parameters; fixtures carry none.
    pub query_params: Option<BTreeMap<String, String>>,
    /// Lowercased request headers.
    pub headers: BTreeMap<String, String>,
    /// Pretty-printed JSON envelope.
    pub body: String,
    /// Delivery timestamp.
    pub created_at: DateTime<Utc>,
}

/// Builds webhook fixtures from an injected random source.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use webhook_fixtures::{EventFamily, FixtureGenerator};
///
/// let mut generator = FixtureGenerator::from_seed(7);
/// let fixture = generator
///     .generate_for("customer.subscription.updated", Utc::now())
///     .expect("fixture");
/// assert_eq!(EventFamily::classify(&fixture.event_type), EventFamily::Subscription);
/// ```
#[derive(Debug, Clone)]
pub struct FixtureGenerator<R> {
    rng: R,
}

impl FixtureGenerator<ChaCha8Rng> {
    /// Generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> FixtureGenerator<R> {
    /// Wrap an existing random source.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a fixture with a uniformly drawn event type.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Serialization`] if the envelope cannot be
    /// rendered as JSON.
    pub fn generate(&mut self, created_at: DateTime<Utc>) -> Result<WebhookFixture, GenerationError> {
        let event_type: EventType = self.rng.random();
        self.generate_for(event_type.as_str(), created_at)
    }

    /// Generate one fixture per timestamp, in the order given.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerationError`] encountered.
    pub fn generate_batch(
        &mut self,
        timestamps: &[DateTime<Utc>],
    ) -> Result<Vec<WebhookFixture>, GenerationError> {
        timestamps
            .iter()
            .map(|created_at| self.generate(*created_at))
            .collect()
    }

    /// Generate a fixture for a specific event name.
    ///
    /// Unknown names are accepted and produce a base-keys-only payload.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Serialization`] if the envelope cannot be
    /// rendered as JSON.
    pub fn generate_for(
        &mut self,
        event_type: &str,
        created_at: DateTime<Utc>,
    ) -> Result<WebhookFixture, GenerationError> {
        let envelope = self.envelope(event_type, created_at);
        let body = serde_json::to_string_pretty(&envelope)?;
        let content_length = u64::try_from(body.len()).ok();

        let headers = BTreeMap::from([
            ("content-type".to_owned(), JSON_CONTENT_TYPE.to_owned()),
            (
                "stripe-signature".to_owned(),
                format!(
                    "t={},v1={}",
                    created_at.timestamp_millis(),
                    hex_digest(&mut self.rng)
                ),
            ),
            ("user-agent".to_owned(), PROVIDER_USER_AGENT.to_owned()),
            ("accept".to_owned(), "*/*".to_owned()),
            ("host".to_owned(), domain_name(&mut self.rng)),
        ]);

        Ok(WebhookFixture {
            event_type: envelope.event_type,
            method: "POST".to_owned(),
            pathname: WEBHOOK_PATHNAME.to_owned(),
            ip: ipv4(&mut self.rng),
            status_code: 200,
            content_type: Some(JSON_CONTENT_TYPE.to_owned()),
            content_length,
            query_params: None,
            headers,
            body,
            created_at,
        })
    }

    /// Build the event envelope without rendering a delivery record.
    pub fn envelope(&mut self, event_type: &str, created_at: DateTime<Utc>) -> EventEnvelope {
        let object = build_event_object(&mut self.rng, event_type, created_at);
        EventEnvelope {
            id: prefixed_id(&mut self.rng, "evt_"),
            object: "event",
            api_version: API_VERSION,
            created: created_at.timestamp(),
            event_type: event_type.to_owned(),
            data: EventData { object },
            livemode: self.rng.random(),
            pending_webhooks: self.rng.random_range(0..=3),
            request: EventRequest {
                id: prefixed_id(&mut self.rng, "req_"),
                idempotency_key: uuid_v4(&mut self.rng).to_string(),
            },
        }
    }
}
