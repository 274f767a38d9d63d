//! Keyset boundary for walking webhooks newest-first.
//!
//! The canonical order is `(created_at DESC, id DESC)`. A boundary names the
//! last record a client has seen; the next page holds records strictly after
//! it in that order. Tokens carry `{"createdAt": <epoch ms>, "id": <id>}`
//! wrapped by [`pagination::Cursor`].

use chrono::{DateTime, Utc};
use pagination::{Cursor, CursorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Webhook, WebhookId};

/// Errors raised when a cursor token cannot be turned into a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookCursorError {
    /// The token failed to decode.
    #[error(transparent)]
    Token(#[from] CursorError),
    /// The timestamp lies outside years 1 to 9999.
    #[error("cursor timestamp {millis} is out of range")]
    TimestampOutOfRange {
        /// Rejected epoch milliseconds.
        millis: i64,
    },
    /// The identifier is not positive.
    #[error("cursor id {id} is not a valid webhook id")]
    InvalidId {
        /// Rejected identifier.
        id: i64,
    },
}

/// Earliest boundary accepted: `0001-01-01T00:00:00.000Z`.
const MIN_BOUNDARY_MILLIS: i64 = -62_135_596_800_000;

/// Latest boundary accepted: `9999-12-31T23:59:59.999Z`.
const MAX_BOUNDARY_MILLIS: i64 = 253_402_300_799_999;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BoundaryKey {
    created_at: i64,
    id: i64,
}

/// Position of the last record on a page.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use webhook_inspector::domain::{WebhookBoundary, WebhookId};
///
/// let at = Utc.timestamp_millis_opt(1_704_067_200_123).single().expect("timestamp");
/// let boundary = WebhookBoundary::new(at, WebhookId::new(9).expect("id"));
/// let token = boundary.encode().expect("encode");
/// assert_eq!(WebhookBoundary::decode(&token), Ok(boundary));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WebhookBoundary {
    /// Capture timestamp of the boundary record.
    pub created_at: DateTime<Utc>,
    /// Identifier of the boundary record.
    pub id: WebhookId,
}

impl WebhookBoundary {
    /// Build a boundary from its parts.
    #[must_use]
    pub const fn new(created_at: DateTime<Utc>, id: WebhookId) -> Self {
        Self { created_at, id }
    }

    /// Boundary positioned at `webhook`.
    #[must_use]
    pub const fn of(webhook: &Webhook) -> Self {
        Self::new(webhook.created_at, webhook.id)
    }

    /// Whether `webhook` sorts strictly after this boundary in list order.
    #[must_use]
    pub fn precedes(&self, webhook: &Webhook) -> bool {
        (webhook.created_at, webhook.id) < (self.created_at, self.id)
    }

    /// Encode as an opaque URL-safe token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] if the key cannot be rendered.
    pub fn encode(&self) -> Result<String, CursorError> {
        Cursor::new(BoundaryKey {
            created_at: self.created_at.timestamp_millis(),
            id: self.id.get(),
        })
        .encode()
    }

    /// Decode a token produced by [`WebhookBoundary::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`WebhookCursorError`] when the token is malformed, the
    /// timestamp falls outside years 1 to 9999, or the id is not positive.
    /// Every store can bind timestamps in that range.
    pub fn decode(token: &str) -> Result<Self, WebhookCursorError> {
        let BoundaryKey { created_at, id } = Cursor::<BoundaryKey>::decode(token)?.into_key();
        let at = Some(created_at)
            .filter(|millis| (MIN_BOUNDARY_MILLIS..=MAX_BOUNDARY_MILLIS).contains(millis))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or(WebhookCursorError::TimestampOutOfRange { millis: created_at })?;
        let webhook_id = WebhookId::new(id).map_err(|_| WebhookCursorError::InvalidId { id })?;
        Ok(Self::new(at, webhook_id))
    }
}
