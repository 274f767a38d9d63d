//! Captured webhook deliveries.
//!
//! A [`Webhook`] is immutable once stored. Callers build a [`NewWebhook`],
//! which carries every field except the identifier; the store assigns ids in
//! insertion order.
//!
//! ## Invariants
//! - [`WebhookId`] values are strictly positive.
//! - `created_at` has millisecond precision once validated.
//! - `content_length`, when present alongside `body`, equals the body's byte
//!   length.
//! - Header names are lowercase.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Validation failures for webhook identifiers and records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookValidationError {
    /// The identifier is not a decimal integer.
    #[error("webhook id `{raw}` is not an integer")]
    InvalidId {
        /// Rejected input.
        raw: String,
    },
    /// The identifier is zero or negative.
    #[error("webhook id must be positive, got {value}")]
    NonPositiveId {
        /// Rejected value.
        value: i64,
    },
    /// The method is empty.
    #[error("method must not be empty")]
    EmptyMethod,
    /// The method contains characters outside the HTTP token set.
    #[error("method `{method}` is not a valid HTTP token")]
    InvalidMethod {
        /// Rejected method.
        method: String,
    },
    /// The path does not start with `/`.
    #[error("pathname `{pathname}` must start with '/'")]
    InvalidPathname {
        /// Rejected path.
        pathname: String,
    },
    /// The status code is outside 100–599.
    #[error("status code {status_code} is outside 100..=599")]
    StatusCodeOutOfRange {
        /// Rejected status.
        status_code: u16,
    },
    /// The declared length disagrees with the body.
    #[error("content length {declared} does not match body length {actual}")]
    ContentLengthMismatch {
        /// Declared length.
        declared: u64,
        /// Actual body length in bytes.
        actual: u64,
    },
    /// A header name contains uppercase characters.
    #[error("header name `{name}` must be lowercase")]
    HeaderNameNotLowercase {
        /// Rejected header name.
        name: String,
    },
}

/// Store-assigned webhook identifier.
///
/// Serialised as a decimal string so clients never lose precision.
///
/// # Examples
/// ```
/// use webhook_inspector::domain::WebhookId;
///
/// let id: WebhookId = "42".parse().expect("valid id");
/// assert_eq!(id.get(), 42);
/// assert!("0".parse::<WebhookId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WebhookId(i64);

impl WebhookId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookValidationError::NonPositiveId`] for values below 1.
    pub const fn new(value: i64) -> Result<Self, WebhookValidationError> {
        if value < 1 {
            return Err(WebhookValidationError::NonPositiveId { value });
        }
        Ok(Self(value))
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WebhookId {
    type Err = WebhookValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| WebhookValidationError::InvalidId { raw: s.to_owned() })?;
        Self::new(value)
    }
}

impl Serialize for WebhookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WebhookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A delivery awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebhook {
    /// HTTP method, e.g. `POST`.
    pub method: String,
    /// Request path, always `/`-prefixed.
    pub pathname: String,
    /// Source address.
    pub ip: String,
    /// Recorded response status.
    pub status_code: u16,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// Byte length of the body.
    pub content_length: Option<u64>,
    /// Query parameters, order irrelevant.
    pub query_params: Option<BTreeMap<String, String>>,
    /// Lowercased request headers.
    pub headers: Option<BTreeMap<String, String>>,
    /// Raw payload text, never parsed by the store.
    pub body: Option<String>,
    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewWebhook {
    /// Check the record's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`WebhookValidationError`] found.
    pub fn validate(&self) -> Result<(), WebhookValidationError> {
        validate_method(&self.method)?;
        if !self.pathname.starts_with('/') {
            return Err(WebhookValidationError::InvalidPathname {
                pathname: self.pathname.clone(),
            });
        }
        if !(100..=599).contains(&self.status_code) {
            return Err(WebhookValidationError::StatusCodeOutOfRange {
                status_code: self.status_code,
            });
        }
        if let (Some(declared), Some(body)) = (self.content_length, self.body.as_deref()) {
            let actual = u64::try_from(body.len()).unwrap_or(u64::MAX);
            if declared != actual {
                return Err(WebhookValidationError::ContentLengthMismatch { declared, actual });
            }
        }
        if let Some(name) = self
            .headers
            .iter()
            .flat_map(BTreeMap::keys)
            .find(|name| name.chars().any(char::is_uppercase))
        {
            return Err(WebhookValidationError::HeaderNameNotLowercase { name: name.clone() });
        }
        Ok(())
    }

    /// Validate the record and truncate `created_at` to milliseconds.
    ///
    /// # Errors
    ///
    /// Returns the first [`WebhookValidationError`] found.
    pub fn into_validated(mut self) -> Result<Self, WebhookValidationError> {
        self.validate()?;
        self.created_at = self.created_at.trunc_subsecs(3);
        Ok(self)
    }

    /// Attach a store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: WebhookId) -> Webhook {
        let Self {
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
        } = self;
        Webhook {
            id,
            method,
            pathname,
            ip,
            status_code,
            content_type,
            content_length,
            query_params,
            headers,
            body,
            created_at: created_at.trunc_subsecs(3),
        }
    }
}

/// A stored delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    /// Store-assigned identifier.
    pub id: WebhookId,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub pathname: String,
    /// Source address.
    pub ip: String,
    /// Recorded response status.
    pub status_code: u16,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// Byte length of the body.
    pub content_length: Option<u64>,
    /// Query parameters.
    pub query_params: Option<BTreeMap<String, String>>,
    /// Lowercased request headers.
    pub headers: Option<BTreeMap<String, String>>,
    /// Raw payload text.
    pub body: Option<String>,
    /// Capture timestamp, millisecond precision.
    pub created_at: DateTime<Utc>,
}

fn validate_method(method: &str) -> Result<(), WebhookValidationError> {
    if method.is_empty() {
        return Err(WebhookValidationError::EmptyMethod);
    }
    if !method.bytes().all(is_token_byte) {
        return Err(WebhookValidationError::InvalidMethod {
            method: method.to_owned(),
        });
    }
    Ok(())
}

const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
