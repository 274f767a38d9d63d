//! Opaque cursor encoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Longest token accepted by [`Cursor::decode`].
///
/// Boundary keys are small; anything larger is rejected before decoding.
pub const MAX_TOKEN_LEN: usize = 512;

/// Errors raised while encoding or decoding a cursor token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token was empty.
    #[error("cursor token is empty")]
    Empty,

    /// The token exceeds [`MAX_TOKEN_LEN`].
    #[error("cursor token is {length} bytes, exceeding the {max} byte limit")]
    TooLong {
        /// Length of the rejected token.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The token is not valid URL-safe base64.
    #[error("cursor token is not valid base64: {message}")]
    InvalidEncoding {
        /// Decoder diagnostic.
        message: String,
    },

    /// The decoded bytes do not describe a boundary key.
    #[error("cursor token payload is malformed: {message}")]
    InvalidPayload {
        /// Deserialiser diagnostic.
        message: String,
    },

    /// The boundary key could not be serialised.
    #[error("cursor key could not be serialised: {message}")]
    Serialize {
        /// Serialiser diagnostic.
        message: String,
    },
}

/// A pagination boundary wrapped for transport.
///
/// The key is whatever the caller orders by; the cursor only guarantees that
/// `decode(encode(key)) == key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a boundary key.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the boundary key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return its boundary key.
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the key as an opaque, URL-safe token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] when the key cannot be represented
    /// as JSON.
    pub fn encode(&self) -> Result<String, CursorError> {
        let payload = serde_json::to_vec(&self.key).map_err(|err| CursorError::Serialize {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns a [`CursorError`] when the token is empty, oversized, not
    /// base64, or does not deserialise into `K`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        if token.is_empty() {
            return Err(CursorError::Empty);
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(CursorError::TooLong {
                length: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }

        let payload =
            URL_SAFE_NO_PAD
                .decode(token)
                .map_err(|err| CursorError::InvalidEncoding {
                    message: err.to_string(),
                })?;
        let key = serde_json::from_slice(&payload).map_err(|err| CursorError::InvalidPayload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Boundary {
        at: i64,
        id: i64,
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1_704_067_200_000, 42)]
    #[case(-62_135_596_800_000, i64::MAX)]
    fn round_trips_boundary_keys(#[case] at: i64, #[case] id: i64) {
        let token = Cursor::new(Boundary { at, id })
            .encode()
            .expect("encodes");
        let decoded = Cursor::<Boundary>::decode(&token).expect("decodes");

        assert_eq!(decoded.key(), &Boundary { at, id });
    }

    #[test]
    fn token_is_url_safe_and_unpadded() {
        let token = Cursor::new(Boundary {
            at: 1_704_067_200_123,
            id: 9_999,
        })
        .encode()
        .expect("encodes");

        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!token.contains("9999"), "token must not expose the raw id");
    }

    #[test]
    fn rejects_empty_token() {
        assert_eq!(Cursor::<Boundary>::decode(""), Err(CursorError::Empty));
    }

    #[test]
    fn rejects_oversized_token() {
        let token = "A".repeat(MAX_TOKEN_LEN + 1);
        let err = Cursor::<Boundary>::decode(&token).expect_err("too long");

        assert!(matches!(err, CursorError::TooLong { length, .. } if length == MAX_TOKEN_LEN + 1));
    }

    #[rstest]
    #[case("not base64!")]
    #[case("abc=")]
    fn rejects_invalid_base64(#[case] token: &str) {
        let err = Cursor::<Boundary>::decode(token).expect_err("invalid base64");
        assert!(matches!(err, CursorError::InvalidEncoding { .. }));
    }

    #[rstest]
    #[case(r#"{"at":1}"#)]
    #[case(r#"{"at":1,"id":2,"extra":3}"#)]
    #[case("1:2")]
    fn rejects_payloads_that_are_not_boundaries(#[case] payload: &str) {
        let token = URL_SAFE_NO_PAD.encode(payload);
        let err = Cursor::<Boundary>::decode(&token).expect_err("invalid payload");

        assert!(matches!(err, CursorError::InvalidPayload { .. }));
    }
}
