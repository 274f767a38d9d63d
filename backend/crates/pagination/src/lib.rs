//! Opaque cursor and page-size primitives shared by list endpoints.
//!
//! The crate knows nothing about the records being paged. Callers choose a
//! serialisable boundary key (for example a `(created_at, id)` pair), wrap it
//! in a [`Cursor`], and hand the encoded token to clients. Tokens are
//! URL-safe base64 over a JSON document, so they survive query strings
//! untouched and never expose a bare sequential identifier.
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, PageSize};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Boundary {
//!     at: i64,
//!     id: i64,
//! }
//!
//! let token = Cursor::new(Boundary { at: 1_700_000_000_000, id: 7 })
//!     .encode()
//!     .expect("encodable key");
//! let decoded = Cursor::<Boundary>::decode(&token).expect("valid token");
//! assert_eq!(decoded.into_key(), Boundary { at: 1_700_000_000_000, id: 7 });
//!
//! let size = PageSize::new(20).expect("valid size");
//! assert_eq!(size.fetch_limit(), 21);
//! ```

mod cursor;
mod link;
mod page;

pub use cursor::{Cursor, CursorError, MAX_TOKEN_LEN};
pub use link::next_page_link;
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageSize, PageSizeError, Paginated, trim_to_page};
