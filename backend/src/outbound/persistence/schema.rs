//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Captured webhook deliveries.
    ///
    /// `id` is a `BIGSERIAL`, so identifiers keep increasing across clears.
    /// The `(created_at DESC, id DESC)` index serves keyset pagination.
    webhooks (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// HTTP method.
        method -> Text,
        /// Request path.
        pathname -> Text,
        /// Source address.
        ip -> Text,
        /// Recorded response status, constrained to 100..=599.
        status_code -> Int4,
        /// MIME type of the body.
        content_type -> Nullable<Text>,
        /// Body length in bytes, non-negative.
        content_length -> Nullable<Int8>,
        /// Query parameters as a flat JSON object.
        query_params -> Nullable<Jsonb>,
        /// Lowercased headers as a flat JSON object.
        headers -> Nullable<Jsonb>,
        /// Raw payload text.
        body -> Nullable<Text>,
        /// Capture timestamp.
        created_at -> Timestamptz,
    }
}
