//! Extractor configuration shared by the HTTP handlers.
//!
//! Malformed JSON bodies are reported in the domain error shape instead of
//! actix's plain-text default.

use actix_web::web;
use serde_json::json;

use crate::domain::Error;

/// JSON extractor rejecting malformed bodies with `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("request body is invalid: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
            .into()
    })
}

/// Raw body extractor accepting at most `limit` bytes; larger bodies get 413.
pub fn payload_config(limit: usize) -> web::PayloadConfig {
    web::PayloadConfig::new(limit)
}
