//! HTTP inbound adapter exposing the REST and capture endpoints.

pub mod capture;
pub mod error;
pub mod extractors;
pub mod generate;
pub mod health;
pub mod schemas;
pub mod state;
pub mod webhooks;

pub use error::ApiResult;
