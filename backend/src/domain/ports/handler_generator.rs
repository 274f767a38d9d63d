//! Port for synthesising handler source code from captured deliveries.
//!
//! The generator is an opaque collaborator: it receives the selected records
//! and returns source text. It may be a local template or a remote service.

use async_trait::async_trait;

use crate::domain::Webhook;

use super::define_port_error;

define_port_error! {
    /// Errors raised by handler generator adapters.
    pub enum HandlerGeneratorError {
        /// The generator could not be reached.
        Unavailable { message: String } => "handler generator unavailable: {message}",
        /// The generator ran but could not produce code.
        Failed { message: String } => "handler generation failed: {message}",
    }
}

/// Source text produced for a set of deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHandler {
    /// Generated source code.
    pub code: String,
}

/// Handler code generation port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HandlerCodeGenerator: Send + Sync {
    /// Produce handler code covering `webhooks`.
    async fn generate(&self, webhooks: &[Webhook])
    -> Result<GeneratedHandler, HandlerGeneratorError>;
}

/// Generator returning an empty handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHandlerCodeGenerator;

#[async_trait]
impl HandlerCodeGenerator for FixtureHandlerCodeGenerator {
    async fn generate(
        &self,
        _webhooks: &[Webhook],
    ) -> Result<GeneratedHandler, HandlerGeneratorError> {
        Ok(GeneratedHandler {
            code: String::new(),
        })
    }
}
