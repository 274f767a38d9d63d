//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod handler_generator;
mod webhook_repository;

#[cfg(test)]
pub use handler_generator::MockHandlerCodeGenerator;
pub use handler_generator::{
    FixtureHandlerCodeGenerator, GeneratedHandler, HandlerCodeGenerator, HandlerGeneratorError,
};
#[cfg(test)]
pub use webhook_repository::MockWebhookRepository;
pub use webhook_repository::{WebhookPage, WebhookRepository, WebhookRepositoryError};
