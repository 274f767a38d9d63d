//! Use-cases over the capture store.
//!
//! [`WebhookService`] resolves cursors, validates incoming records, and
//! gathers the records handed to the handler generator. Adapters receive the
//! store and generator as trait objects so the HTTP layer never touches
//! persistence directly.

use std::collections::HashSet;
use std::sync::Arc;

use pagination::{CursorError, PageSize, Paginated};
use serde_json::json;
use thiserror::Error as ThisError;
use tracing::debug;

use crate::domain::ports::{
    GeneratedHandler, HandlerCodeGenerator, HandlerGeneratorError, WebhookRepository,
    WebhookRepositoryError,
};
use crate::domain::{
    Error, NewWebhook, Webhook, WebhookBoundary, WebhookCursorError, WebhookId,
};

/// Failures surfaced by [`WebhookService`].
#[derive(Debug, ThisError)]
pub enum WebhookServiceError {
    /// The client's cursor could not be decoded; restart from the first page.
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] WebhookCursorError),
    /// A boundary could not be encoded for the next page.
    #[error("next cursor could not be encoded: {0}")]
    CursorEncoding(CursorError),
    /// The request is malformed.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },
    /// A requested record does not exist.
    #[error("{message}")]
    NotFound {
        /// Description of the missing record.
        message: String,
    },
    /// The capture store failed.
    #[error(transparent)]
    Repository(#[from] WebhookRepositoryError),
    /// The handler generator failed.
    #[error(transparent)]
    Generation(#[from] HandlerGeneratorError),
}

impl WebhookServiceError {
    fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    fn not_found(id: WebhookId) -> Self {
        Self::NotFound {
            message: format!("webhook {id} not found"),
        }
    }
}

impl From<WebhookServiceError> for Error {
    fn from(err: WebhookServiceError) -> Self {
        match err {
            WebhookServiceError::InvalidCursor(source) => {
                debug!(error = %source, "rejected pagination cursor");
                Error::invalid_request("cursor is invalid; restart from the first page")
                    .with_details(json!({ "code": "invalid_cursor" }))
            }
            WebhookServiceError::CursorEncoding(source) => Error::internal(source.to_string()),
            WebhookServiceError::InvalidArgument { message } => Error::invalid_request(message),
            WebhookServiceError::NotFound { message } => Error::not_found(message),
            WebhookServiceError::Repository(WebhookRepositoryError::Connection { message }) => {
                Error::service_unavailable(format!("webhook store unavailable: {message}"))
            }
            WebhookServiceError::Repository(WebhookRepositoryError::Query { message }) => {
                Error::internal(format!("webhook store error: {message}"))
            }
            WebhookServiceError::Generation(HandlerGeneratorError::Unavailable { message }) => {
                Error::service_unavailable(format!("handler generator unavailable: {message}"))
            }
            WebhookServiceError::Generation(HandlerGeneratorError::Failed { message }) => {
                Error::internal(format!("handler generation failed: {message}"))
            }
        }
    }
}

/// Webhook use-cases shared by the HTTP adapter and the seed job.
#[derive(Clone)]
pub struct WebhookService {
    repository: Arc<dyn WebhookRepository>,
    generator: Arc<dyn HandlerCodeGenerator>,
}

impl WebhookService {
    /// Create a service over the given store and generator.
    pub fn new(
        repository: Arc<dyn WebhookRepository>,
        generator: Arc<dyn HandlerCodeGenerator>,
    ) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Read one page in list order.
    ///
    /// `cursor` is the token returned with the previous page, or `None` for
    /// the newest records. The returned `next_cursor` is present only when
    /// more records remain.
    ///
    /// # Errors
    ///
    /// - [`WebhookServiceError::InvalidArgument`] when `limit` is zero or
    ///   above the page-size cap.
    /// - [`WebhookServiceError::InvalidCursor`] when `cursor` is malformed.
    /// - [`WebhookServiceError::Repository`] when the store fails.
    pub async fn list_page(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Paginated<Webhook>, WebhookServiceError> {
        let size = PageSize::new(limit)
            .map_err(|err| WebhookServiceError::invalid_argument(err.to_string()))?;
        let after = cursor.map(WebhookBoundary::decode).transpose()?;

        let page = self.repository.page(after, size).await?;
        let next_cursor = match page.webhooks.last() {
            Some(last) if page.has_more => Some(
                WebhookBoundary::of(last)
                    .encode()
                    .map_err(WebhookServiceError::CursorEncoding)?,
            ),
            _ => None,
        };

        Ok(Paginated {
            items: page.webhooks,
            next_cursor,
        })
    }

    /// Fetch one record by its client-facing identifier.
    ///
    /// Identifiers that are not positive integers cannot name a record and
    /// are reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookServiceError::NotFound`] or
    /// [`WebhookServiceError::Repository`].
    pub async fn get(&self, raw_id: &str) -> Result<Webhook, WebhookServiceError> {
        let id: WebhookId = raw_id.parse().map_err(|_| WebhookServiceError::NotFound {
            message: format!("webhook {raw_id} not found"),
        })?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| WebhookServiceError::not_found(id))
    }

    /// Validate and store one captured delivery.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookServiceError::InvalidArgument`] for malformed records
    /// and [`WebhookServiceError::Repository`] when the store fails.
    pub async fn capture(&self, webhook: NewWebhook) -> Result<WebhookId, WebhookServiceError> {
        let ids = self.insert_many(vec![webhook]).await?;
        ids.into_iter().next().ok_or_else(|| {
            WebhookServiceError::Repository(WebhookRepositoryError::query(
                "store returned no identifier for the inserted record",
            ))
        })
    }

    /// Validate and store a batch as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookServiceError::InvalidArgument`] naming the first
    /// malformed record; nothing is stored in that case.
    pub async fn insert_many(
        &self,
        webhooks: Vec<NewWebhook>,
    ) -> Result<Vec<WebhookId>, WebhookServiceError> {
        let validated = validate_batch(webhooks)?;
        Ok(self.repository.insert_many(&validated).await?)
    }

    /// Generate handler code for the selected records.
    ///
    /// Duplicate identifiers are collapsed. The generator receives records in
    /// list order.
    ///
    /// # Errors
    ///
    /// - [`WebhookServiceError::InvalidArgument`] for an empty selection or a
    ///   malformed identifier.
    /// - [`WebhookServiceError::NotFound`] when any identifier is unknown.
    /// - [`WebhookServiceError::Generation`] when the generator fails.
    pub async fn generate_handler(
        &self,
        raw_ids: &[String],
    ) -> Result<GeneratedHandler, WebhookServiceError> {
        if raw_ids.is_empty() {
            return Err(WebhookServiceError::invalid_argument(
                "select at least one webhook",
            ));
        }

        let mut seen = HashSet::with_capacity(raw_ids.len());
        let mut ids = Vec::with_capacity(raw_ids.len());
        for raw in raw_ids {
            let id: WebhookId = raw.parse().map_err(|err| {
                WebhookServiceError::invalid_argument(format!("invalid webhook id: {err}"))
            })?;
            if seen.insert(id) {
                ids.push(id);
            }
        }

        let webhooks = self.repository.find_by_ids(&ids).await?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !webhooks.iter().any(|webhook| webhook.id == **id))
        {
            return Err(WebhookServiceError::not_found(*missing));
        }

        Ok(self.generator.generate(&webhooks).await?)
    }
}

/// Validate every record, truncating timestamps to milliseconds.
///
/// # Errors
///
/// Returns [`WebhookServiceError::InvalidArgument`] naming the first
/// malformed record by its position in the batch.
pub fn validate_batch(webhooks: Vec<NewWebhook>) -> Result<Vec<NewWebhook>, WebhookServiceError> {
    webhooks
        .into_iter()
        .enumerate()
        .map(|(index, webhook)| {
            webhook.into_validated().map_err(|err| {
                WebhookServiceError::invalid_argument(format!("record {index} is invalid: {err}"))
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "webhook_service_tests.rs"]
mod tests;
