//! Port for the capture store.
//!
//! Adapters persist [`NewWebhook`] batches, assign identifiers in insertion
//! order, and serve keyset pages in `(created_at DESC, id DESC)` order.
//! Every method is atomic with respect to the others: a batch is either
//! fully visible or not at all.

use async_trait::async_trait;
use pagination::PageSize;

use crate::domain::{NewWebhook, Webhook, WebhookBoundary, WebhookId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by capture store adapters.
    pub enum WebhookRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "webhook store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "webhook store query failed: {message}",
    }
}

/// One page read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookPage {
    /// Records in list order, at most one page long.
    pub webhooks: Vec<Webhook>,
    /// Whether records remain after the last one returned.
    pub has_more: bool,
}

/// Capture store port.
///
/// Implementations must:
/// - assign strictly increasing identifiers, never reusing one after
///   [`WebhookRepository::clear`];
/// - apply [`WebhookRepository::insert_many`] and
///   [`WebhookRepository::replace_all`] as single units;
/// - order pages by `created_at` descending, ties broken by id descending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    /// Append `webhooks` and return their identifiers in input order.
    async fn insert_many(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError>;

    /// Remove every record and return how many were removed.
    async fn clear(&self) -> Result<u64, WebhookRepositoryError>;

    /// Clear the store and insert `webhooks` in one unit.
    async fn replace_all(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError>;

    /// Read up to `size` records strictly after `after`, or from the newest
    /// record when `after` is `None`.
    async fn page(
        &self,
        after: Option<WebhookBoundary>,
        size: PageSize,
    ) -> Result<WebhookPage, WebhookRepositoryError>;

    /// Fetch one record.
    async fn get_by_id(&self, id: WebhookId) -> Result<Option<Webhook>, WebhookRepositoryError>;

    /// Fetch the records matching `ids` in list order. Unknown ids are
    /// skipped.
    async fn find_by_ids(&self, ids: &[WebhookId])
    -> Result<Vec<Webhook>, WebhookRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn error_constructors_accept_str() {
        let err = WebhookRepositoryError::connection("pool timed out");
        assert_eq!(
            err.to_string(),
            "webhook store connection failed: pool timed out"
        );
    }
}
