//! In-memory capture store.
//!
//! Records are indexed by id and by `(created_at, id)`. Every operation
//! holds the write or read lock for its whole duration, so batches become
//! visible all at once.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageSize, trim_to_page};
use tokio::sync::RwLock;

use crate::domain::ports::{WebhookPage, WebhookRepository, WebhookRepositoryError};
use crate::domain::{NewWebhook, Webhook, WebhookBoundary, WebhookId};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    by_id: HashMap<WebhookId, Webhook>,
    order: BTreeSet<(DateTime<Utc>, WebhookId)>,
}

impl State {
    fn next_id(&mut self) -> Result<WebhookId, WebhookRepositoryError> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| WebhookRepositoryError::query("identifier space exhausted"))?;
        let id = WebhookId::new(next).map_err(|err| WebhookRepositoryError::query(err.to_string()))?;
        self.last_id = next;
        Ok(id)
    }

    fn insert(&mut self, webhooks: &[NewWebhook]) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
        let mut ids = Vec::with_capacity(webhooks.len());
        let mut staged = Vec::with_capacity(webhooks.len());
        for webhook in webhooks {
            let id = self.next_id()?;
            ids.push(id);
            staged.push(webhook.clone().with_id(id));
        }
        for webhook in staged {
            self.order.insert((webhook.created_at, webhook.id));
            self.by_id.insert(webhook.id, webhook);
        }
        Ok(ids)
    }

    fn clear(&mut self) -> u64 {
        let removed = self.by_id.len();
        self.by_id.clear();
        self.order.clear();
        u64::try_from(removed).unwrap_or(u64::MAX)
    }

    fn resolve<'a>(&'a self, keys: impl Iterator<Item = &'a (DateTime<Utc>, WebhookId)>) -> Vec<Webhook> {
        keys.filter_map(|(_, id)| self.by_id.get(id).cloned()).collect()
    }
}

/// Capture store held in process memory.
///
/// Identifiers keep increasing across [`WebhookRepository::clear`].
#[derive(Debug, Default)]
pub struct InMemoryWebhookRepository {
    state: RwLock<State>,
}

impl InMemoryWebhookRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookRepository for InMemoryWebhookRepository {
    async fn insert_many(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
        self.state.write().await.insert(webhooks)
    }

    async fn clear(&self) -> Result<u64, WebhookRepositoryError> {
        Ok(self.state.write().await.clear())
    }

    async fn replace_all(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
        let mut state = self.state.write().await;
        state.clear();
        state.insert(webhooks)
    }

    async fn page(
        &self,
        after: Option<WebhookBoundary>,
        size: PageSize,
    ) -> Result<WebhookPage, WebhookRepositoryError> {
        let state = self.state.read().await;
        let mut webhooks = match after {
            Some(boundary) => state.resolve(
                state
                    .order
                    .range(..(boundary.created_at, boundary.id))
                    .rev()
                    .take(size.fetch_limit()),
            ),
            None => state.resolve(state.order.iter().rev().take(size.fetch_limit())),
        };
        let has_more = trim_to_page(&mut webhooks, size);
        Ok(WebhookPage { webhooks, has_more })
    }

    async fn get_by_id(&self, id: WebhookId) -> Result<Option<Webhook>, WebhookRepositoryError> {
        Ok(self.state.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[WebhookId],
    ) -> Result<Vec<Webhook>, WebhookRepositoryError> {
        let wanted: HashSet<WebhookId> = ids.iter().copied().collect();
        let state = self.state.read().await;
        Ok(state.resolve(
            state
                .order
                .iter()
                .rev()
                .filter(|(_, id)| wanted.contains(id)),
        ))
    }
}
