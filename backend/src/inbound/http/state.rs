//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only reach the store through
//! [`WebhookService`], so they stay testable against in-memory adapters.

use pagination::PageSize;

use crate::domain::WebhookService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Webhook use-cases.
    pub webhooks: WebhookService,
    /// Page size for `GET /api/webhooks`.
    pub page_size: PageSize,
}

impl HttpState {
    /// Bundle `webhooks` with the default page size.
    pub fn new(webhooks: WebhookService) -> Self {
        Self {
            webhooks,
            page_size: PageSize::default(),
        }
    }

    /// Override the list page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}
