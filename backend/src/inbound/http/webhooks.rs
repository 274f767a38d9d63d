//! Captured webhook read endpoints.
//!
//! ```text
//! GET /api/webhooks?cursor=<opaque>
//! GET /api/webhooks/{id}
//! ```

use std::collections::BTreeMap;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, web};
use chrono::{DateTime, SecondsFormat, Utc};
use pagination::next_page_link;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Webhook;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query parameter carrying the page cursor.
pub const CURSOR_PARAM: &str = "cursor";

/// Render a timestamp as RFC 3339 with milliseconds and a `Z` suffix.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Query parameters for `GET /api/webhooks`.
#[derive(Debug, Deserialize)]
pub struct ListWebhooksQuery {
    /// Cursor from the previous page; absent or empty starts at the newest.
    pub cursor: Option<String>,
}

/// One row of the webhook list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSummaryBody {
    /// Record identifier.
    #[schema(example = "42")]
    pub id: String,
    /// HTTP method of the delivery.
    #[schema(example = "POST")]
    pub method: String,
    /// Request path of the delivery.
    #[schema(example = "/webhooks/stripe")]
    pub pathname: String,
    /// Capture time.
    #[schema(example = "2024-01-04T00:00:00.000Z")]
    pub created_at: String,
}

impl From<&Webhook> for WebhookSummaryBody {
    fn from(webhook: &Webhook) -> Self {
        Self {
            id: webhook.id.to_string(),
            method: webhook.method.clone(),
            pathname: webhook.pathname.clone(),
            created_at: format_timestamp(webhook.created_at),
        }
    }
}

/// Response payload for `GET /api/webhooks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWebhooksResponse {
    /// Records, newest first.
    pub webhooks: Vec<WebhookSummaryBody>,
    /// Cursor for the following page, `null` on the last page.
    pub next_cursor: Option<String>,
}

/// Full webhook record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookBody {
    /// Record identifier.
    #[schema(example = "42")]
    pub id: String,
    /// HTTP method of the delivery.
    pub method: String,
    /// Request path of the delivery.
    pub pathname: String,
    /// Sender address.
    pub ip: String,
    /// Status code answered to the sender.
    pub status_code: u16,
    /// `Content-Type` of the delivery.
    pub content_type: Option<String>,
    /// Body size in bytes.
    pub content_length: Option<u64>,
    /// Query string parameters.
    pub query_params: Option<BTreeMap<String, String>>,
    /// Request headers with lowercase names.
    pub headers: Option<BTreeMap<String, String>>,
    /// Body as text.
    pub body: Option<String>,
    /// Capture time.
    #[schema(example = "2024-01-04T00:00:00.000Z")]
    pub created_at: String,
}

impl From<Webhook> for WebhookBody {
    fn from(webhook: Webhook) -> Self {
        Self {
            id: webhook.id.to_string(),
            method: webhook.method,
            pathname: webhook.pathname,
            ip: webhook.ip,
            status_code: webhook.status_code,
            content_type: webhook.content_type,
            content_length: webhook.content_length,
            query_params: webhook.query_params,
            headers: webhook.headers,
            body: webhook.body,
            created_at: format_timestamp(webhook.created_at),
        }
    }
}

/// List captured webhooks, newest first.
#[utoipa::path(
    get,
    path = "/api/webhooks",
    params(
        ("cursor" = Option<String>, Query, description = "Opaque cursor from the previous page")
    ),
    responses(
        (
            status = 200,
            description = "One page of webhooks",
            headers(("Link" = String, description = "Next page link, present when more records remain")),
            body = ListWebhooksResponse
        ),
        (status = 400, description = "Malformed cursor", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "listWebhooks"
)]
#[get("/webhooks")]
pub async fn list_webhooks(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<ListWebhooksQuery>,
) -> ApiResult<HttpResponse> {
    let cursor = query.into_inner().cursor.filter(|value| !value.is_empty());
    let page = state
        .webhooks
        .list_page(cursor.as_deref(), state.page_size.get())
        .await?;

    let mut response = HttpResponse::Ok();
    if let Some(next) = page.next_cursor.as_deref() {
        let link = next_page_link(&req.full_url(), CURSOR_PARAM, next);
        response.insert_header((header::LINK, format!("<{link}>; rel=\"next\"")));
    }

    Ok(response.json(ListWebhooksResponse {
        webhooks: page.items.iter().map(WebhookSummaryBody::from).collect(),
        next_cursor: page.next_cursor,
    }))
}

/// Fetch one captured webhook.
#[utoipa::path(
    get,
    path = "/api/webhooks/{id}",
    params(("id" = String, Path, description = "Webhook identifier")),
    responses(
        (status = 200, description = "Webhook record", body = WebhookBody),
        (status = 404, description = "No such webhook", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "getWebhook"
)]
#[get("/webhooks/{id}")]
pub async fn get_webhook(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let webhook = state.webhooks.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(WebhookBody::from(webhook)))
}

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;
