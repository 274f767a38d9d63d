//! Live capture endpoint.
//!
//! ```text
//! ANY /capture/{tail:.*}
//! ```
//!
//! Any request under `/capture` is recorded as a delivery to `/{tail}` and
//! answered with the new record's id.

use std::collections::BTreeMap;

use actix_web::http::header::{self, HeaderMap};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, NewWebhook};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Route pattern the capture handler is mounted on.
pub const CAPTURE_ROUTE: &str = "/capture/{tail:.*}";

/// Identifier assigned to a captured delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CaptureResponse {
    /// Record identifier.
    #[schema(example = "42")]
    pub id: String,
}

fn headers_of(map: &HeaderMap) -> Option<BTreeMap<String, String>> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    (!headers.is_empty()).then_some(headers)
}

fn query_params_of(query: &str) -> Result<Option<BTreeMap<String, String>>, Error> {
    if query.is_empty() {
        return Ok(None);
    }
    web::Query::<BTreeMap<String, String>>::from_query(query)
        .map(|params| Some(params.into_inner()))
        .map_err(|err| {
            Error::invalid_request(format!("query string is invalid: {err}"))
                .with_details(json!({ "code": "invalid_query" }))
        })
}

/// Build the record for an inbound request.
fn to_new_webhook(req: &HttpRequest, tail: &str, body: &[u8]) -> Result<NewWebhook, Error> {
    let body = (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned());
    let content_length = body.as_deref().map_or(0, str::len);

    Ok(NewWebhook {
        method: req.method().as_str().to_owned(),
        pathname: format!("/{tail}"),
        ip: req
            .peer_addr()
            .map_or_else(|| "unknown".to_owned(), |addr| addr.ip().to_string()),
        status_code: 200,
        content_type: req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        content_length: u64::try_from(content_length).ok(),
        query_params: query_params_of(req.query_string())?,
        headers: headers_of(req.headers()),
        body,
        created_at: Utc::now(),
    })
}

/// Record an inbound delivery.
#[utoipa::path(
    post,
    path = "/capture/{tail}",
    params(("tail" = String, Path, description = "Path recorded for the delivery")),
    request_body(content = String, description = "Any payload", content_type = "*/*"),
    responses(
        (status = 200, description = "Delivery recorded", body = CaptureResponse),
        (status = 400, description = "Request could not be recorded", body = ErrorSchema),
        (status = 413, description = "Body exceeds the configured limit"),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["capture"],
    operation_id = "captureWebhook"
)]
pub async fn capture(
    state: web::Data<HttpState>,
    req: HttpRequest,
    tail: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let webhook = to_new_webhook(&req, &tail, &body)?;
    let pathname = webhook.pathname.clone();
    let id = state.webhooks.capture(webhook).await?;
    info!(%id, method = %req.method(), pathname = %pathname, "webhook captured");
    Ok(HttpResponse::Ok().json(CaptureResponse { id: id.to_string() }))
}
