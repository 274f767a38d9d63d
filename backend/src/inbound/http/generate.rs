//! Handler code generation endpoint.
//!
//! ```text
//! POST /api/generate {"webhookIds": ["1", "2"]}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request payload selecting the webhooks to cover.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Identifiers of the selected webhooks.
    #[schema(example = json!(["1", "2"]))]
    pub webhook_ids: Vec<String>,
}

/// Generated handler source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Handler source code.
    pub code: String,
}

/// Generate handler code for the selected webhooks.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated handler", body = GenerateResponse),
        (status = 400, description = "Empty selection or malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown webhook id", body = ErrorSchema),
        (status = 503, description = "Generator or store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "generateHandler"
)]
#[post("/generate")]
pub async fn generate_handler(
    state: web::Data<HttpState>,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let GenerateRequest { webhook_ids } = payload.into_inner();
    let generated = state.webhooks.generate_handler(&webhook_ids).await?;
    Ok(HttpResponse::Ok().json(GenerateResponse {
        code: generated.code,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::WebhookRepository;
    use crate::domain::{NewWebhook, WebhookService};
    use crate::inbound::http::extractors::json_config;
    use crate::outbound::codegen::TemplateHandlerGenerator;
    use crate::outbound::memory::InMemoryWebhookRepository;

    async fn seeded_state() -> web::Data<HttpState> {
        let repo = Arc::new(InMemoryWebhookRepository::new());
        let body = r#"{"type":"charge.succeeded"}"#;
        repo.insert_many(&[NewWebhook {
            method: "POST".to_owned(),
            pathname: "/webhooks/stripe".to_owned(),
            ip: "127.0.0.1".to_owned(),
            status_code: 200,
            content_type: Some("application/json".to_owned()),
            content_length: Some(body.len() as u64),
            query_params: None,
            headers: Some(BTreeMap::new()),
            body: Some(body.to_owned()),
            created_at: Utc
                .timestamp_millis_opt(1_000)
                .single()
                .expect("valid timestamp"),
        }])
        .await
        .expect("seeded");
        web::Data::new(HttpState::new(WebhookService::new(
            repo,
            Arc::new(TemplateHandlerGenerator::new()),
        )))
    }

    async fn post_json(payload: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(seeded_state().await)
                .app_data(json_config())
                .service(web::scope("/api").service(generate_handler)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn known_ids_produce_code() {
        let (status, body) = post_json(json!({ "webhookIds": ["1", "1"] })).await;

        assert_eq!(status, StatusCode::OK);
        let code = body["code"].as_str().expect("code string");
        assert!(code.contains(r#"case "charge.succeeded""#));
    }

    #[rstest]
    #[case(json!({ "webhookIds": [] }), StatusCode::BAD_REQUEST, "invalid_request")]
    #[case(json!({ "webhookIds": ["one"] }), StatusCode::BAD_REQUEST, "invalid_request")]
    #[case(json!({ "webhookIds": ["1", "404"] }), StatusCode::NOT_FOUND, "not_found")]
    #[case(json!({ "ids": ["1"] }), StatusCode::BAD_REQUEST, "invalid_request")]
    #[actix_web::test]
    async fn bad_selections_are_rejected(
        #[case] payload: Value,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let (actual, body) = post_json(payload).await;

        assert_eq!(actual, status);
        assert_eq!(body["code"], code);
    }
}
