//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer and the
//! schema wrappers for the domain error types. The document is served at
//! `/api-docs/openapi.json` and exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::capture::CaptureResponse;
use crate::inbound::http::generate::{GenerateRequest, GenerateResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::webhooks::{ListWebhooksResponse, WebhookBody, WebhookSummaryBody};

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Webhook inspector API",
        description = "Capture, browse, and generate handlers for webhook deliveries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhooks::list_webhooks,
        crate::inbound::http::webhooks::get_webhook,
        crate::inbound::http::generate::generate_handler,
        crate::inbound::http::capture::capture,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ListWebhooksResponse,
        WebhookSummaryBody,
        WebhookBody,
        GenerateRequest,
        GenerateResponse,
        CaptureResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "webhooks", description = "Captured webhook browsing and handler generation"),
        (name = "capture", description = "Live webhook capture"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    #[rstest]
    #[case("crate.domain.Error", "code")]
    #[case("crate.domain.Error", "message")]
    #[case("ListWebhooksResponse", "nextCursor")]
    #[case("WebhookSummaryBody", "createdAt")]
    #[case("WebhookBody", "statusCode")]
    #[case("GenerateRequest", "webhookIds")]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        assert!(
            object_fields(schema).iter().any(|name| name == field),
            "{schema} should have field '{field}'"
        );
    }

    #[rstest]
    #[case("/api/webhooks")]
    #[case("/api/webhooks/{id}")]
    #[case("/api/generate")]
    #[case("/capture/{tail}")]
    #[case("/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }
}
