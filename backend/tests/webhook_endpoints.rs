//! End-to-end HTTP behaviour of the capture, browse, and generate
//! endpoints against the in-memory store.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, Error, test, web};
use chrono::TimeDelta;
use mockable::DefaultClock;
use pagination::PageSize;
use rstest::rstest;
use serde_json::{Value, json};
use webhook_inspector::Trace;
use webhook_inspector::domain::{SeedMode, SeedPlan, WebhookService};
use webhook_inspector::inbound::http::capture::{CAPTURE_ROUTE, capture};
use webhook_inspector::inbound::http::extractors::{json_config, payload_config};
use webhook_inspector::inbound::http::generate::generate_handler;
use webhook_inspector::inbound::http::state::HttpState;
use webhook_inspector::inbound::http::webhooks::{get_webhook, list_webhooks};
use webhook_inspector::outbound::codegen::TemplateHandlerGenerator;
use webhook_inspector::outbound::memory::InMemoryWebhookRepository;
use webhook_inspector::seed::seed_repository;

async fn app(
    repo: Arc<InMemoryWebhookRepository>,
    page_size: usize,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = Error> {
    let service = WebhookService::new(repo, Arc::new(TemplateHandlerGenerator::new()));
    let state = HttpState::new(service)
        .with_page_size(PageSize::new(page_size).expect("page size"));
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(payload_config(64 * 1024))
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(list_webhooks)
                    .service(get_webhook)
                    .service(generate_handler),
            )
            .service(web::resource(CAPTURE_ROUTE).route(web::route().to(capture))),
    )
    .await
}

async fn seeded_repo(count: usize) -> Arc<InMemoryWebhookRepository> {
    let repo = Arc::new(InMemoryWebhookRepository::new());
    let plan = SeedPlan {
        count,
        window: TimeDelta::days(3),
        rng_seed: 2024,
        mode: SeedMode::ClearThenInsert,
    };
    seed_repository(Arc::clone(&repo), Arc::new(DefaultClock), &plan)
        .await
        .expect("seed store");
    repo
}

#[rstest]
#[actix_web::test]
async fn list_walks_every_page_via_next_cursor() {
    let app = app(seeded_repo(45).await, 20).await;

    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    let mut uri = "/api/webhooks".to_owned();
    loop {
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let has_link = res.headers().contains_key(header::LINK);
        let body: Value = test::read_body_json(res).await;

        let page = body["webhooks"].as_array().expect("webhooks array");
        sizes.push(page.len());
        for item in page {
            assert!(seen.insert(item["id"].as_str().expect("id").to_owned()));
        }

        match body["nextCursor"].as_str() {
            Some(cursor) => {
                assert!(has_link, "Link header accompanies nextCursor");
                uri = format!("/api/webhooks?cursor={cursor}");
            }
            None => {
                assert!(!has_link);
                break;
            }
        }
    }

    assert_eq!(sizes, vec![20, 20, 5]);
    assert_eq!(seen.len(), 45);
}

#[rstest]
#[actix_web::test]
async fn invalid_cursor_is_a_bad_request() {
    let app = app(seeded_repo(3).await, 20).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/webhooks?cursor=not-a-cursor")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["code"], json!("invalid_cursor"));
    assert!(body["traceId"].is_string());
}

#[rstest]
#[case("/api/webhooks/987654")]
#[case("/api/webhooks/abc")]
#[case("/api/webhooks/0")]
#[actix_web::test]
async fn unknown_ids_are_not_found(#[case] uri: &str) {
    let app = app(seeded_repo(3).await, 20).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("not_found"));
}

#[rstest]
#[actix_web::test]
async fn captured_delivery_round_trips_through_detail_endpoint() {
    let app = app(Arc::new(InMemoryWebhookRepository::new()), 20).await;

    let captured: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri("/capture/a/b?x=1&y=two")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .insert_header(("X-Request-Source", "integration"))
            .set_payload("hello")
            .to_request(),
    )
    .await;
    let id = captured["id"].as_str().expect("id");

    let detail: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/webhooks/{id}"))
            .to_request(),
    )
    .await;

    assert_eq!(detail["method"], json!("PATCH"));
    assert_eq!(detail["pathname"], json!("/a/b"));
    assert_eq!(detail["statusCode"], json!(200));
    assert_eq!(detail["contentType"], json!("text/plain"));
    assert_eq!(detail["contentLength"], json!(5));
    assert_eq!(detail["body"], json!("hello"));
    assert_eq!(detail["queryParams"], json!({ "x": "1", "y": "two" }));
    assert_eq!(detail["headers"]["x-request-source"], json!("integration"));
    assert!(
        detail["createdAt"]
            .as_str()
            .is_some_and(|at| at.ends_with('Z'))
    );
}

#[rstest]
#[actix_web::test]
async fn generate_covers_selected_event_types() {
    let repo = seeded_repo(10).await;
    let app = app(Arc::clone(&repo), 20).await;

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/webhooks").to_request(),
    )
    .await;
    let ids: Vec<Value> = listed["webhooks"]
        .as_array()
        .expect("webhooks array")
        .iter()
        .take(3)
        .map(|item| item["id"].clone())
        .collect();

    let mut event_types = Vec::new();
    for id in &ids {
        let detail: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/webhooks/{}", id.as_str().expect("id")))
                .to_request(),
        )
        .await;
        let body: Value =
            serde_json::from_str(detail["body"].as_str().expect("body")).expect("JSON body");
        event_types.push(body["type"].as_str().expect("type").to_owned());
    }

    let generated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "webhookIds": ids }))
            .to_request(),
    )
    .await;

    let code = generated["code"].as_str().expect("code");
    for event_type in event_types {
        assert!(code.contains(&format!("\"{event_type}\"")), "missing {event_type}");
    }
}

#[rstest]
#[case(json!({ "webhookIds": [] }), StatusCode::BAD_REQUEST)]
#[case(json!({ "webhookIds": ["nope"] }), StatusCode::BAD_REQUEST)]
#[case(json!({ "webhookIds": ["424242"] }), StatusCode::NOT_FOUND)]
#[case(json!({ "ids": ["1"] }), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn generate_rejects_bad_selections(#[case] payload: Value, #[case] expected: StatusCode) {
    let app = app(seeded_repo(2).await, 20).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}
