//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use webhook_inspector::Trace;
use webhook_inspector::doc::ApiDoc;
use webhook_inspector::domain::WebhookService;
use webhook_inspector::domain::ports::WebhookRepository;
use webhook_inspector::inbound::http::capture::{CAPTURE_ROUTE, capture};
use webhook_inspector::inbound::http::extractors::{json_config, payload_config};
use webhook_inspector::inbound::http::generate::generate_handler;
use webhook_inspector::inbound::http::health::{HealthState, live, ready};
use webhook_inspector::inbound::http::state::HttpState;
use webhook_inspector::inbound::http::webhooks::{get_webhook, list_webhooks};
use webhook_inspector::outbound::codegen::TemplateHandlerGenerator;
use webhook_inspector::outbound::memory::InMemoryWebhookRepository;
use webhook_inspector::outbound::persistence::DieselWebhookRepository;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    max_body_bytes: usize,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        max_body_bytes,
    } = deps;

    let api = web::scope("/api")
        .service(list_webhooks)
        .service(get_webhook)
        .service(generate_handler);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(payload_config(max_body_bytes))
        .wrap(Trace)
        .service(api)
        .service(web::resource(CAPTURE_ROUTE).route(web::route().to(capture)))
        .service(ready)
        .service(live)
        .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Select the capture store: PostgreSQL when a pool is configured,
/// otherwise an in-memory store that lives as long as the process.
fn build_repository(config: &ServerConfig) -> Arc<dyn WebhookRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselWebhookRepository::new(pool.clone())),
        None => {
            info!("no database configured; captures are kept in memory");
            Arc::new(InMemoryWebhookRepository::new())
        }
    }
}

fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service = WebhookService::new(
        build_repository(config),
        Arc::new(TemplateHandlerGenerator::new()),
    );
    web::Data::new(HttpState::new(service).with_page_size(config.page_size))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness
/// is marked once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr,
        max_body_bytes,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            max_body_bytes,
        })
    })
    .bind(bind_addr)?;

    for addr in server.addrs() {
        info!(%addr, "listening");
    }
    let server = server.run();

    health_state.mark_ready();
    Ok(server)
}
