use crate::api_doc::ApiDoc;
use crate::config::Settings;
use crate::handlers::{heartbeat, providers};
use crate::observability::metrics_handler;
use crate::AppState;
use axum::http::{header::CONTENT_DISPOSITION, HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const HEARTBEAT_PATH: &str = "/heartbeat/";
pub const PROVIDERS_PATH: &str = "/providers/";
pub const METRICS_PATH: &str = "/metrics";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route(HEARTBEAT_PATH, get(heartbeat))
        .route(PROVIDERS_PATH, get(providers))
        .route(METRICS_PATH, get(metrics_handler));

    for entry in state.registry.entries() {
        router = router.route(&entry.path(), entry.method_router());
    }

    let limits = state.settings.limits.clone();
    let cors = cors_layer(&state.settings);

    router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(limits.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([CONTENT_DISPOSITION]);

    if settings.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}
