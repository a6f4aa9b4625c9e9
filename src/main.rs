use anyhow::Context;
use faker_file_api::config::Settings;
use faker_file_api::observability::init_tracing;
use faker_file_api::routes::{create_router, OPENAPI_PATH, SWAGGER_UI_PATH};
use faker_file_api::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;
    init_tracing(&settings.logging);

    let address = settings.server.address();
    let state = AppState::new(settings);
    let providers = state.registry.len();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %address, providers, "Server running on http://{}", address);
    info!("Swagger UI: http://{}{}/", address, SWAGGER_UI_PATH);
    info!("OpenAPI JSON: http://{}{}", address, OPENAPI_PATH);

    axum::serve(listener, app).await?;

    Ok(())
}
