//! services/api/src/bin/api.rs

use api_lib::{
    adapters::GeminiAdapter,
    config::{Config, ConfigError},
    error::ApiError,
    web::{rest::ApiDoc, router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Generative Service Adapter ---
    let api_key = config
        .gemini_api_key
        .as_ref()
        .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;
    let openai_config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(&config.gemini_api_base);
    let client = Client::with_config(openai_config);

    let generator = Arc::new(GeminiAdapter::new(
        client,
        config.chart_model.clone(),
        config.chat_model.clone(),
    ));
    info!(
        "Using chart model '{}' and chat model '{}' (policy: {:?}, window: {:?})",
        config.chart_model,
        config.chat_model,
        config.call_policy(),
        config.history_window()
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(&config, generator));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Config(ConfigError::InvalidValue(
            "CORS_ORIGIN".to_string(),
            e.to_string(),
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
