//! Main Entrypoint for the CommAI Web Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Initializing shared services (the generation client and view templates).
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use commai_api::{config::Config, router::create_router, state::AppState, view};
use commai_core::{conversation::ConversationService, llm_client::LlmConversationService};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    if config.api_key.is_none() {
        warn!("API_KEY is not set; requests to the generation service will be rejected.");
    }
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.api_key.clone().unwrap_or_default())
        .with_api_base(&config.api_base);
    let conversation_service: Arc<dyn ConversationService> = Arc::new(LlmConversationService::new(
        openai_config,
        config.chat_model.clone(),
        config.assessment_model.clone(),
    ));

    let templates = view::templates().context("Failed to compile view templates")?;

    let app_state = Arc::new(AppState {
        conversation_service,
        templates: Arc::new(templates),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        chat_model = %config.chat_model,
        assessment_model = %config.assessment_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
