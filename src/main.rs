use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beeline_summary_api::account_store::AccountStore;
use beeline_summary_api::app::build_app;
use beeline_summary_api::config::Config;
use beeline_summary_api::handlers::AppState;
use beeline_summary_api::summary::SummaryService;
use beeline_summary_api::upstream_client::BeelineClient;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Account store (credentials and cached tokens).
/// - Carrier API client and summary orchestrator.
/// - HTTP routes and middleware.
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beeline_summary_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let store = Arc::new(AccountStore::load(&config.accounts_file).await?);

    let client = BeelineClient::new(
        config.beeline_api_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    tracing::info!("✓ Beeline client initialized: {}", config.beeline_api_url);

    let summaries = SummaryService::new(
        client,
        store,
        config.promo_plan.clone(),
        config.token_retry_limit,
    );

    let app_state = Arc::new(AppState { summaries });
    let app = build_app(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
