use crate::errors::{AppError, ResultExt};
use crate::models::Summary;
use crate::summary::SummaryService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Summary orchestrator, owning the client and account store.
    pub summaries: SummaryService,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /accounts
///
/// Summaries for every stored account, in account-name order. An account whose
/// summary cannot be built is still listed with its name and number and zeroed
/// metrics.
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Summaries for all accounts", body = [Summary])
    )
)]
pub async fn list_summaries(State(state): State<Arc<AppState>>) -> Json<Vec<Summary>> {
    tracing::debug!("GET /accounts");

    let mut summaries = Vec::new();
    for name in state.summaries.store().names().await {
        match state.summaries.get_summary(&name).await {
            Ok(outcome) => {
                if let Some(e) = outcome.trailing_error {
                    tracing::warn!("[{}] Summary returned with error: {}", name, e);
                }
                summaries.push(outcome.summary);
            }
            Err(e) => {
                tracing::warn!("[{}] Summary failed, listing zeroed entry: {}", name, e);
                let number = state
                    .summaries
                    .store()
                    .get(&name)
                    .await
                    .map(|account| account.login)
                    .unwrap_or_default();
                summaries.push(Summary {
                    name,
                    number,
                    ..Summary::default()
                });
            }
        }
    }

    Json(summaries)
}

/// GET /accounts/:name
///
/// Summary for a single account. A trailing balance error still yields 200.
#[utoipa::path(
    get,
    path = "/accounts/{name}",
    params(("name" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Account summary", body = Summary),
        (status = 404, description = "Unknown account"),
        (status = 500, description = "Summary could not be produced")
    )
)]
pub async fn get_account_summary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Summary>, AppError> {
    tracing::debug!("GET /accounts/{}", name);

    let outcome = state
        .summaries
        .get_summary(&name)
        .await
        .with_context(|| format!("Summary for account {}", name))?;

    if let Some(e) = outcome.trailing_error {
        tracing::warn!("[{}] Summary returned with error: {}", name, e);
    }

    Ok(Json(outcome.summary))
}
