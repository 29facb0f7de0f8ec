use crate::account_store::AccountStore;
use crate::errors::UpstreamError;
use crate::models::AuthPayload;
use crate::upstream_client::BeelineClient;
use std::sync::Arc;

pub const AUTH_ENDPOINT: &str = "auth";

/// Exchanges stored credentials for a bearer token and writes it back to the store.
#[derive(Clone)]
pub struct Authenticator {
    client: BeelineClient,
    store: Arc<AccountStore>,
}

impl Authenticator {
    pub fn new(client: BeelineClient, store: Arc<AccountStore>) -> Self {
        Self { client, store }
    }

    /// Logs in as `name` and stores the returned token, replacing any prior one.
    ///
    /// On upstream failure the existing token is left untouched. Persistence
    /// of the refreshed store is best-effort.
    pub async fn refresh_token(&self, name: &str) -> Result<String, UpstreamError> {
        let account = self
            .store
            .get(name)
            .await
            .ok_or_else(|| UpstreamError::UnknownAccount(name.to_string()))?;

        tracing::info!("[{}] Requesting new token", name);
        let login = account.login.to_string();
        let envelope = self
            .client
            .call(
                AUTH_ENDPOINT,
                &[("login", login.as_str()), ("password", account.password.as_str())],
            )
            .await?;

        let payload: AuthPayload =
            envelope
                .decode(AUTH_ENDPOINT)
                .map_err(|e| UpstreamError::MalformedResponse {
                    endpoint: AUTH_ENDPOINT.to_string(),
                    reason: e.to_string(),
                })?;
        let token = payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| UpstreamError::MalformedResponse {
                endpoint: AUTH_ENDPOINT.to_string(),
                reason: "token missing from auth response".to_string(),
            })?;

        self.store.set_token(name, token.clone()).await?;
        self.store.persist().await;

        tracing::info!("[{}] Token refreshed", name);
        Ok(token)
    }
}
