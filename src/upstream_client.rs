use crate::errors::UpstreamError;
use crate::models::UpstreamEnvelope;
use std::time::Duration;

/// Query parameters never written to logs.
const SECRET_PARAMS: &[&str] = &["token", "password"];

/// Client for the carrier account API.
///
/// Every call is a GET against `base_url/endpoint` with the parameters encoded
/// as a query string. Responses are decoded into an [`UpstreamEnvelope`] and
/// only returned when `meta.status` is `OK`.
#[derive(Clone)]
pub struct BeelineClient {
    client: reqwest::Client,
    base_url: String,
}

impl BeelineClient {
    /// Creates a new `BeelineClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the carrier API.
    /// * `timeout` - Transport timeout applied to every request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create Beeline client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::Url, UpstreamError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        reqwest::Url::parse_with_params(&raw, params).map_err(|e| UpstreamError::Decode {
            endpoint: endpoint.to_string(),
            reason: format!("Failed to build URL: {}", e),
        })
    }

    /// Calls `endpoint` with `params` and returns the decoded envelope.
    ///
    /// # Errors
    ///
    /// * `Transport` - the request could not be sent or timed out.
    /// * `HttpStatus` - the API answered with a non-2xx status.
    /// * `Decode` - the body was not a valid envelope.
    /// * `Api` - the envelope status was not `OK`.
    pub async fn call(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<UpstreamEnvelope, UpstreamError> {
        let url = self.endpoint_url(endpoint, params)?;
        tracing::debug!("[API GET] {} {}", endpoint, redact_params(params));

        // reqwest errors embed the full URL, query secrets included.
        let response = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("[API GET] Request failed: {}, endpoint: {}", e, endpoint);
            UpstreamError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                "[API GET] Returned {} error, raw response: {}, endpoint: {}",
                status,
                body,
                endpoint
            );
            return Err(UpstreamError::HttpStatus {
                endpoint: endpoint.to_string(),
                code: status.as_u16(),
                body,
            });
        }

        let envelope: UpstreamEnvelope = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(
                "[API GET] Response json decode failed: {}, endpoint: {}",
                e,
                endpoint
            );
            UpstreamError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !envelope.is_ok() {
            let message = envelope.meta.message.clone().unwrap_or_default();
            tracing::warn!(
                "[API GET] Returned {:?} error: {}, endpoint: {}",
                envelope.meta.code,
                message,
                endpoint
            );
            return Err(UpstreamError::Api {
                endpoint: endpoint.to_string(),
                code: envelope.meta.code.clone(),
                message,
            });
        }

        tracing::debug!("[API GET] {} answered OK", endpoint);
        Ok(envelope)
    }
}

/// Renders query parameters for logs with secret values replaced.
pub fn redact_params(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            if SECRET_PARAMS.contains(key) {
                format!("{}=[REDACTED]", key)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
