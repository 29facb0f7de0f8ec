/// Default plan name whose data allowance is reported by the accumulators endpoint.
pub const DEFAULT_PROMO_PLAN: &str = "VYOUNG";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub beeline_api_url: String,
    pub accounts_file: String,
    pub upstream_timeout_secs: u64,
    pub promo_plan: String,
    pub token_retry_limit: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            beeline_api_url: std::env::var("BEELINE_API_URL")
                .map_err(|_| anyhow::anyhow!("BEELINE_API_URL environment variable required"))
                .and_then(|url| validate_base_url(&url).map(|_| url))?,
            accounts_file: std::env::var("ACCOUNTS_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "accounts.json".to_string()),
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be a positive number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            promo_plan: std::env::var("PROMO_PLAN")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROMO_PLAN.to_string()),
            token_retry_limit: std::env::var("TOKEN_RETRY_LIMIT")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("TOKEN_RETRY_LIMIT must be a non-negative number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Beeline API URL: {}", config.beeline_api_url);
        tracing::debug!("Accounts file: {}", config.accounts_file);
        tracing::debug!("Upstream timeout: {}s", config.upstream_timeout_secs);
        tracing::debug!("Promo plan: {}", config.promo_plan);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Checks that the upstream base URL is an absolute http(s) URL.
pub fn validate_base_url(raw: &str) -> anyhow::Result<url::Url> {
    if raw.trim().is_empty() {
        anyhow::bail!("BEELINE_API_URL cannot be empty");
    }
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        anyhow::bail!("BEELINE_API_URL must start with http:// or https://");
    }
    url::Url::parse(raw).map_err(|e| anyhow::anyhow!("BEELINE_API_URL is not a valid URL: {}", e))
}
