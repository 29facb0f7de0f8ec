//! Account summary retrieval
//!
//! Builds one [`Summary`] per account from a sequence of carrier calls:
//! 1. Ensure a token exists (login on demand)
//! 2. Fetch subscription status; a rejected token triggers a bounded re-login and restart
//! 3. Fetch minutes/SMS/data, price plan (with accumulator override) and balance,
//!    each best-effort

use crate::account_store::AccountStore;
use crate::authenticator::Authenticator;
use crate::errors::UpstreamError;
use crate::models::{
    AccumulatorsPayload, PrepaidAddBalancePayload, PrepaidBalancePayload, PricePlanPayload,
    StatusPayload, Summary,
};
use crate::upstream_client::BeelineClient;
use std::sync::Arc;

pub const STATUS_ENDPOINT: &str = "info/status";
pub const PREPAID_ADD_BALANCE_ENDPOINT: &str = "info/prepaidAddBalance";
pub const PRICE_PLAN_ENDPOINT: &str = "info/pricePlan";
pub const ACCUMULATORS_ENDPOINT: &str = "info/accumulators";
pub const PREPAID_BALANCE_ENDPOINT: &str = "info/prepaidBalance";

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const KB_PER_GB: f64 = 1024.0 * 1024.0;

/// Converts seconds to minutes.
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

/// Converts bytes to gigabytes (2^30).
pub fn bytes_to_gigabytes(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Converts kilobytes to gigabytes (2^20).
pub fn kilobytes_to_gigabytes(kilobytes: f64) -> f64 {
    kilobytes / KB_PER_GB
}

/// Rounds to two decimal places.
pub fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A built summary plus the error of the final balance call, if it failed.
///
/// The summary is usable even when `trailing_error` is set.
#[derive(Debug)]
pub struct SummaryOutcome {
    pub summary: Summary,
    pub trailing_error: Option<UpstreamError>,
}

/// Orchestrates authentication and metric calls for one account at a time.
#[derive(Clone)]
pub struct SummaryService {
    client: BeelineClient,
    store: Arc<AccountStore>,
    authenticator: Authenticator,
    promo_plan: String,
    token_retry_limit: u32,
}

impl SummaryService {
    pub fn new(
        client: BeelineClient,
        store: Arc<AccountStore>,
        promo_plan: impl Into<String>,
        token_retry_limit: u32,
    ) -> Self {
        let authenticator = Authenticator::new(client.clone(), store.clone());
        Self {
            client,
            store,
            authenticator,
            promo_plan: promo_plan.into(),
            token_retry_limit,
        }
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Computes the summary for `name`.
    ///
    /// `Err` means no summary could be produced: unknown account, failed
    /// login, or a failed status call. A status call rejected with
    /// `TOKEN_EXPIRED`/`TOKEN_NOT_FOUND` re-authenticates and restarts the
    /// whole pipeline, at most `token_retry_limit` times.
    pub async fn get_summary(&self, name: &str) -> Result<SummaryOutcome, UpstreamError> {
        let mut restarts = 0;
        loop {
            match self.attempt(name).await {
                Err(e) if e.is_token_invalidation() && restarts < self.token_retry_limit => {
                    restarts += 1;
                    tracing::warn!("[{}] Token rejected ({}), re-authenticating", name, e);
                    self.authenticator.refresh_token(name).await?;
                }
                Err(e) => {
                    if e.is_token_invalidation() {
                        tracing::error!(
                            "[{}] Token still rejected after {} re-authentication(s)",
                            name,
                            restarts
                        );
                    }
                    return Err(e);
                }
                Ok(outcome) => return Ok(outcome),
            }
        }
    }

    /// One pass of the pipeline; token invalidation is returned to the caller.
    async fn attempt(&self, name: &str) -> Result<SummaryOutcome, UpstreamError> {
        let mut account = self
            .store
            .get(name)
            .await
            .ok_or_else(|| UpstreamError::UnknownAccount(name.to_string()))?;

        if !account.has_token() {
            tracing::info!("[{}] No token stored, authenticating", name);
            self.authenticator.refresh_token(name).await?;
            account = self
                .store
                .get(name)
                .await
                .ok_or_else(|| UpstreamError::UnknownAccount(name.to_string()))?;
        }

        let ctn = account.login.to_string();
        let params = [("ctn", ctn.as_str()), ("token", account.token.as_str())];

        let mut summary = Summary {
            name: name.to_string(),
            number: account.login,
            ..Summary::default()
        };

        let status: StatusPayload = self
            .client
            .call(STATUS_ENDPOINT, &params)
            .await?
            .decode(STATUS_ENDPOINT)?;
        summary.status = status.status.unwrap_or_default();

        match self.fetch::<PrepaidAddBalancePayload>(PREPAID_ADD_BALANCE_ENDPOINT, &params).await {
            Ok(counters) => {
                summary.minutes = counters.seconds().map(seconds_to_minutes).unwrap_or(0.0);
                summary.sms = counters.sms().unwrap_or(0.0);
                summary.gigabytes = counters.bytes().map(bytes_to_gigabytes).unwrap_or(0.0);
            }
            Err(e) => skipped(name, &e),
        }

        if let Some(kilobytes) = self.promo_plan_rest(name, &params).await {
            summary.gigabytes = kilobytes_to_gigabytes(kilobytes);
        }
        summary.gigabytes = round_2(summary.gigabytes);

        let trailing_error = match self
            .fetch::<PrepaidBalancePayload>(PREPAID_BALANCE_ENDPOINT, &params)
            .await
        {
            Ok(balance) => {
                summary.balance = balance.balance.unwrap_or(0.0);
                None
            }
            Err(e) => {
                skipped(name, &e);
                Some(e)
            }
        };

        tracing::debug!("[{}] Summary built: {:?}", name, summary);
        Ok(SummaryOutcome {
            summary,
            trailing_error,
        })
    }

    /// Remaining promo-plan data in kilobytes, when the account is on the promo plan.
    async fn promo_plan_rest(&self, name: &str, params: &[(&str, &str)]) -> Option<f64> {
        let plan = match self.fetch::<PricePlanPayload>(PRICE_PLAN_ENDPOINT, params).await {
            Ok(plan) => plan,
            Err(e) => {
                skipped(name, &e);
                return None;
            }
        };
        if plan.plan_name() != Some(self.promo_plan.as_str()) {
            return None;
        }

        match self.fetch::<AccumulatorsPayload>(ACCUMULATORS_ENDPOINT, params).await {
            Ok(accumulators) => accumulators.rest_for(&self.promo_plan),
            Err(e) => {
                skipped(name, &e);
                None
            }
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        self.client.call(endpoint, params).await?.decode(endpoint)
    }
}

fn skipped(name: &str, err: &UpstreamError) {
    tracing::warn!("[{}] Best-effort call skipped: {}", name, err);
}
