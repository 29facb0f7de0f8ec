use crate::errors::UpstreamError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

// ============ Account State ============

/// Stored credentials and cached bearer token for one subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric login (the subscriber's CTN).
    pub login: i64,
    /// Password, only ever sent to the `auth` endpoint.
    pub password: String,
    /// Bearer token. Empty means "not authenticated".
    #[serde(default)]
    pub token: String,
}

impl Account {
    pub fn new(login: i64, password: impl Into<String>) -> Self {
        Self {
            login,
            password: password.into(),
            token: String::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// On-disk layout of the accounts file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsFile {
    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,
}

// ============ Summary ============

/// Best-effort usage and balance snapshot for one account.
///
/// Field names match the JSON the service has always returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    /// Account name (key in the account store).
    pub name: String,
    /// Subscriber number.
    pub number: i64,
    /// Subscription status as reported upstream, e.g. `ACTIVE`.
    pub status: String,
    /// Remaining data in gigabytes, rounded to two decimals.
    pub gigabytes: f64,
    /// Remaining voice minutes.
    pub minutes: f64,
    /// Remaining SMS count.
    #[serde(rename = "SMS")]
    pub sms: f64,
    /// Prepaid balance.
    pub balance: f64,
}

// ============ Upstream Envelope ============

/// Status metadata present in every carrier response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Meta {
    pub status: String,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decoded carrier response: metadata plus an endpoint-specific payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamEnvelope {
    pub meta: Meta,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl UpstreamEnvelope {
    pub fn is_ok(&self) -> bool {
        self.meta.status == "OK"
    }

    /// Decodes the payload into the typed shape expected for `endpoint`.
    pub fn decode<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, UpstreamError> {
        serde_json::from_value(serde_json::Value::Object(self.payload.clone())).map_err(|e| {
            UpstreamError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

// ============ Endpoint Payloads ============

/// `auth` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: Option<String>,
}

/// `info/status` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: Option<String>,
}

/// A single counter entry from `info/prepaidAddBalance`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    #[serde(default)]
    pub value: f64,
}

/// `info/prepaidAddBalance` payload. Time is in seconds, data in bytes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaidAddBalancePayload {
    #[serde(default)]
    pub balance_time: Option<Vec<BalanceEntry>>,
    #[serde(default, rename = "balanceSMS")]
    pub balance_sms: Option<Vec<BalanceEntry>>,
    #[serde(default)]
    pub balance_data: Option<Vec<BalanceEntry>>,
}

impl PrepaidAddBalancePayload {
    fn first_value(entries: &Option<Vec<BalanceEntry>>) -> Option<f64> {
        entries.as_ref().and_then(|e| e.first()).map(|e| e.value)
    }

    pub fn seconds(&self) -> Option<f64> {
        Self::first_value(&self.balance_time)
    }

    pub fn sms(&self) -> Option<f64> {
        Self::first_value(&self.balance_sms)
    }

    pub fn bytes(&self) -> Option<f64> {
        Self::first_value(&self.balance_data)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricePlanInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// `info/pricePlan` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlanPayload {
    #[serde(default)]
    pub price_plan_info: Option<PricePlanInfo>,
}

impl PricePlanPayload {
    pub fn plan_name(&self) -> Option<&str> {
        self.price_plan_info
            .as_ref()
            .and_then(|info| info.name.as_deref())
    }
}

/// One accumulator entry; `rest` is in kilobytes.
#[derive(Debug, Clone, Deserialize)]
pub struct Accumulator {
    #[serde(default)]
    pub soc: Option<String>,
    #[serde(default)]
    pub rest: Option<f64>,
}

/// `info/accumulators` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccumulatorsPayload {
    #[serde(default)]
    pub accumulators: Vec<Accumulator>,
}

impl AccumulatorsPayload {
    /// Remaining kilobytes of the last accumulator whose `soc` matches `plan`.
    pub fn rest_for(&self, plan: &str) -> Option<f64> {
        self.accumulators
            .iter()
            .filter(|a| a.soc.as_deref() == Some(plan))
            .filter_map(|a| a.rest)
            .last()
    }
}

/// `info/prepaidBalance` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PrepaidBalancePayload {
    #[serde(default)]
    pub balance: Option<f64>,
}
