use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Upstream message signalling that the carrier no longer knows the token.
pub const TOKEN_NOT_FOUND: &str = "TOKEN_NOT_FOUND";
/// Upstream message signalling that the token has expired.
pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";

/// Classification of an upstream-signalled logical error.
///
/// Decoded from the envelope message; only the two token-invalidation
/// messages get their own variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    TokenExpired,
    TokenNotFound,
    Other,
}

impl ApiErrorKind {
    /// Maps an upstream message to its kind. Matching is exact and case-sensitive.
    pub fn from_message(message: &str) -> Self {
        match message {
            TOKEN_EXPIRED => ApiErrorKind::TokenExpired,
            TOKEN_NOT_FOUND => ApiErrorKind::TokenNotFound,
            _ => ApiErrorKind::Other,
        }
    }

    /// True when the carrier rejected the bearer token and a fresh login is needed.
    pub fn is_token_invalidation(self) -> bool {
        matches!(self, ApiErrorKind::TokenExpired | ApiErrorKind::TokenNotFound)
    }
}

/// Errors produced while talking to the carrier API or mutating account state.
#[derive(Debug)]
pub enum UpstreamError {
    /// Connection, DNS or timeout failure. Never retried.
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Non-2xx HTTP status; `body` holds the raw response body.
    HttpStatus {
        endpoint: String,
        code: u16,
        body: String,
    },
    /// Body was not a JSON envelope of the expected shape.
    Decode { endpoint: String, reason: String },
    /// Envelope status was not `OK`. `message` is the upstream string, verbatim.
    Api {
        endpoint: String,
        code: Option<serde_json::Value>,
        message: String,
    },
    /// No account is stored under the given key.
    UnknownAccount(String),
    /// Auth succeeded but the payload carried no usable token.
    MalformedResponse { endpoint: String, reason: String },
}

impl UpstreamError {
    /// Kind of an `Api` error, `None` for every other variant.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            UpstreamError::Api { message, .. } => Some(ApiErrorKind::from_message(message)),
            _ => None,
        }
    }

    /// True for `Api` errors carrying `TOKEN_EXPIRED` or `TOKEN_NOT_FOUND`.
    pub fn is_token_invalidation(&self) -> bool {
        self.api_kind()
            .map(ApiErrorKind::is_token_invalidation)
            .unwrap_or(false)
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Transport { endpoint, source } => {
                write!(f, "Upstream request to {} failed: {}", endpoint, source)
            }
            UpstreamError::HttpStatus { endpoint, code, .. } => {
                write!(f, "Upstream {} returned HTTP {}", endpoint, code)
            }
            UpstreamError::Decode { endpoint, reason } => {
                write!(f, "Upstream response decode failed for {}: {}", endpoint, reason)
            }
            // The message doubles as the error kind and must stay untouched.
            UpstreamError::Api { message, .. } => write!(f, "{}", message),
            UpstreamError::UnknownAccount(name) => write!(f, "Unknown account: {}", name),
            UpstreamError::MalformedResponse { endpoint, reason } => {
                write!(f, "Malformed response from {}: {}", endpoint, reason)
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Resource not found error.
    NotFound(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.clone().into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<UpstreamError> for AppError {
    /// Unknown accounts become 404, every other terminal failure a 500.
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::UnknownAccount(name) => {
                AppError::NotFound(format!("Account {} not found", name))
            }
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, UpstreamError> {
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::from(e)),
            context: f(),
        })
    }
}
