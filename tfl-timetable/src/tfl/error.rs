//! TfL client error types.

/// Errors from talking to the TfL API.
///
/// Every variant means the upstream service was unavailable or unusable
/// for this request; callers surface them as a gateway failure.
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing app key
    #[error("unauthorized: check TFL_APP_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by TfL API")]
    RateLimited,

    /// Client could not be configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl TflError {
    /// Build a `Json` error, keeping at most 500 characters of the body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        TflError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
