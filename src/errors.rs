use thiserror::Error;

/// Shown when the input is not an absolute http(s) URL
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid http(s) URL.";

/// Fallback for a 429 response without a detail string
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a bit.";

/// Fallback for every other failure without a detail string
pub const GENERIC_FAILURE_MESSAGE: &str = "Network or server error. Please try again.";

/// Failure of a request to the Shortening API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}{}", detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Http { status: u16, detail: Option<String> },

    /// No usable response (connection refused, timeout, undecodable body, ...)
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn http(status: u16, detail: Option<String>) -> Self {
        ApiError::Http { status, detail }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        ApiError::Transport(reason.into())
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Http { status: 429, .. })
    }

    /// The message the form displays for this failure.
    ///
    /// A server supplied detail always wins. Without one, 429 gets its own
    /// wording and everything else falls back to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Http {
                status: 429,
                detail: None,
            } => RATE_LIMITED_MESSAGE.to_string(),
            ApiError::Http { detail: None, .. } | ApiError::Transport(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// Extract a string `detail` field from an error body.
///
/// Bodies that are not JSON, or whose `detail` is not a string (FastAPI
/// validation errors send an array), count as having no detail.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(|d| d.to_string())
}
