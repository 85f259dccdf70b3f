//! Configurable human-readable messages for normalized errors.

use std::collections::HashMap;

/// Status→message table plus the named messages used when no status is
/// available.
///
/// The defaults cover the common HTTP error statuses; individual entries can
/// be overridden without retyping the rest:
///
/// ```rust
/// use restwrap::error::ErrorMessages;
///
/// let messages = ErrorMessages::default()
///     .with_status(404, "resource does not exist")
///     .with_timeout_error("the server took too long to answer");
/// assert_eq!(messages.for_status(404), "resource does not exist");
/// assert_eq!(messages.for_status(500), "internal server error");
/// ```
#[derive(Debug, Clone)]
pub struct ErrorMessages {
    /// Per-status overrides and defaults.
    pub status: HashMap<u16, String>,
    /// Message forced onto connection-level failures.
    pub network_error: String,
    /// Message forced onto deadline-exceeded failures.
    pub timeout_error: String,
    /// Fallback for statuses without a table entry and empty business messages.
    pub default_error: String,
    /// Message for requests that were sent but never answered.
    pub no_response: String,
}

impl ErrorMessages {
    /// Built-in fallback used when a business message is empty and no
    /// configured messages are in reach.
    pub const FALLBACK: &'static str = "request failed";

    /// Returns the message for an HTTP status, falling back to
    /// [`default_error`](Self::default_error) for unknown statuses.
    pub fn for_status(&self, status: u16) -> &str {
        self.status
            .get(&status)
            .map_or(self.default_error.as_str(), String::as_str)
    }

    /// Replaces the message for one status.
    #[must_use]
    pub fn with_status(mut self, status: u16, message: impl Into<String>) -> Self {
        self.status.insert(status, message.into());
        self
    }

    /// Replaces the network-error message.
    #[must_use]
    pub fn with_network_error(mut self, message: impl Into<String>) -> Self {
        self.network_error = message.into();
        self
    }

    /// Replaces the timeout-error message.
    #[must_use]
    pub fn with_timeout_error(mut self, message: impl Into<String>) -> Self {
        self.timeout_error = message.into();
        self
    }

    /// Replaces the default fallback message.
    #[must_use]
    pub fn with_default_error(mut self, message: impl Into<String>) -> Self {
        self.default_error = message.into();
        self
    }

    /// Replaces the no-response message.
    #[must_use]
    pub fn with_no_response(mut self, message: impl Into<String>) -> Self {
        self.no_response = message.into();
        self
    }
}

impl Default for ErrorMessages {
    fn default() -> Self {
        let status = [
            (400, "bad request"),
            (401, "unauthorized, please sign in"),
            (403, "forbidden"),
            (404, "not found"),
            (405, "method not allowed"),
            (408, "request timeout"),
            (429, "too many requests"),
            (500, "internal server error"),
            (502, "bad gateway"),
            (503, "service unavailable"),
            (504, "gateway timeout"),
        ]
        .into_iter()
        .map(|(code, msg)| (code, msg.to_string()))
        .collect();

        Self {
            status,
            network_error: "network error, please check your connection".to_string(),
            timeout_error: "request timed out".to_string(),
            default_error: Self::FALLBACK.to_string(),
            no_response: "no response from server".to_string(),
        }
    }
}
