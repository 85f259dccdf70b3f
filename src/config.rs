//! Instance and per-call configuration types.

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy URL (e.g., "http://127.0.0.1:8080").
    pub url: String,
    /// Optional username for authentication.
    pub username: Option<String>,
    /// Optional password for authentication.
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Create a new proxy configuration with just a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Set credentials for the proxy.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Instance-level client configuration.
///
/// Holds the plain-data part of the configuration surface; callback hooks
/// (interceptor, unauthorized callback, message handler) and the response
/// parser are set on [`ClientBuilder`](crate::client::ClientBuilder)
/// directly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL prefixed to relative request paths.
    pub base_url: String,
    /// Request timeout (default: 10 seconds).
    pub timeout: Duration,
    /// TCP connection timeout (default: 10 seconds).
    pub connect_timeout: Duration,
    /// Instance default for envelope unwrapping: `true` resolves calls with
    /// the envelope's `data`, `false` with the full envelope.
    pub return_data: bool,
    /// User-Agent header value.
    pub user_agent: String,
    /// Optional proxy configuration.
    pub proxy: Option<ProxyConfig>,
    /// Whether unhandled errors are reported through the message handler.
    pub show_default_message: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            return_data: true,
            user_agent: format!("restwrap/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            show_default_message: true,
        }
    }
}

/// Per-call overrides.
///
/// Everything defaults to "inherit from the instance" / off, so a plain
/// `CallOptions::default()` changes nothing about a call.
///
/// # Example
///
/// ```rust
/// use restwrap::CallOptions;
///
/// let options = CallOptions::default()
///     .return_data(false)
///     .request_id("user-search")
///     .cancel_previous(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Overrides the instance `return_data` default for this call.
    pub return_data: Option<bool>,
    /// Suppresses all error reporting (handler chain and default message)
    /// for this call. The rejection itself still reaches the caller.
    pub hide_error_tip: bool,
    /// Bypasses envelope interpretation entirely; the raw body is returned
    /// verbatim. For endpoints that do not follow the envelope convention.
    pub skip_business_check: bool,
    /// Identifier scoping this call for cancellation.
    pub request_id: Option<String>,
    /// Cancels any pending call registered under the same identifier before
    /// this one is sent.
    pub cancel_previous: bool,
    /// Overrides the instance timeout for this call.
    pub timeout: Option<Duration>,
    /// Extra headers merged onto this call.
    pub headers: Option<HeaderMap>,
}

impl CallOptions {
    /// Overrides the `return_data` default for this call.
    #[must_use]
    pub fn return_data(mut self, return_data: bool) -> Self {
        self.return_data = Some(return_data);
        self
    }

    /// Suppresses error reporting for this call.
    #[must_use]
    pub fn hide_error_tip(mut self, hide: bool) -> Self {
        self.hide_error_tip = hide;
        self
    }

    /// Bypasses the envelope business check for this call.
    #[must_use]
    pub fn skip_business_check(mut self, skip: bool) -> Self {
        self.skip_business_check = skip;
        self
    }

    /// Scopes this call under a cancellation identifier.
    #[must_use]
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Cancels the previous pending call with the same identifier.
    #[must_use]
    pub fn cancel_previous(mut self, cancel: bool) -> Self {
        self.cancel_previous = cancel;
        self
    }

    /// Overrides the timeout for this call.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds extra headers to this call.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.return_data);
        assert!(config.show_default_message);
        assert!(config.base_url.is_empty());
        assert!(config.user_agent.starts_with("restwrap/"));
    }

    #[test]
    fn test_call_options_default_inherits_everything() {
        let options = CallOptions::default();
        assert_eq!(options.return_data, None);
        assert!(!options.hide_error_tip);
        assert!(!options.skip_business_check);
        assert!(options.request_id.is_none());
        assert!(!options.cancel_previous);
    }

    #[test]
    fn test_call_options_builder_chain() {
        let options = CallOptions::default()
            .return_data(false)
            .hide_error_tip(true)
            .skip_business_check(true)
            .request_id("search")
            .cancel_previous(true)
            .timeout(Duration::from_secs(3));
        assert_eq!(options.return_data, Some(false));
        assert!(options.hide_error_tip);
        assert!(options.skip_business_check);
        assert_eq!(options.request_id.as_deref(), Some("search"));
        assert!(options.cancel_previous);
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_proxy_config_credentials() {
        let proxy = ProxyConfig::new("http://localhost:8080").with_credentials("user", "pass");
        assert_eq!(proxy.url, "http://localhost:8080");
        assert_eq!(proxy.username.as_deref(), Some("user"));
        assert_eq!(proxy.password.as_deref(), Some("pass"));
    }
}
