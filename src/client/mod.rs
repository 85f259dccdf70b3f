//! The outward-facing request facade.
//!
//! [`ApiClient`] composes the transport (`reqwest`), the response resolver,
//! the error-handler chain and the pending-request registry behind verb
//! methods. Instances are built explicitly through [`ClientBuilder`] and
//! passed to consumers; there is no ambient global client.
//!
//! # Example
//!
//! ```rust,no_run
//! use restwrap::{ApiClient, CallOptions};
//!
//! # async fn example() -> restwrap::Result<()> {
//! let client = ApiClient::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//!
//! // resolves with the envelope's `data` member
//! let user = client.get("/users/42", None, None).await?;
//!
//! // full envelope for this one call
//! let raw = client
//!     .get("/users/42", None, Some(CallOptions::default().return_data(false)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod request;
mod response;


pub use request::ApiRequest;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::config::{ClientConfig, ProxyConfig};
use crate::envelope::{DefaultResponseParser, ResponseParser};
use crate::error::{BoxError, Error, ErrorMessages, ErrorObject, Result};
use crate::handler::{ErrorHandler, ErrorHandlerChain, HandlerRegistration, MessageHandler};
use crate::registry::PendingRequests;
use crate::resolver::ResponseResolver;

/// Hook run over the outgoing request before it is sent.
///
/// The canonical use is header or token injection. A rejected interceptor
/// fails the call as a pre-send transport failure.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Transforms the outgoing request.
    async fn apply(&self, request: ApiRequest) -> std::result::Result<ApiRequest, BoxError>;
}

/// Callback invoked when a call fails with HTTP 401.
///
/// There is no default action: redirecting to a sign-in flow (or whatever
/// "unauthorized" means to the application) must be wired explicitly.
pub type UnauthorizedCallback = Arc<dyn Fn(&ErrorObject) + Send + Sync>;

/// Thin request facade over `reqwest` with envelope unwrapping, error
/// normalization and a pluggable error-handler chain.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    messages: ErrorMessages,
    parser: Arc<dyn ResponseParser>,
    resolver: ResponseResolver,
    handlers: ErrorHandlerChain,
    pending: PendingRequests,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    on_unauthorized: Option<UnauthorizedCallback>,
}

impl ApiClient {
    /// Creates a builder with default configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Creates a client from a plain configuration, with the default parser
    /// and no hooks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the transport client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder {
            config,
            ..ClientBuilder::default()
        }
        .build()
    }

    /// Returns the instance configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the configured error messages.
    pub fn messages(&self) -> &ErrorMessages {
        &self.messages
    }

    /// Returns the error-handler chain, for runtime reporting updates.
    pub fn handlers(&self) -> &ErrorHandlerChain {
        &self.handlers
    }

    /// Appends an error handler; the returned handle unregisters it.
    ///
    /// Handlers run in registration order when a call fails; see
    /// [`ErrorHandlerChain::dispatch`].
    pub fn register_error_handler(&self, handler: Arc<dyn ErrorHandler>) -> HandlerRegistration {
        self.handlers.register(handler)
    }

    /// Cancels the pending call registered under `request_id`, if any.
    ///
    /// The in-flight call rejects with [`Error::Cancelled`] carrying
    /// `reason` (or a generic reason when `None`). Returns whether a pending
    /// call was found.
    pub fn cancel(&self, request_id: &str, reason: Option<String>) -> bool {
        self.pending.cancel(request_id, reason)
    }

    /// Whether a call is currently pending under `request_id`.
    pub fn is_pending(&self, request_id: &str) -> bool {
        self.pending.contains(request_id)
    }

    pub(crate) fn interceptor(&self) -> Option<&Arc<dyn RequestInterceptor>> {
        self.interceptor.as_ref()
    }

    pub(crate) fn on_unauthorized(&self) -> Option<&UnauthorizedCallback> {
        self.on_unauthorized.as_ref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn parser(&self) -> &dyn ResponseParser {
        self.parser.as_ref()
    }

    pub(crate) fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    pub(crate) fn pending(&self) -> &PendingRequests {
        &self.pending
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("handlers", &self.handlers)
            .field("pending", &self.pending)
            .field("has_interceptor", &self.interceptor.is_some())
            .field("has_on_unauthorized", &self.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
///
/// # Example
///
/// ```rust,no_run
/// use restwrap::ApiClient;
/// use std::time::Duration;
///
/// let client = ApiClient::builder()
///     .base_url("https://api.example.com")
///     .timeout(Duration::from_secs(5))
///     .return_data(true)
///     .on_unauthorized(|_err| {
///         // e.g. notify the session layer
///     })
///     .build()
///     .expect("client configuration is valid");
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    messages: ErrorMessages,
    parser: Arc<dyn ResponseParser>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    on_unauthorized: Option<UnauthorizedCallback>,
    message_handler: Option<MessageHandler>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            messages: ErrorMessages::default(),
            parser: Arc::new(DefaultResponseParser),
            interceptor: None,
            on_unauthorized: None,
            message_handler: None,
        }
    }
}

impl ClientBuilder {
    /// Sets the base URL prefixed to relative request paths.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Sets the request timeout (default: 10 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the TCP connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the instance default for envelope unwrapping.
    #[must_use]
    pub fn return_data(mut self, return_data: bool) -> Self {
        self.config.return_data = return_data;
        self
    }

    /// Sets a custom User-Agent string.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets the HTTP proxy configuration.
    #[must_use]
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Sets whether unhandled errors fire the default message action.
    #[must_use]
    pub fn show_default_message(mut self, show: bool) -> Self {
        self.config.show_default_message = show;
        self
    }

    /// Replaces the error message configuration.
    #[must_use]
    pub fn error_messages(mut self, messages: ErrorMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Replaces the envelope interpretation.
    #[must_use]
    pub fn response_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Sets the outbound request interceptor.
    #[must_use]
    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Sets the callback invoked on HTTP 401 failures.
    #[must_use]
    pub fn on_unauthorized<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ErrorObject) + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(callback));
        self
    }

    /// Sets the reporting function for unhandled errors
    /// (default: structured `tracing::error!`).
    #[must_use]
    pub fn message_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.message_handler = Some(Arc::new(handler));
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a timeout is zero, the proxy URL is
    /// invalid, or the transport client cannot be built.
    pub fn build(self) -> Result<ApiClient> {
        if self.config.timeout.is_zero() {
            return Err(Error::config("timeout cannot be zero"));
        }
        if self.config.connect_timeout.is_zero() {
            return Err(Error::config("connect_timeout cannot be zero"));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .gzip(true)
            .user_agent(&self.config.user_agent);

        if let Some(proxy_config) = &self.config.proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_config.url)
                .map_err(|e| Error::config(format!("invalid proxy URL: {e}")))?;

            if let (Some(username), Some(password)) =
                (&proxy_config.username, &proxy_config.password)
            {
                proxy = proxy.basic_auth(username, password);
            }
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        info!(
            base_url = %self.config.base_url,
            timeout_ms = %self.config.timeout.as_millis(),
            "api client initialized"
        );

        let handlers =
            ErrorHandlerChain::new(self.config.show_default_message, self.message_handler);
        let resolver = ResponseResolver::new(self.parser.clone(), self.config.return_data);

        Ok(ApiClient {
            http,
            config: self.config,
            messages: self.messages,
            parser: self.parser,
            resolver,
            handlers,
            pending: PendingRequests::default(),
            interceptor: self.interceptor,
            on_unauthorized: self.on_unauthorized,
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
