use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use super::ApiClient;
use crate::config::CallOptions;
use crate::error::{Error, ErrorCode, ErrorObject, Result};

/// One outgoing request: method, target, payload and per-call options.
///
/// Verb methods on [`ApiClient`] construct these internally; use
/// [`ApiClient::request`] with an explicit `ApiRequest` for anything the
/// verb shortcuts do not cover.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, or a path resolved against the instance base URL.
    pub url: String,
    /// Query parameters, serialized from a JSON object.
    pub params: Option<Value>,
    /// JSON request body.
    pub body: Option<Value>,
    /// Per-call overrides.
    pub options: CallOptions,
}

impl ApiRequest {
    /// Creates a request with the given method and target.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            body: None,
            options: CallOptions::default(),
        }
    }

    /// Sets query parameters.
    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the per-call options.
    #[must_use]
    pub fn options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

impl ApiClient {
    /// Executes a request through the full pipeline: interceptor,
    /// cancellation registration, transport, envelope resolution, error
    /// normalization and reporting.
    ///
    /// # Returns
    ///
    /// The resolved value: the envelope's `data` when the effective
    /// `return_data` is true, the full body otherwise (always the raw body
    /// with `skip_business_check`).
    ///
    /// # Errors
    ///
    /// [`Error::Request`] for transport and business failures (always, even
    /// when a handler consumed the error report), [`Error::Cancelled`] when
    /// the call was displaced or cancelled through its request identifier.
    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    pub async fn request(&self, request: ApiRequest) -> Result<Value> {
        // Snapshot before the interceptor runs, so a rejected interceptor
        // still honors this call's reporting options.
        let pre_send_options = request.options.clone();

        let request = match self.interceptor() {
            Some(interceptor) => match interceptor.apply(request).await {
                Ok(request) => request,
                Err(cause) => {
                    let object = ErrorObject::from_pre_send(cause.as_ref(), self.messages());
                    return Err(self.fail(object, &pre_send_options).await);
                }
            },
            None => request,
        };

        // The guard owns the registry entry; dropping it on any exit path
        // below is what evicts the identifier.
        let guard = request
            .options
            .request_id
            .as_deref()
            .map(|id| self.pending().register(id, request.options.cancel_previous));

        match &guard {
            Some(guard) => {
                tokio::select! {
                    () = guard.token().cancelled() => Err(Error::cancelled(guard.take_reason())),
                    result = self.send(&request) => result,
                }
            }
            None => self.send(&request).await,
        }
    }

    /// Executes a request and deserializes the resolved value.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request), plus a normalized decode failure when
    /// the resolved value does not match `T`. Decode failures are not
    /// reported through the handler chain; they are a caller-side concern.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let value = self.request(request).await?;
        serde_json::from_value(value).map_err(|e| {
            Error::from(ErrorObject::new(
                ErrorCode::UNKNOWN,
                format!("failed to decode response: {e}"),
            ))
        })
    }

    /// Executes a GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path under the instance base URL
    /// * `params` - Optional query parameters as a JSON object
    /// * `options` - Optional per-call overrides
    pub async fn get(
        &self,
        url: &str,
        params: Option<Value>,
        options: Option<CallOptions>,
    ) -> Result<Value> {
        let mut request = ApiRequest::new(Method::GET, url);
        request.params = params;
        request.options = options.unwrap_or_default();
        self.request(request).await
    }

    /// Executes a POST request with an optional JSON body.
    pub async fn post(
        &self,
        url: &str,
        body: Option<Value>,
        options: Option<CallOptions>,
    ) -> Result<Value> {
        self.send_with_body(Method::POST, url, body, options).await
    }

    /// Executes a PUT request with an optional JSON body.
    pub async fn put(
        &self,
        url: &str,
        body: Option<Value>,
        options: Option<CallOptions>,
    ) -> Result<Value> {
        self.send_with_body(Method::PUT, url, body, options).await
    }

    /// Executes a PATCH request with an optional JSON body.
    pub async fn patch(
        &self,
        url: &str,
        body: Option<Value>,
        options: Option<CallOptions>,
    ) -> Result<Value> {
        self.send_with_body(Method::PATCH, url, body, options).await
    }

    /// Executes a DELETE request.
    pub async fn delete(&self, url: &str, options: Option<CallOptions>) -> Result<Value> {
        self.send_with_body(Method::DELETE, url, None, options).await
    }

    async fn send_with_body(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: Option<CallOptions>,
    ) -> Result<Value> {
        let mut request = ApiRequest::new(method, url);
        request.body = body;
        request.options = options.unwrap_or_default();
        self.request(request).await
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.resolve_url(&request.url);
        let mut builder = self.http().request(request.method.clone(), &url);

        if let Some(params) = &request.params {
            builder = builder.query(params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(headers) = &request.options.headers {
            builder = builder.headers(headers.clone());
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        match builder.send().await {
            Ok(response) => self.handle_response(response, &request.options).await,
            Err(cause) => {
                let object = ErrorObject::from_send_error(&cause, self.messages());
                Err(self.fail(object, &request.options).await)
            }
        }
    }

    /// Resolves a request target against the instance base URL. Absolute
    /// URLs pass through untouched.
    pub(crate) fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        let base = self.config().base_url.trim_end_matches('/');
        if base.is_empty() {
            return url.to_string();
        }
        format!("{}/{}", base, url.trim_start_matches('/'))
    }
}
