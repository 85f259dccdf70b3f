use reqwest::Response;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::ApiClient;
use crate::config::CallOptions;
use crate::error::{Error, ErrorCode, ErrorObject, Result};

const BODY_PREVIEW_SIZE: usize = 200;

impl ApiClient {
    /// Turns a transport response into the call's outcome.
    ///
    /// Non-2xx statuses and business failures both come out of here as
    /// [`Error::Request`]; this branch never settles as success. On the
    /// success path the resolver decides the returned shape.
    #[instrument(name = "api_response", skip(self, response, options), fields(status))]
    pub(crate) async fn handle_response(
        &self,
        response: Response,
        options: &CallOptions,
    ) -> Result<Value> {
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        let body_text = match response.text().await {
            Ok(text) => text,
            Err(cause) => {
                let object = ErrorObject::from_send_error(&cause, self.messages());
                return Err(self.fail(object, options).await);
            }
        };

        // Non-JSON bodies ride along as plain strings.
        let body: Value = serde_json::from_str(&body_text)
            .unwrap_or_else(|_| Value::String(body_text.clone()));

        let body_preview: String = body_text.chars().take(BODY_PREVIEW_SIZE).collect();
        debug!(
            status = %status,
            body_length = body_text.len(),
            body_preview = %body_preview,
            "response received"
        );

        if !status.is_success() {
            let object = ErrorObject::from_status(status.as_u16(), Some(&body), self.messages());
            return Err(self.fail(object, options).await);
        }

        if !options.skip_business_check && !self.parser().is_success(&body) {
            let code = self.parser().code(&body).unwrap_or(ErrorCode::UNKNOWN);
            let message = self
                .parser()
                .message(&body)
                .unwrap_or_else(|| self.messages().default_error.clone());
            let object =
                ErrorObject::from_business(code, message, Some(body), Some(status.as_u16()));
            return Err(self.fail(object, options).await);
        }

        Ok(self.resolver().resolve(body, options))
    }

    /// Final common path for every normalized failure: unauthorized
    /// callback, handler chain, then the rejection itself.
    ///
    /// `hide_error_tip` suppresses the reporting steps only — the returned
    /// error always reaches the caller.
    pub(crate) async fn fail(&self, object: ErrorObject, options: &CallOptions) -> Error {
        warn!(
            code = %object.code,
            transport_status = ?object.transport_status,
            is_network_error = object.is_network_error,
            is_timeout_error = object.is_timeout_error,
            message = %object.message,
            "request failed"
        );

        if object.transport_status == Some(401)
            && let Some(callback) = self.on_unauthorized()
        {
            callback(&object);
        }

        self.handlers().dispatch(&object, options.hide_error_tip).await;

        Error::from(object)
    }
}
