//! Classification of transport failures into [`ErrorObject`] values.
//!
//! Mirrors the decision table for raw transport outcomes:
//! a response with a status, a request that never got a reply, or a failure
//! before the request was sent at all. Classification relies on reqwest's
//! typed predicates rather than inspecting error text.

use serde_json::Value;

use super::messages::ErrorMessages;
use super::object::{ErrorCode, ErrorObject};

/// Maximum length for messages lifted out of response bodies, to keep error
/// values small when a server echoes a large payload.
pub(crate) const MAX_ERROR_MESSAGE_LEN: usize = 1024;

/// Truncates a message to [`MAX_ERROR_MESSAGE_LEN`], marking the cut.
pub(crate) fn truncate_message(mut msg: String) -> String {
    if msg.len() > MAX_ERROR_MESSAGE_LEN {
        msg.truncate(MAX_ERROR_MESSAGE_LEN);
        msg.push_str("... (truncated)");
    }
    msg
}

/// Extracts the server-supplied error message from a response body.
///
/// Checks `message`, then `msg`, then `error`, in that priority order; a
/// present field always wins over the status-table default.
pub(crate) fn body_message(body: &Value) -> Option<String> {
    ["message", "msg", "error"]
        .iter()
        .find_map(|key| body.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| truncate_message(s.to_string()))
}

impl ErrorObject {
    /// Builds the error for a non-2xx response.
    ///
    /// `code` and `transport_status` both carry the HTTP status; the message
    /// comes from the response body when it names one, otherwise from the
    /// status table.
    pub fn from_status(status: u16, body: Option<&Value>, messages: &ErrorMessages) -> Self {
        let message = body
            .and_then(body_message)
            .unwrap_or_else(|| messages.for_status(status).to_string());

        Self {
            code: ErrorCode::from(status),
            message,
            payload: body.filter(|b| !b.is_null()).cloned(),
            transport_status: Some(status),
            is_network_error: false,
            is_timeout_error: false,
        }
    }

    /// Builds the error for a send failure: the request never produced a
    /// usable response.
    ///
    /// Decision order, first match wins:
    /// 1. deadline exceeded → timeout message, `is_timeout_error`
    /// 2. connection could not be established → network message,
    ///    `is_network_error`
    /// 3. a status is attached after all → delegate to
    ///    [`from_status`](Self::from_status) with no body
    /// 4. the failure happened before the request was sent (builder or
    ///    request construction) → the failure's own text
    /// 5. anything else means the request went out and the reply never
    ///    completed → no-response message, `is_network_error`
    pub fn from_send_error(err: &reqwest::Error, messages: &ErrorMessages) -> Self {
        if err.is_timeout() {
            let mut object = Self::new(ErrorCode::UNKNOWN, messages.timeout_error.clone());
            object.is_timeout_error = true;
            return object;
        }

        if err.is_connect() {
            let mut object = Self::new(ErrorCode::UNKNOWN, messages.network_error.clone());
            object.is_network_error = true;
            return object;
        }

        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), None, messages);
        }

        if err.is_builder() || err.is_request() {
            let text = err.to_string();
            let message = if text.is_empty() {
                messages.default_error.clone()
            } else {
                truncate_message(text)
            };
            return Self::new(ErrorCode::UNKNOWN, message);
        }

        let mut object = Self::new(ErrorCode::UNKNOWN, messages.no_response.clone());
        object.is_network_error = true;
        object
    }

    /// Builds the error for a failure raised before the request reached the
    /// transport, such as a rejected interceptor.
    pub fn from_pre_send(err: &(dyn std::error::Error + Send + Sync), messages: &ErrorMessages) -> Self {
        let text = err.to_string();
        let message = if text.is_empty() {
            messages.default_error.clone()
        } else {
            truncate_message(text)
        };
        Self::new(ErrorCode::UNKNOWN, message)
    }
}
