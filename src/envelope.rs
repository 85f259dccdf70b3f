//! The envelope wire convention and pluggable response parsing.
//!
//! The default convention is a JSON object `{ code, data, message }` where
//! `code == 0` means business success. Interpretation is a seam: a custom
//! [`ResponseParser`] can be supplied for APIs with a different envelope,
//! and endpoints without any envelope are handled by the permissive
//! fallbacks (or bypassed entirely via
//! [`skip_business_check`](crate::CallOptions::skip_business_check)).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

/// Envelope code signalling business success.
pub const SUCCESS_CODE: i64 = 0;

/// The conventional response envelope.
///
/// Useful for callers that keep `return_data: false` and want to
/// deserialize the full wire shape.
///
/// # Example
///
/// ```rust
/// use restwrap::envelope::Envelope;
///
/// let envelope: Envelope<Vec<u32>> =
///     serde_json::from_str(r#"{"code":0,"data":[1,2,3],"message":"ok"}"#).unwrap();
/// assert!(envelope.is_success());
/// assert_eq!(envelope.data, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Business status code; `0` is success.
    pub code: i64,
    /// The payload proper.
    pub data: T,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
}

impl<T> Envelope<T> {
    /// Whether the envelope signals business success.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Interpretation of a transport-successful response body.
///
/// The four methods fully describe an envelope convention; behavior is
/// deterministic rather than shape-guessed at runtime. Implementations must
/// not fail: a body that does not match the convention is treated as
/// implicitly successful, with the whole body standing in for its data.
pub trait ResponseParser: Send + Sync {
    /// Whether the body signals business success.
    fn is_success(&self, body: &Value) -> bool;

    /// The business code carried by the body, if any.
    fn code(&self, body: &Value) -> Option<ErrorCode>;

    /// The business message carried by the body, if any.
    fn message(&self, body: &Value) -> Option<String>;

    /// Extracts the payload from the body, consuming it.
    ///
    /// When the body carries no extractable payload, the whole body is the
    /// payload.
    fn into_data(&self, body: Value) -> Value;
}

/// Parser for the default `{ code, data, message }` convention.
///
/// Deliberately permissive: a body without a numeric `code` member — plain
/// arrays, third-party shapes proxied through the facade — is treated as
/// successful, and a body without a `data` member resolves to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseParser;

impl ResponseParser for DefaultResponseParser {
    fn is_success(&self, body: &Value) -> bool {
        match body.get("code").and_then(Value::as_i64) {
            Some(code) => code == SUCCESS_CODE,
            None => true,
        }
    }

    fn code(&self, body: &Value) -> Option<ErrorCode> {
        let code = body.get("code")?;
        code.as_i64()
            .map(ErrorCode::Int)
            .or_else(|| code.as_str().map(ErrorCode::from))
    }

    fn message(&self, body: &Value) -> Option<String> {
        body.get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn into_data(&self, mut body: Value) -> Value {
        match body.as_object_mut().and_then(|map| map.remove("data")) {
            Some(data) => data,
            None => body,
        }
    }
}
