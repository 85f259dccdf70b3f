//! The normalized error value produced for every failed call.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Sentinel code used when no HTTP status or business code is available.
pub const UNKNOWN_CODE: i64 = -1;

/// Business or transport status identifier.
///
/// The default envelope convention uses numeric codes, but custom
/// [`ResponseParser`](crate::envelope::ResponseParser) implementations may
/// surface alphanumeric codes, so both shapes are supported.
///
/// # Example
///
/// ```rust
/// use restwrap::error::ErrorCode;
///
/// let code = ErrorCode::from(404u16);
/// assert_eq!(code, ErrorCode::Int(404));
/// assert_eq!(code.to_string(), "404");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Numeric code (HTTP status, envelope code, or the `-1` sentinel).
    Int(i64),
    /// Alphanumeric code from a custom response parser.
    Str(String),
}

impl ErrorCode {
    /// The `-1` sentinel used when no status is available.
    pub const UNKNOWN: ErrorCode = ErrorCode::Int(UNKNOWN_CODE);

    /// Returns the numeric form of this code, if it has one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ErrorCode::Int(n) => Some(*n),
            ErrorCode::Str(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Int(n) => write!(f, "{n}"),
            ErrorCode::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(n: i64) -> Self {
        ErrorCode::Int(n)
    }
}

impl From<u16> for ErrorCode {
    fn from(n: u16) -> Self {
        ErrorCode::Int(i64::from(n))
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        ErrorCode::Str(s.to_string())
    }
}

impl From<String> for ErrorCode {
    fn from(s: String) -> Self {
        ErrorCode::Str(s)
    }
}

/// Normalized error value for a single failed call.
///
/// Every failure kind — connection error, timeout, non-2xx status, business
/// failure inside a 2xx response — collapses into this one shape,
/// distinguished by [`code`](Self::code), [`transport_status`](Self::transport_status)
/// and the two boolean flags. Constructed once per failed call and never
/// mutated afterwards.
///
/// Extracted to a separate struct and boxed inside
/// [`Error::Request`](crate::error::Error::Request) to keep the error enum
/// small.
///
/// # Example
///
/// ```rust
/// use restwrap::error::{ErrorCode, ErrorObject};
///
/// let err = ErrorObject::from_business(1001i64, "insufficient balance", None, Some(200));
/// assert_eq!(err.code, ErrorCode::Int(1001));
/// assert!(!err.is_network_error);
/// assert!(!err.is_timeout_error);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct ErrorObject {
    /// Business or transport status identifier; `-1` when unavailable.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// Response body fragment associated with the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// HTTP status code, when the transport produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_status: Option<u16>,
    /// Set when the transport could not establish or complete a connection.
    pub is_network_error: bool,
    /// Set when the transport aborted because a deadline was exceeded.
    pub is_timeout_error: bool,
}

impl ErrorObject {
    /// Creates a bare error object with the given code and message.
    ///
    /// Both flags start cleared and no payload or status is attached; the
    /// dedicated constructors ([`from_status`](Self::from_status),
    /// [`from_send_error`](Self::from_send_error),
    /// [`from_business`](Self::from_business)) should be preferred.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            payload: None,
            transport_status: None,
            is_network_error: false,
            is_timeout_error: false,
        }
    }

    /// Creates an error object for a business failure: a transport-successful
    /// response whose envelope code signals failure.
    ///
    /// `message` falls back to `"request failed"` when empty, since the
    /// transport succeeded and there is nothing better to report. Both flags
    /// are always false here.
    pub fn from_business(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        payload: Option<Value>,
        transport_status: Option<u16>,
    ) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            crate::error::ErrorMessages::FALLBACK.to_string()
        } else {
            message
        };
        Self {
            code: code.into(),
            message,
            payload,
            transport_status,
            is_network_error: false,
            is_timeout_error: false,
        }
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}
