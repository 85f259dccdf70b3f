//! Error handling for the request facade.
//!
//! Every failure a call can produce — connection error, timeout, non-2xx
//! status, business failure inside a 2xx response — is normalized into a
//! single [`ErrorObject`] shape and surfaced to the caller as
//! [`Error::Request`]. Cancellation is the one kind that bypasses
//! normalization: it carries only a reason string ([`Error::Cancelled`]).
//!
//! Design constraints follow the usual rules for library error types:
//!
//! 1. Strongly-typed errors via `thiserror`, `#[non_exhaustive]` enums
//! 2. Large variants boxed to keep the enum small
//! 3. `Cow<'static, str>` for zero-allocation static messages
//! 4. No panics on recoverable paths
//! 5. `Send + Sync + 'static` throughout
//!
//! # Example
//!
//! ```rust
//! use restwrap::error::{Error, ErrorCode, ErrorObject};
//!
//! fn describe(err: &Error) -> String {
//!     if let Some(object) = err.request_object() {
//!         format!("call failed with code {}", object.code)
//!     } else if let Some(reason) = err.as_cancelled() {
//!         format!("call cancelled: {reason}")
//!     } else {
//!         err.to_string()
//!     }
//! }
//!
//! let err = Error::from(ErrorObject::new(ErrorCode::Int(404), "not found"));
//! assert_eq!(describe(&err), "call failed with code 404");
//! ```

mod messages;
mod object;
mod transport;

use std::borrow::Cow;
use thiserror::Error as ThisError;

pub use messages::ErrorMessages;
pub use object::{ErrorCode, ErrorObject, UNKNOWN_CODE};

/// Result type alias for all facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type accepted from interceptors and other user callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by every facade operation.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A normalized transport or business failure.
    /// Boxed to keep the enum size small.
    #[error("{0}")]
    Request(Box<ErrorObject>),

    /// The call was cancelled through its request identifier.
    ///
    /// Carries only the cancellation reason; it never passes through the
    /// handler chain or the message table.
    #[error("cancelled: {0}")]
    Cancelled(Cow<'static, str>),

    /// The facade itself could not be constructed (invalid proxy URL,
    /// transport client build failure).
    #[error("configuration error: {0}")]
    Config(Cow<'static, str>),
}

impl Error {
    /// Creates a cancellation error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn cancelled(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Cancelled(reason.into())
    }

    /// Creates a configuration error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the normalized error object, if this is a request failure.
    ///
    /// This is the predicate for "did this call fail with a normalized
    /// error" — prefer it over matching on the enum directly, since the enum
    /// is `#[non_exhaustive]`.
    #[must_use]
    pub fn request_object(&self) -> Option<&ErrorObject> {
        match self {
            Error::Request(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the cancellation reason, if this call was cancelled.
    #[must_use]
    pub fn as_cancelled(&self) -> Option<&str> {
        match self {
            Error::Cancelled(reason) => Some(reason.as_ref()),
            _ => None,
        }
    }

    /// Whether this call was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }

    /// Whether the underlying failure was a connection-level network error.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        self.request_object().is_some_and(|o| o.is_network_error)
    }

    /// Whether the underlying failure was a transport deadline abort.
    #[must_use]
    pub fn is_timeout_error(&self) -> bool {
        self.request_object().is_some_and(|o| o.is_timeout_error)
    }
}

impl From<ErrorObject> for Error {
    fn from(object: ErrorObject) -> Self {
        Error::Request(Box::new(object))
    }
}

#[cfg(test)]
mod tests;
