//! # restwrap
//!
//! A thin async HTTP client facade over `reqwest` for APIs speaking the
//! `{ code, data, message }` envelope convention:
//!
//! - **Response unwrapping**: calls resolve with the envelope's `data`
//!   (or the full envelope, per instance or per call).
//! - **Error normalization**: connection failures, timeouts, non-2xx
//!   statuses and business failures all collapse into one structured
//!   [`ErrorObject`].
//! - **Handler chain**: an ordered, caller-controlled chain of error
//!   handlers with a default reporting action and a per-call mute switch.
//! - **Cancellation**: identifier-scoped cooperative cancellation with
//!   guaranteed registry cleanup.
//!
//! Transport concerns — connections, TLS, redirects, timeout enforcement —
//! are `reqwest`'s job; retries and backoff are deliberately left to the
//! caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use restwrap::prelude::*;
//!
//! # async fn example() -> restwrap::Result<()> {
//! let client = ApiClient::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//!
//! match client.get("/users/42", None, None).await {
//!     Ok(user) => println!("{user}"),
//!     Err(err) => {
//!         if let Some(object) = err.request_object() {
//!             eprintln!("failed with code {}", object.code);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Global suppressions, matching how config-heavy client code reads:
// - module_name_repetitions: common library naming (ClientConfig in config)
// - missing_errors_doc / missing_panics_doc: too verbose for every Result fn
// - must_use_candidate: not every getter needs #[must_use]
// - struct_excessive_bools: option structs legitimately carry many flags
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::struct_excessive_bools)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod logging;
mod registry;
pub mod resolver;

pub use client::{ApiClient, ApiRequest, ClientBuilder, RequestInterceptor, UnauthorizedCallback};
pub use config::{CallOptions, ClientConfig, ProxyConfig};
pub use envelope::{DefaultResponseParser, Envelope, ResponseParser};
pub use error::{BoxError, Error, ErrorCode, ErrorMessages, ErrorObject, Result};
pub use handler::{
    ErrorHandler, ErrorHandlerChain, HandlerOutcome, HandlerRegistration, MessageHandler,
};
pub use resolver::ResponseResolver;

// Re-export for consumers coordinating their own cancellation.
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports.
///
/// ```rust
/// use restwrap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{ApiClient, ApiRequest, RequestInterceptor};
    pub use crate::config::{CallOptions, ClientConfig, ProxyConfig};
    pub use crate::envelope::{Envelope, ResponseParser};
    pub use crate::error::{Error, ErrorCode, ErrorMessages, ErrorObject, Result};
    pub use crate::handler::{ErrorHandler, HandlerOutcome};
    pub use tokio_util::sync::CancellationToken;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "restwrap");
    }
}
