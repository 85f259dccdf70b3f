//! Ordered error-handler chain with a default reporting action.
//!
//! Chain-of-responsibility over normalized errors: handlers run strictly in
//! registration order, and the first one that returns
//! [`HandlerOutcome::Stop`] ends processing — later handlers and the default
//! message action are skipped. There is no priority field; order is entirely
//! caller-controlled through registration order.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::{debug, error};

use crate::error::ErrorObject;

/// Control result of a handler's action.
///
/// This is an explicit control contract, not a truthiness convention:
/// [`Stop`](HandlerOutcome::Stop) ends the chain and suppresses the default
/// message, [`Continue`](HandlerOutcome::Continue) passes the error on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The error is fully handled; no further handlers or default reporting.
    Stop,
    /// The error was observed but not consumed; processing continues.
    Continue,
}

/// A predicate/action pair processing normalized errors.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use restwrap::error::ErrorObject;
/// use restwrap::handler::{ErrorHandler, HandlerOutcome};
///
/// struct UnauthorizedHandler;
///
/// #[async_trait]
/// impl ErrorHandler for UnauthorizedHandler {
///     fn can_handle(&self, error: &ErrorObject) -> bool {
///         error.transport_status == Some(401)
///     }
///
///     async fn handle(&self, _error: &ErrorObject) -> HandlerOutcome {
///         // e.g. refresh the session token
///         HandlerOutcome::Stop
///     }
/// }
/// ```
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    /// Whether this handler claims the error. Must be cheap and synchronous.
    fn can_handle(&self, error: &ErrorObject) -> bool;

    /// Acts on a claimed error; may await.
    async fn handle(&self, error: &ErrorObject) -> HandlerOutcome;
}

/// Reporting function receiving the message of unhandled errors.
pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

fn default_message_handler() -> MessageHandler {
    Arc::new(|message: &str| {
        error!(error_message = %message, "request failed");
    })
}

struct ChainInner {
    next_id: u64,
    handlers: Vec<(u64, Arc<dyn ErrorHandler>)>,
    show_default_message: bool,
    message_handler: MessageHandler,
}

// Lock helper: a poisoned chain lock only means a handler callback panicked;
// the handler list itself is still consistent.
fn lock(inner: &Mutex<ChainInner>) -> std::sync::MutexGuard<'_, ChainInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered, mutable list of [`ErrorHandler`]s owned by one facade instance.
#[derive(Clone)]
pub struct ErrorHandlerChain {
    inner: Arc<Mutex<ChainInner>>,
}

impl ErrorHandlerChain {
    /// Creates an empty chain with the given reporting configuration.
    pub fn new(show_default_message: bool, message_handler: Option<MessageHandler>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChainInner {
                next_id: 0,
                handlers: Vec::new(),
                show_default_message,
                message_handler: message_handler.unwrap_or_else(default_message_handler),
            })),
        }
    }

    /// Appends a handler and returns its unregistration handle.
    ///
    /// Handlers execute in registration order.
    pub fn register(&self, handler: Arc<dyn ErrorHandler>) -> HandlerRegistration {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, handler));
        debug!(handler_id = id, handlers = inner.handlers.len(), "error handler registered");
        HandlerRegistration {
            chain: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Swaps whether unhandled errors fire the default message action.
    /// Registered handlers are untouched.
    pub fn set_show_default_message(&self, show: bool) {
        lock(&self.inner).show_default_message = show;
    }

    /// Swaps the reporting function. Registered handlers are untouched.
    pub fn set_message_handler(&self, handler: MessageHandler) {
        lock(&self.inner).message_handler = handler;
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        lock(&self.inner).handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs the chain over a normalized error.
    ///
    /// `suppress` is the per-call escape hatch: when set, nothing runs at
    /// all — no handlers, no default message. It takes precedence over every
    /// registered handler.
    pub async fn dispatch(&self, error: &ErrorObject, suppress: bool) {
        if suppress {
            debug!(code = %error.code, "error reporting suppressed for this call");
            return;
        }

        // Snapshot under the lock, execute outside it: handlers may await.
        let handlers: Vec<(u64, Arc<dyn ErrorHandler>)> = lock(&self.inner).handlers.clone();

        for (id, handler) in handlers {
            if !handler.can_handle(error) {
                continue;
            }
            if handler.handle(error).await == HandlerOutcome::Stop {
                debug!(handler_id = id, code = %error.code, "error consumed by handler");
                return;
            }
        }

        let (show, message_handler) = {
            let inner = lock(&self.inner);
            (inner.show_default_message, inner.message_handler.clone())
        };
        if show {
            message_handler(&error.message);
        }
    }
}

impl Default for ErrorHandlerChain {
    fn default() -> Self {
        Self::new(true, None)
    }
}

impl fmt::Debug for ErrorHandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("ErrorHandlerChain")
            .field("handlers", &inner.handlers.len())
            .field("show_default_message", &inner.show_default_message)
            .finish_non_exhaustive()
    }
}

/// Unregistration handle returned by [`ErrorHandlerChain::register`].
///
/// Removes exactly the handler instance it was issued for. Idempotent: safe
/// to call any number of times, and a no-op once the handler (or the whole
/// chain) is gone. Dropping the handle does NOT unregister the handler.
#[derive(Debug)]
pub struct HandlerRegistration {
    chain: Weak<Mutex<ChainInner>>,
    id: u64,
}

impl HandlerRegistration {
    /// Removes the associated handler from its chain.
    pub fn unregister(&self) {
        if let Some(inner) = self.chain.upgrade() {
            let mut inner = lock(&inner);
            inner.handlers.retain(|(id, _)| *id != self.id);
        }
    }
}
