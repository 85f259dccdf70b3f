//! Resolution of transport-successful bodies into the caller-facing value.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::CallOptions;
use crate::envelope::ResponseParser;

/// Decides, per call, whether the caller receives the unwrapped payload or
/// the raw body.
///
/// Pure and infallible: business-failure branching happens in the facade
/// before resolution, so by the time `resolve` runs the only question left
/// is which shape to hand back.
pub struct ResponseResolver {
    parser: Arc<dyn ResponseParser>,
    return_data_default: bool,
}

impl ResponseResolver {
    /// Creates a resolver with the given parser and instance-level
    /// `return_data` default.
    pub fn new(parser: Arc<dyn ResponseParser>, return_data_default: bool) -> Self {
        Self {
            parser,
            return_data_default,
        }
    }

    /// The effective `return_data` flag for a call: per-call override first,
    /// then the instance default.
    pub fn effective_return_data(&self, options: &CallOptions) -> bool {
        options.return_data.unwrap_or(self.return_data_default)
    }

    /// Resolves a transport-successful body.
    ///
    /// `skip_business_check` short-circuits to raw passthrough; otherwise
    /// the effective `return_data` picks between the extracted payload and
    /// the full body.
    pub fn resolve(&self, body: Value, options: &CallOptions) -> Value {
        if options.skip_business_check {
            return body;
        }
        if self.effective_return_data(options) {
            self.parser.into_data(body)
        } else {
            body
        }
    }
}

impl fmt::Debug for ResponseResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("return_data_default", &self.return_data_default)
            .finish_non_exhaustive()
    }
}
