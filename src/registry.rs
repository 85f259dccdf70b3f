//! Tracking of in-flight cancelable requests.
//!
//! Invariant: at most one live cancellation token per request identifier.
//! Eviction on settlement is enforced by [`PendingGuard`]'s `Drop` impl, so
//! the entry is removed on every exit path — success, failure, external
//! cancellation, or the call's future being dropped. A guard only evicts the
//! entry it registered (generation check), never one that superseded it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Reason attached when a `cancel_previous` registration displaces a call.
pub(crate) const SUPERSEDED_REASON: &str = "superseded by a newer request";

const DEFAULT_REASON: &str = "request cancelled";

type ReasonSlot = Arc<Mutex<Option<String>>>;

struct PendingEntry {
    token: CancellationToken,
    reason: ReasonSlot,
    generation: u64,
}

impl PendingEntry {
    fn cancel(&self, reason: Option<String>) {
        *lock(&self.reason) = Some(reason.unwrap_or_else(|| DEFAULT_REASON.to_string()));
        self.token.cancel();
    }
}

#[derive(Default)]
struct State {
    next_generation: u64,
    entries: HashMap<String, PendingEntry>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map from request identifier to the cancellation token of the in-flight
/// call registered under it. Owned by one facade instance; all mutation is
/// synchronous.
#[derive(Default)]
pub(crate) struct PendingRequests {
    state: Arc<Mutex<State>>,
}

impl PendingRequests {
    /// Registers a call under `id`, returning the guard that owns its map
    /// entry.
    ///
    /// With `cancel_previous`, any pending entry under the same identifier
    /// is cancelled (reason: superseded) before the new one is inserted.
    /// Without it, the new entry still takes over the identifier; the older
    /// call keeps running but is no longer addressable by id.
    pub(crate) fn register(&self, id: &str, cancel_previous: bool) -> PendingGuard {
        let mut state = lock(&self.state);

        if cancel_previous
            && let Some(previous) = state.entries.get(id)
        {
            debug!(request_id = %id, "cancelling previous request with same id");
            previous.cancel(Some(SUPERSEDED_REASON.to_string()));
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let token = CancellationToken::new();
        let reason: ReasonSlot = Arc::new(Mutex::new(None));
        state.entries.insert(
            id.to_string(),
            PendingEntry {
                token: token.clone(),
                reason: reason.clone(),
                generation,
            },
        );

        PendingGuard {
            state: self.state.clone(),
            id: id.to_string(),
            generation,
            token,
            reason,
        }
    }

    /// Cancels and evicts the pending call under `id`, if any.
    pub(crate) fn cancel(&self, id: &str, reason: Option<String>) -> bool {
        let entry = lock(&self.state).entries.remove(id);
        match entry {
            Some(entry) => {
                debug!(request_id = %id, "request cancelled by caller");
                entry.cancel(reason);
                true
            }
            None => false,
        }
    }

    /// Whether a call is currently registered under `id`.
    pub(crate) fn contains(&self, id: &str) -> bool {
        lock(&self.state).entries.contains_key(id)
    }
}

impl std::fmt::Debug for PendingRequests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequests")
            .field("pending", &lock(&self.state).entries.len())
            .finish()
    }
}

/// RAII handle for one registered call.
///
/// Holds the call's cancellation token; evicts the registry entry on drop,
/// whatever the outcome of the call was.
pub(crate) struct PendingGuard {
    state: Arc<Mutex<State>>,
    id: String,
    generation: u64,
    token: CancellationToken,
    reason: ReasonSlot,
}

impl PendingGuard {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Consumes the cancellation reason left by the canceller.
    pub(crate) fn take_reason(&self) -> String {
        lock(&self.reason)
            .take()
            .unwrap_or_else(|| DEFAULT_REASON.to_string())
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        let still_ours = state
            .entries
            .get(&self.id)
            .is_some_and(|entry| entry.generation == self.generation);
        if still_ours {
            state.entries.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_evicts_on_drop() {
        let registry = PendingRequests::default();
        {
            let _guard = registry.register("a", false);
            assert!(registry.contains("a"));
        }
        assert!(!registry.contains("a"));
    }

    #[test]
    fn test_cancel_previous_cancels_and_replaces() {
        let registry = PendingRequests::default();
        let first = registry.register("x", false);
        assert!(!first.token().is_cancelled());

        let second = registry.register("x", true);
        assert!(first.token().is_cancelled());
        assert_eq!(first.take_reason(), SUPERSEDED_REASON);
        assert!(!second.token().is_cancelled());
        assert!(registry.contains("x"));
    }

    #[test]
    fn test_superseded_guard_does_not_evict_successor() {
        let registry = PendingRequests::default();
        let first = registry.register("x", false);
        let second = registry.register("x", true);

        // the superseded call settles: its guard must leave the new entry alone
        drop(first);
        assert!(registry.contains("x"));

        drop(second);
        assert!(!registry.contains("x"));
    }

    #[test]
    fn test_register_without_cancel_previous_replaces_silently() {
        let registry = PendingRequests::default();
        let first = registry.register("x", false);
        let _second = registry.register("x", false);
        assert!(!first.token().is_cancelled());
    }

    #[test]
    fn test_manual_cancel_with_reason() {
        let registry = PendingRequests::default();
        let guard = registry.register("dl", false);

        assert!(registry.cancel("dl", Some("user navigated away".to_string())));
        assert!(guard.token().is_cancelled());
        assert_eq!(guard.take_reason(), "user navigated away");
        assert!(!registry.contains("dl"));

        // already evicted
        assert!(!registry.cancel("dl", None));
    }

    #[test]
    fn test_manual_cancel_default_reason() {
        let registry = PendingRequests::default();
        let guard = registry.register("dl", false);
        assert!(registry.cancel("dl", None));
        assert_eq!(guard.take_reason(), DEFAULT_REASON);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let registry = PendingRequests::default();
        let a = registry.register("a", true);
        let b = registry.register("b", true);
        assert!(registry.cancel("a", None));
        assert!(a.token().is_cancelled());
        assert!(!b.token().is_cancelled());
        assert!(registry.contains("b"));
    }
}
