//! Readiness registry.
//!
//! Session-scoped table mapping a bridge name to a readiness signal and, once
//! a runtime has registered, to a callable handle. The registry is the only
//! shared mutable state between the page session and the runtime locations:
//! it is mutated by `register`/`unregister` and read by `signal`/`lookup`.

use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use super::handle::BridgeHandle;

/// One-shot readiness future for a bridge name.
///
/// Created lazily on first reference, fulfilled exactly once when the runtime
/// registers, never re-created for the life of the session. Any number of
/// waiters observe the same fulfillment.
#[derive(Clone)]
pub struct ReadinessSignal {
    rx: watch::Receiver<bool>,
}

impl ReadinessSignal {
    /// Resolve once the bridge has registered.
    pub async fn ready(&self) {
        let mut rx = self.rx.clone();
        // The fulfillment side lives in the registry entry for the whole
        // session. Losing it means the registry itself is gone and no
        // registration can come; callers race this against a timeout.
        if rx.wait_for(|ready| *ready).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Whether the bridge has already registered.
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Whether two signals observe the same underlying fulfillment.
    pub fn same_signal(&self, other: &ReadinessSignal) -> bool {
        self.rx.same_channel(&other.rx)
    }
}

struct BridgeEntry {
    ready_tx: watch::Sender<bool>,
    handle: Option<BridgeHandle>,
}

impl BridgeEntry {
    fn unfulfilled() -> Self {
        Self {
            ready_tx: watch::channel(false).0,
            handle: None,
        }
    }
}

/// Session-scoped bridge registry.
///
/// Lives for the page session; entries are added on first reference and
/// overwritten on re-registration. At most one live handle exists per name at
/// a time; the latest registration wins on lookup, the first fulfillment wins
/// on the signal.
#[derive(Default)]
pub struct BridgeRegistry {
    entries: DashMap<String, BridgeEntry>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the readiness signal for a bridge name. Idempotent: all
    /// callers for the same name share one signal.
    pub fn signal(&self, name: &str) -> ReadinessSignal {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(BridgeEntry::unfulfilled);
        ReadinessSignal {
            rx: entry.ready_tx.subscribe(),
        }
    }

    /// Store a handle for a bridge name and fulfill its readiness signal.
    ///
    /// Fulfilling an already-fulfilled signal is a no-op; the handle is
    /// replaced either way.
    pub fn register(&self, name: &str, handle: BridgeHandle) {
        let mut entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(BridgeEntry::unfulfilled);

        let instance = handle.instance();
        if let Some(prior) = entry.handle.replace(handle) {
            tracing::info!(
                bridge = %name,
                prior = %prior.instance(),
                instance = %instance,
                "replaced bridge handle"
            );
        } else {
            tracing::info!(bridge = %name, instance = %instance, "bridge registered");
        }
        entry.ready_tx.send_replace(true);
    }

    /// Look up the latest handle for a bridge name.
    pub fn lookup(&self, name: &str) -> Option<BridgeHandle> {
        self.entries
            .get(name)
            .and_then(|entry| entry.handle.clone())
    }

    /// Remove the handle registered under `instance`, if it is still the live
    /// one. A stale disposal (the name was re-registered since) is a no-op.
    /// The readiness signal is never touched by disposal.
    pub fn unregister(&self, name: &str, instance: Uuid) -> bool {
        let Some(mut entry) = self.entries.get_mut(name) else {
            return false;
        };
        if entry
            .handle
            .as_ref()
            .is_some_and(|handle| handle.instance() == instance)
        {
            entry.handle = None;
            tracing::info!(bridge = %name, instance = %instance, "bridge unregistered");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::super::handle::{BridgeCallable, CallError};

    struct StaticCallable(&'static str);

    #[async_trait]
    impl BridgeCallable for StaticCallable {
        async fn call(&self, _operation: &str, _argument: &str) -> Result<String, CallError> {
            Ok(self.0.to_string())
        }
    }

    fn handle(text: &'static str) -> BridgeHandle {
        BridgeHandle::new(Arc::new(StaticCallable(text)))
    }

    #[test]
    fn test_signal_is_idempotent() {
        let registry = BridgeRegistry::new();

        let a = registry.signal("server");
        let b = registry.signal("server");
        let other = registry.signal("wasm");

        assert!(a.same_signal(&b));
        assert!(!a.same_signal(&other));
    }

    #[tokio::test]
    async fn test_never_registered_name_times_out() {
        let registry = BridgeRegistry::new();
        let signal = registry.signal("wasm");

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.ready()).await;
        assert!(waited.is_err());
        assert!(!signal.is_ready());
    }

    #[tokio::test]
    async fn test_register_wakes_concurrent_and_subsequent_waiters() {
        let registry = Arc::new(BridgeRegistry::new());

        let early = registry.signal("server");
        let waiter = tokio::spawn(async move { early.ready().await });

        registry.register("server", handle("pong"));

        tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .expect("concurrent waiter should resolve")
            .unwrap();

        // A waiter arriving after fulfillment observes the same outcome.
        let late = registry.signal("server");
        tokio::time::timeout(Duration::from_millis(100), late.ready())
            .await
            .expect("late waiter should resolve");
        assert!(registry.lookup("server").is_some());
    }

    #[tokio::test]
    async fn test_latest_handle_wins_on_lookup() {
        let registry = BridgeRegistry::new();
        let signal = registry.signal("server");

        let first = handle("one");
        let second = handle("two");
        let second_instance = second.instance();

        registry.register("server", first);
        registry.register("server", second);

        assert!(signal.is_ready());
        let current = registry.lookup("server").unwrap();
        assert_eq!(current.instance(), second_instance);
        assert_eq!(current.invoke("any", "").await.unwrap(), "two");
    }

    #[test]
    fn test_unregister_is_instance_guarded() {
        let registry = BridgeRegistry::new();
        let live = handle("pong");
        let live_instance = live.instance();
        registry.register("server", live);

        // A stale instance id must not clobber the live handle.
        assert!(!registry.unregister("server", Uuid::new_v4()));
        assert!(registry.lookup("server").is_some());

        assert!(registry.unregister("server", live_instance));
        assert!(registry.lookup("server").is_none());

        // Disposal never resets the signal.
        assert!(registry.signal("server").is_ready());
    }
}
