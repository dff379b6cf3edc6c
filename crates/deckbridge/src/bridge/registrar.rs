//! Bridge registrar.
//!
//! One registrar per runtime instance. It publishes the instance's command
//! handler into the registry exactly once, after the owning runtime has
//! started, and withdraws its own registration on teardown. Disposal never
//! fulfills or resets the readiness signal.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use deckbridge_runtime::{CommandHandler, RuntimeError, RuntimeHandle};

use super::handle::{BridgeCallable, BridgeHandle, LocalBridge};
use super::registry::BridgeRegistry;

pub struct BridgeRegistrar {
    registry: Arc<BridgeRegistry>,
    name: String,
    /// Instance id of our registration, once published.
    registered: Mutex<Option<Uuid>>,
}

impl BridgeRegistrar {
    pub fn new(registry: Arc<BridgeRegistry>, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
            registered: Mutex::new(None),
        }
    }

    /// Bridge name this registrar publishes under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this registrar has already published its handle.
    pub fn is_registered(&self) -> bool {
        self.registered.lock().is_some()
    }

    /// Publish a worker runtime location.
    ///
    /// Waits for the runtime's start-up notification first: registration runs
    /// only once the runtime is alive, which is why it has no failure path of
    /// its own.
    pub async fn register_runtime(&self, runtime: Arc<RuntimeHandle>) -> Result<(), RuntimeError> {
        runtime.started().await?;
        self.publish(runtime);
        Ok(())
    }

    /// Publish an in-page handler invoked in-process.
    pub fn register_handler<H: CommandHandler>(&self, handler: Arc<H>) {
        self.publish(Arc::new(LocalBridge::new(handler)));
    }

    fn publish(&self, target: Arc<dyn BridgeCallable>) {
        let mut registered = self.registered.lock();
        if registered.is_some() {
            tracing::warn!(bridge = %self.name, "registrar already published; ignoring");
            return;
        }

        let handle = BridgeHandle::new(target);
        *registered = Some(handle.instance());
        tracing::info!(
            bridge = %self.name,
            instance = %handle.instance(),
            "registering command handler"
        );
        self.registry.register(&self.name, handle);
    }
}

impl Drop for BridgeRegistrar {
    fn drop(&mut self) {
        if let Some(instance) = self.registered.lock().take() {
            self.registry.unregister(&self.name, instance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::handlers::ServerCommandHandler;

    #[tokio::test]
    async fn test_registers_once_per_instance() {
        let registry = Arc::new(BridgeRegistry::new());
        let registrar = BridgeRegistrar::new(registry.clone(), "server");

        registrar.register_handler(Arc::new(ServerCommandHandler));
        let first = registry.lookup("server").unwrap().instance();

        // A second publish from the same registrar instance is ignored.
        registrar.register_handler(Arc::new(ServerCommandHandler));
        assert_eq!(registry.lookup("server").unwrap().instance(), first);
        assert!(registrar.is_registered());
    }

    #[tokio::test]
    async fn test_drop_withdraws_handle_but_keeps_signal() {
        let registry = Arc::new(BridgeRegistry::new());
        let signal = registry.signal("server");

        let registrar = BridgeRegistrar::new(registry.clone(), "server");
        registrar.register_handler(Arc::new(ServerCommandHandler));
        assert!(signal.is_ready());

        drop(registrar);
        assert!(registry.lookup("server").is_none());
        assert!(signal.is_ready());
    }

    #[tokio::test]
    async fn test_stale_drop_keeps_replacement_handle() {
        let registry = Arc::new(BridgeRegistry::new());

        let old = BridgeRegistrar::new(registry.clone(), "server");
        old.register_handler(Arc::new(ServerCommandHandler));

        // Page re-render: a fresh instance replaces the handle first.
        let fresh = BridgeRegistrar::new(registry.clone(), "server");
        fresh.register_handler(Arc::new(ServerCommandHandler));
        let fresh_instance = registry.lookup("server").unwrap().instance();

        drop(old);
        assert_eq!(registry.lookup("server").unwrap().instance(), fresh_instance);
    }

    #[tokio::test]
    async fn test_register_runtime_waits_for_startup() {
        let registry = Arc::new(BridgeRegistry::new());
        let runtime = Arc::new(
            deckbridge_runtime::spawn("server", ServerCommandHandler).unwrap(),
        );

        let registrar = BridgeRegistrar::new(registry.clone(), "server");
        registrar.register_runtime(runtime.clone()).await.unwrap();

        let handle = registry.lookup("server").unwrap();
        assert_eq!(handle.invoke("whoami", "").await.unwrap(), "server runtime");
        runtime.terminate();
    }
}
