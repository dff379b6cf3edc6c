//! Callable bridge handles.
//!
//! A handle is an opaque reference to one live command handler instance in
//! one runtime location. The call shape is identical regardless of where the
//! target executes: the "server" runtime is reached over its command channel,
//! the in-page handler is invoked in-process.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use deckbridge_runtime::{CommandHandler, HandlerError, RuntimeError, RuntimeHandle};

/// Errors surfaced by a cross-runtime call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
    /// The operation ran and failed (or does not exist on the target).
    #[error("{0}")]
    Operation(String),

    /// The target runtime is gone (terminated, channel closed).
    #[error("bridge target unavailable: {0}")]
    Unavailable(String),
}

impl From<HandlerError> for CallError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Failed(message) => CallError::Operation(message),
            other => CallError::Operation(other.to_string()),
        }
    }
}

/// The uniform cross-runtime call surface.
///
/// One method, one shape: invoke a named operation with a string argument and
/// get a string (or failure) back, wherever the target lives.
#[async_trait]
pub trait BridgeCallable: Send + Sync {
    async fn call(&self, operation: &str, argument: &str) -> Result<String, CallError>;
}

/// Channel-backed calls into a worker runtime location.
#[async_trait]
impl BridgeCallable for RuntimeHandle {
    async fn call(&self, operation: &str, argument: &str) -> Result<String, CallError> {
        match self.invoke(operation, argument).await {
            Ok(text) => Ok(text),
            Err(RuntimeError::Handler(err)) => Err(err.into()),
            Err(err) => Err(CallError::Unavailable(err.to_string())),
        }
    }
}

/// In-process calls into a handler living on the page itself.
pub struct LocalBridge<H> {
    handler: Arc<H>,
}

impl<H> LocalBridge<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<H: CommandHandler> BridgeCallable for LocalBridge<H> {
    async fn call(&self, operation: &str, argument: &str) -> Result<String, CallError> {
        self.handler
            .invoke(operation, argument)
            .await
            .map_err(CallError::from)
    }
}

/// Opaque reference to a single live command handler instance.
///
/// Cloning shares the same instance; the instance id distinguishes this
/// registration from any replacement under the same bridge name.
#[derive(Clone)]
pub struct BridgeHandle {
    instance: Uuid,
    target: Arc<dyn BridgeCallable>,
}

impl BridgeHandle {
    pub fn new(target: Arc<dyn BridgeCallable>) -> Self {
        Self {
            instance: Uuid::new_v4(),
            target,
        }
    }

    /// Unique id of this registration.
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    /// Invoke a named operation on the target handler.
    pub async fn invoke(&self, operation: &str, argument: &str) -> Result<String, CallError> {
        self.target.call(operation, argument).await
    }
}

impl fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("instance", &self.instance)
            .finish()
    }
}
