//! Command handler contract.
//!
//! A command handler is the piece of add-in logic that lives inside a runtime
//! location and answers named operations. Handlers never talk to the bridge
//! registry themselves; registration is the registrar's job.

use async_trait::async_trait;

/// Errors a handler can produce while answering an operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HandlerError {
    /// The handler does not expose an operation with this name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The operation itself failed mid-execution.
    #[error("operation failed: {0}")]
    Failed(String),
}

/// A set of named operations callable by name with a string argument and a
/// string (or failure) result.
///
/// Two variants exist in the application crate, one per runtime location.
/// The same operation name may be exposed by both and answer independently.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Runtime location this handler serves ("server", "wasm"). Used for logs.
    fn location(&self) -> &str;

    /// Invoke a named operation.
    async fn invoke(&self, operation: &str, argument: &str) -> Result<String, HandlerError>;
}
