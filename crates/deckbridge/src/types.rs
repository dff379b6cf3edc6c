//! Dispatch error taxonomy.

/// Result type alias
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Ways a host command dispatch can fail.
///
/// Every variant is caught at the dispatcher boundary and reduced to its
/// display string; none propagate to the host shell.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The readiness wait exceeded its deadline.
    #[error("timed out after {waited_ms} ms waiting for bridge '{bridge}'")]
    Timeout { bridge: String, waited_ms: u64 },

    /// The signal was fulfilled but no live handle is registered.
    #[error("bridge '{0}' is not available")]
    BridgeNotFound(String),

    /// The invoked operation itself failed.
    #[error("operation '{operation}' failed: {message}")]
    Operation { operation: String, message: String },

    /// The UI-insertion collaborator failed.
    #[error("failed to sync result into the host document: {0}")]
    HostSync(String),
}
