//! The dual-runtime command bridge.
//!
//! A bridge pairs a runtime location's live command handler with a
//! discoverable name. The registry holds readiness signals and callable
//! handles per name; registrars publish handles once their runtime is up; the
//! dispatcher (see [`crate::dispatch`]) waits, looks up, and invokes.

pub mod handle;
pub mod registrar;
pub mod registry;

pub use handle::{BridgeCallable, BridgeHandle, CallError, LocalBridge};
pub use registrar::BridgeRegistrar;
pub use registry::{BridgeRegistry, ReadinessSignal};

/// Bridge name of the remote/server-hosted runtime location.
pub const SERVER_BRIDGE: &str = "server";

/// Bridge name of the in-page runtime location.
pub const WASM_BRIDGE: &str = "wasm";
