//! Command dispatcher.
//!
//! Native-host command entry points. Each dispatch walks one state machine:
//!
//! `Start → WaitingForBridge → {Invoking → Completed} | {TimedOut →
//! Completed} | {LookupFailed → Completed}`
//!
//! The dispatcher's job is availability of *some* textual outcome: every
//! failure degrades to a descriptive string inserted into the host document,
//! and the host completion token is signaled on every path. Nothing here may
//! reach the host shell as an unhandled error.

mod manifest;
mod surface;

pub use manifest::{CommandAction, CommandBinding, CommandManifest, ManifestError};
pub use surface::CommandSurface;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::bridge::handle::CallError;
use crate::bridge::registry::BridgeRegistry;
use crate::config::DispatchConfig;
use crate::host::{CompletionToken, HostSink, TextBoxOptions};
use crate::types::{DispatchError, Result};

/// Geometry of the box receiving bridge results.
pub const RESULT_BOX: TextBoxOptions = TextBoxOptions::new(255.0, 50.0, 50.0, 450.0);

/// Geometry of the static hello box.
pub const HELLO_BOX: TextBoxOptions = TextBoxOptions::new(255.0, 25.0, 50.0, 250.0);

pub struct CommandDispatcher {
    registry: Arc<BridgeRegistry>,
    host: Arc<dyn HostSink>,
    ready_timeout: Duration,
}

impl CommandDispatcher {
    pub fn new(
        registry: Arc<BridgeRegistry>,
        host: Arc<dyn HostSink>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            registry,
            host,
            ready_timeout: config.ready_timeout(),
        }
    }

    /// Entry point for a bridge-backed host command, using the configured
    /// readiness timeout. Returns the outcome text that was forwarded to the
    /// host.
    pub async fn dispatch(
        &self,
        bridge: &str,
        operation: &str,
        argument: &str,
        token: CompletionToken,
    ) -> String {
        self.dispatch_with_timeout(bridge, operation, argument, self.ready_timeout, token)
            .await
    }

    /// Entry point for a bridge-backed host command with a per-call readiness
    /// timeout.
    pub async fn dispatch_with_timeout(
        &self,
        bridge: &str,
        operation: &str,
        argument: &str,
        ready_timeout: Duration,
        token: CompletionToken,
    ) -> String {
        let started = Instant::now();
        info!(command = %token.command(), bridge, operation, "dispatching host command");

        let outcome = match self
            .invoke_bridge(bridge, operation, argument, ready_timeout)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(command = %token.command(), error = %err, "dispatch degraded to error text");
                err.to_string()
            }
        };
        debug!(
            command = %token.command(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bridge call finished, forwarding result to host"
        );

        if let Err(err) = self.host.insert_text(&outcome, Some(RESULT_BOX)).await {
            let err = DispatchError::HostSync(err.to_string());
            warn!(command = %token.command(), error = %err, "host insert failed");
        }

        token.complete();
        outcome
    }

    /// Entry point for a static text insertion that bypasses the bridge.
    pub async fn insert_static(&self, text: &str, options: TextBoxOptions, token: CompletionToken) {
        info!(command = %token.command(), %text, "inserting static text");

        if let Err(err) = self.host.insert_text(text, Some(options)).await {
            let err = DispatchError::HostSync(err.to_string());
            warn!(command = %token.command(), error = %err, "host insert failed");
        }

        token.complete();
    }

    /// Steps 1–3: wait for readiness, look up the handle, invoke the named
    /// operation.
    async fn invoke_bridge(
        &self,
        bridge: &str,
        operation: &str,
        argument: &str,
        ready_timeout: Duration,
    ) -> Result<String> {
        let signal = self.registry.signal(bridge);
        if tokio::time::timeout(ready_timeout, signal.ready())
            .await
            .is_err()
        {
            return Err(DispatchError::Timeout {
                bridge: bridge.to_string(),
                waited_ms: ready_timeout.as_millis() as u64,
            });
        }
        debug!(bridge, "bridge is ready");

        let handle = self
            .registry
            .lookup(bridge)
            .ok_or_else(|| DispatchError::BridgeNotFound(bridge.to_string()))?;

        match handle.invoke(operation, argument).await {
            Ok(text) => Ok(text),
            Err(CallError::Operation(message)) => Err(DispatchError::Operation {
                operation: operation.to_string(),
                message,
            }),
            Err(CallError::Unavailable(message)) => {
                warn!(bridge, %message, "bridge handle no longer reachable");
                Err(DispatchError::BridgeNotFound(bridge.to_string()))
            }
        }
    }
}
