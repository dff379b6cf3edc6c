//! Deckbridge Runtime
//!
//! Worker-thread runtime locations for the add-in command bridge. Each runtime
//! instance runs in a dedicated OS thread with its own single-threaded tokio
//! runtime and `LocalSet` (no work-stealing), so two runtime locations are
//! genuinely separate execution contexts that share no memory with the page
//! session.
//!
//! # Architecture
//!
//! - Each runtime runs in a dedicated thread with a cooperative event loop
//! - Communication with the page session is request/response only: an mpsc
//!   command channel in, oneshot replies out
//! - Invocations are `spawn_local`-ed, so a slow operation never stalls the
//!   loop or other in-flight invocations on the same runtime

mod handler;

pub use handler::{CommandHandler, HandlerError};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::LocalSet;

/// Request to invoke a named operation inside the runtime.
struct InvokeRequest {
    operation: String,
    argument: String,
    response_tx: oneshot::Sender<Result<String, HandlerError>>,
}

/// Messages sent to the runtime thread.
enum RuntimeCommand {
    Invoke(InvokeRequest),
    Shutdown,
}

/// Errors that can occur in the runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The runtime thread could not be spawned.
    #[error("failed to spawn runtime thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The runtime has been terminated.
    #[error("runtime has terminated")]
    Terminated,

    /// The command channel to the runtime thread is closed.
    #[error("runtime command channel closed")]
    ChannelClosed,

    /// The runtime thread panicked.
    #[error("runtime thread panicked")]
    ThreadPanic,

    /// The handler reported a failure for this operation.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a spawned runtime location.
///
/// This is a simple, lightweight handle. All the complexity lives in the
/// runtime thread. Communication is request/response only.
pub struct RuntimeHandle {
    /// Runtime location name, for logs.
    name: String,
    /// Send commands to the runtime thread.
    cmd_tx: mpsc::UnboundedSender<RuntimeCommand>,
    /// Becomes true once the runtime's event loop is running.
    started_rx: watch::Receiver<bool>,
    /// Whether the runtime has terminated.
    terminated: Arc<AtomicBool>,
    /// Thread join handle.
    thread_handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RuntimeHandle {
    /// Runtime location name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait until the runtime's event loop is up.
    ///
    /// Start-up is asynchronous; callers that need the runtime alive (e.g. a
    /// bridge registrar) await this before publishing the handle.
    pub async fn started(&self) -> Result<(), RuntimeError> {
        let mut rx = self.started_rx.clone();
        rx.wait_for(|started| *started)
            .await
            .map_err(|_| RuntimeError::Terminated)?;
        Ok(())
    }

    /// Invoke a named operation inside the runtime and wait for the result.
    ///
    /// This sends a request to the runtime thread and awaits the response.
    pub async fn invoke(&self, operation: &str, argument: &str) -> Result<String, RuntimeError> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(RuntimeError::Terminated);
        }

        let (response_tx, response_rx) = oneshot::channel();

        self.cmd_tx
            .send(RuntimeCommand::Invoke(InvokeRequest {
                operation: operation.to_string(),
                argument: argument.to_string(),
                response_tx,
            }))
            .map_err(|_| RuntimeError::ChannelClosed)?;

        response_rx
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::Handler)
    }

    /// Terminate the runtime.
    pub fn terminate(&self) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return; // Already terminated
        }
        tracing::debug!(runtime = %self.name, "terminating runtime");
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }

    /// Check if the runtime has terminated.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Wait for the runtime thread to finish.
    pub fn join(self) -> Result<(), RuntimeError> {
        self.terminate();
        let handle = self.thread_handle.lock().map_or(None, |mut h| h.take());
        if let Some(handle) = handle {
            handle.join().map_err(|_| RuntimeError::ThreadPanic)?;
        }
        Ok(())
    }
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        self.terminate();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime Thread
// ─────────────────────────────────────────────────────────────────────────────

/// Spawn a runtime location hosting the given command handler.
///
/// Returns immediately; the event loop comes up asynchronously. Use
/// [`RuntimeHandle::started`] to observe start-up.
pub fn spawn<H: CommandHandler>(name: &str, handler: H) -> Result<RuntimeHandle, RuntimeError> {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (started_tx, started_rx) = watch::channel(false);
    let terminated = Arc::new(AtomicBool::new(false));

    let thread_name = format!("runtime-{name}");
    let runtime_name = name.to_string();
    let thread_terminated = terminated.clone();

    let thread_handle = thread::Builder::new()
        .name(thread_name)
        .spawn(move || {
            run_event_loop(&runtime_name, handler, cmd_rx, started_tx);
            thread_terminated.store(true, Ordering::SeqCst);
        })?;

    Ok(RuntimeHandle {
        name: name.to_string(),
        cmd_tx,
        started_rx,
        terminated,
        thread_handle: std::sync::Mutex::new(Some(thread_handle)),
    })
}

/// Body of the runtime thread: build the local event loop and serve commands
/// until shutdown.
fn run_event_loop<H: CommandHandler>(
    name: &str,
    handler: H,
    mut cmd_rx: mpsc::UnboundedReceiver<RuntimeCommand>,
    started_tx: watch::Sender<bool>,
) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(runtime = %name, error = %e, "failed to build runtime event loop");
            return;
        }
    };

    let handler = Arc::new(handler);
    let local = LocalSet::new();

    local.block_on(&rt, async move {
        tracing::info!(runtime = %name, "runtime event loop started");
        let _ = started_tx.send(true);

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                RuntimeCommand::Invoke(req) => {
                    let handler = handler.clone();
                    tokio::task::spawn_local(async move {
                        let result = handler.invoke(&req.operation, &req.argument).await;
                        // Caller may have given up (e.g. dispatch abandoned)
                        let _ = req.response_tx.send(result);
                    });
                }
                RuntimeCommand::Shutdown => break,
            }
        }
    });

    tracing::info!(runtime = %name, "runtime event loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use tokio_test::assert_ok;

    struct EchoHandler;

    #[async_trait]
    impl CommandHandler for EchoHandler {
        fn location(&self) -> &str {
            "test"
        }

        async fn invoke(&self, operation: &str, argument: &str) -> Result<String, HandlerError> {
            match operation {
                "ping" => Ok("pong".to_string()),
                "echo" => Ok(argument.to_string()),
                "slow" => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok("slow done".to_string())
                }
                "boom" => Err(HandlerError::Failed("exploded mid-execution".to_string())),
                other => Err(HandlerError::UnknownOperation(other.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_invoke_returns_result() {
        let runtime = spawn("test", EchoHandler).unwrap();
        assert_ok!(runtime.started().await);

        assert_eq!(runtime.invoke("ping", "").await.unwrap(), "pong");
        assert_eq!(runtime.invoke("echo", "hi").await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_unknown_operation_is_an_error() {
        let runtime = spawn("test", EchoHandler).unwrap();

        let err = runtime.invoke("nope", "").await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Handler(HandlerError::UnknownOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_handler_failure_surfaces_as_message() {
        let runtime = spawn("test", EchoHandler).unwrap();

        let err = runtime.invoke("boom", "").await.unwrap_err();
        assert!(err.to_string().contains("exploded mid-execution"));
    }

    #[tokio::test]
    async fn test_invoke_after_terminate_fails() {
        let runtime = spawn("test", EchoHandler).unwrap();
        runtime.started().await.unwrap();

        runtime.terminate();
        let err = runtime.invoke("ping", "").await.unwrap_err();
        assert!(matches!(err, RuntimeError::Terminated));
    }

    #[tokio::test]
    async fn test_slow_operation_does_not_block_fast_one() {
        let runtime = spawn("test", EchoHandler).unwrap();
        runtime.started().await.unwrap();

        let (slow, fast) = tokio::join!(
            async {
                let result = runtime.invoke("slow", "").await.unwrap();
                (result, Instant::now())
            },
            async {
                let result = runtime.invoke("ping", "").await.unwrap();
                (result, Instant::now())
            },
        );

        assert_eq!(slow.0, "slow done");
        assert_eq!(fast.0, "pong");
        // The fast invocation interleaves with the slow one instead of
        // queueing behind it.
        assert!(fast.1 < slow.1);
    }

    #[test]
    fn test_join_after_terminate() {
        let runtime = spawn("test", EchoHandler).unwrap();
        runtime.join().unwrap();
    }
}
