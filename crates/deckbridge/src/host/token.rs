//! Host completion tokens.

use tokio::sync::oneshot;

/// Completion signal owed to the host shell for one fired command.
///
/// Consumed by value, so a token completes at most once; the dispatcher
/// completes it on every path. Host add-in shells tend to hang their command
/// surface when a command never reports completion.
pub struct CompletionToken {
    command: String,
    tx: oneshot::Sender<()>,
}

impl CompletionToken {
    /// Create a token and the receipt the host shell keeps.
    pub fn new(command: impl Into<String>) -> (Self, CompletionReceipt) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                command: command.into(),
                tx,
            },
            CompletionReceipt { rx },
        )
    }

    /// Command identifier this token belongs to.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Report completion to the host shell.
    pub fn complete(self) {
        tracing::debug!(command = %self.command, "host command completed");
        let _ = self.tx.send(());
    }
}

/// The host shell's side of a completion token.
pub struct CompletionReceipt {
    rx: oneshot::Receiver<()>,
}

impl CompletionReceipt {
    /// Resolve once the paired token completes. `false` means the token was
    /// dropped without completing, which is a dispatcher bug.
    pub async fn completed(self) -> bool {
        self.rx.await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_resolves_receipt() {
        let (token, receipt) = CompletionToken::new("call-server");
        assert_eq!(token.command(), "call-server");

        token.complete();
        assert!(receipt.completed().await);
    }

    #[tokio::test]
    async fn test_dropped_token_is_observable() {
        let (token, receipt) = CompletionToken::new("call-server");
        drop(token);
        assert!(!receipt.completed().await);
    }
}
