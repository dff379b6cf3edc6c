//! Host surface.
//!
//! The native host is an external collaborator: the dispatcher hands it
//! result text to insert into the document and owes it a completion signal
//! for every fired command. The core never inspects the host's
//! content-manipulation API.

mod token;

pub use token::{CompletionReceipt, CompletionToken};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Placement of an inserted text box, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBoxOptions {
    pub left: f64,
    pub top: f64,
    pub height: f64,
    pub width: f64,
}

impl TextBoxOptions {
    pub const fn new(left: f64, top: f64, height: f64, width: f64) -> Self {
        Self {
            left,
            top,
            height,
            width,
        }
    }
}

/// The host rejected or failed an insertion.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// UI text-insertion collaborator.
///
/// Failures are caught by the dispatcher and reduced to a logged message;
/// they never reach the host shell.
#[async_trait]
pub trait HostSink: Send + Sync {
    async fn insert_text(
        &self,
        text: &str,
        options: Option<TextBoxOptions>,
    ) -> Result<(), HostError>;
}

/// Host sink that logs insertions instead of driving a real document.
///
/// Used when the add-in runs outside the host shell (plain browser, demo
/// binary).
pub struct ConsoleHost;

#[async_trait]
impl HostSink for ConsoleHost {
    async fn insert_text(
        &self,
        text: &str,
        options: Option<TextBoxOptions>,
    ) -> Result<(), HostError> {
        let geometry = options
            .and_then(|o| serde_json::to_value(o).ok())
            .unwrap_or(serde_json::Value::Null);
        tracing::info!(%text, %geometry, "insert text box");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_host_accepts_inserts() {
        let host = ConsoleHost;
        host.insert_text("Hello World", Some(TextBoxOptions::new(255.0, 25.0, 50.0, 250.0)))
            .await
            .unwrap();
        host.insert_text("no geometry", None).await.unwrap();
    }
}
