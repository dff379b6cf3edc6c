//! Server-side command handler.

use async_trait::async_trait;

use deckbridge_runtime::{CommandHandler, HandlerError};

/// Operations answered by the server-hosted runtime location.
pub struct ServerCommandHandler;

#[async_trait]
impl CommandHandler for ServerCommandHandler {
    fn location(&self) -> &str {
        "server"
    }

    async fn invoke(&self, operation: &str, argument: &str) -> Result<String, HandlerError> {
        tracing::debug!(operation, argument, "invoking server operation");
        match operation {
            "hello-counter" => Ok(format!(
                "Hello Counter, {argument} from the server runtime Counter page!"
            )),
            "whoami" => Ok("server runtime".to_string()),
            other => Err(HandlerError::UnknownOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hello_counter_greets_by_name() {
        let result = ServerCommandHandler
            .invoke("hello-counter", "Presenter")
            .await
            .unwrap();
        assert!(result.contains("Presenter"));
        assert!(result.contains("server runtime"));
    }

    #[tokio::test]
    async fn test_unknown_operation_fails() {
        let err = ServerCommandHandler.invoke("nope", "").await.unwrap_err();
        assert!(matches!(err, HandlerError::UnknownOperation(_)));
    }
}
