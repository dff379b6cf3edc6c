//! Client-side (in-page) command handler.

use async_trait::async_trait;

use deckbridge_runtime::{CommandHandler, HandlerError};

use super::home;

/// Operations answered by the in-page runtime location.
pub struct ClientCommandHandler;

#[async_trait]
impl CommandHandler for ClientCommandHandler {
    fn location(&self) -> &str {
        "wasm"
    }

    async fn invoke(&self, operation: &str, argument: &str) -> Result<String, HandlerError> {
        tracing::debug!(operation, argument, "invoking client operation");
        match operation {
            "hello-wasm" => Ok(format!(
                "Hello WASM, {argument} from the in-page client handler!"
            )),
            // Delegates to the shared home-page logic, then brands the result
            // with this runtime location.
            "hello-home" => Ok(format!(
                "{} from the wasm runtime Home page!",
                home::greet(argument)
            )),
            "whoami" => Ok("wasm runtime".to_string()),
            other => Err(HandlerError::UnknownOperation(other.to_string())),
        }
    }
}
