//! Host command surface.
//!
//! Associates manifest-declared command identifiers with dispatcher entry
//! points, the way the host shell binds ribbon buttons to functions. Firing
//! any id completes the host token, even for ids the manifest never declared.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::host::CompletionToken;

use super::manifest::{CommandAction, CommandManifest};
use super::{CommandDispatcher, HELLO_BOX};

pub struct CommandSurface {
    dispatcher: Arc<CommandDispatcher>,
    commands: HashMap<String, CommandAction>,
}

impl CommandSurface {
    pub fn new(dispatcher: Arc<CommandDispatcher>, manifest: CommandManifest) -> Self {
        Self {
            dispatcher,
            commands: manifest.into_table(),
        }
    }

    /// Declared command identifiers, in no particular order.
    pub fn command_ids(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Fire a host command by identifier.
    ///
    /// Returns the outcome text. The token is completed on every path,
    /// including unknown identifiers: a manifest/runtime mismatch must never
    /// hang the host shell.
    pub async fn fire(&self, command_id: &str, token: CompletionToken) -> String {
        let Some(action) = self.commands.get(command_id) else {
            let message = format!("no command '{command_id}' in the manifest");
            error!(command = command_id, "fired unknown command");
            token.complete();
            return message;
        };

        match action.clone() {
            CommandAction::InsertText { text, options } => {
                self.dispatcher
                    .insert_static(&text, options.unwrap_or(HELLO_BOX), token)
                    .await;
                text
            }
            CommandAction::InvokeBridge {
                bridge,
                operation,
                argument,
            } => {
                self.dispatcher
                    .dispatch(&bridge, &operation, &argument, token)
                    .await
            }
        }
    }
}
