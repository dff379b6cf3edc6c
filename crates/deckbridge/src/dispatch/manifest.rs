//! Command manifest.
//!
//! The host declares its ribbon commands in a manifest; each entry maps a
//! command identifier to a dispatcher entry point. Manifests are TOML on
//! disk; the built-in set mirrors the demo ribbon.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::host::TextBoxOptions;

use super::HELLO_BOX;

/// Demonstration argument passed to bridge operations when the manifest does
/// not override it.
pub const DEFAULT_ARGUMENT: &str = "Deck Fan";

fn default_argument() -> String {
    DEFAULT_ARGUMENT.to_string()
}

/// What firing a command does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum CommandAction {
    /// Insert fixed text into the document, no bridge involved.
    InsertText {
        text: String,
        #[serde(default)]
        options: Option<TextBoxOptions>,
    },
    /// Wait for a bridge and invoke a named operation on it.
    InvokeBridge {
        bridge: String,
        operation: String,
        #[serde(default = "default_argument")]
        argument: String,
    },
}

/// One manifest entry: a command identifier bound to an entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    pub id: String,
    #[serde(flatten)]
    pub action: CommandAction,
}

/// The full command surface declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandManifest {
    #[serde(default)]
    pub command: Vec<CommandBinding>,
}

/// Manifest loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CommandManifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a manifest from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// The built-in demo commands: a static hello box plus one bridge call
    /// per runtime location.
    pub fn builtin() -> Self {
        Self {
            command: vec![
                CommandBinding {
                    id: "insert-hello".to_string(),
                    action: CommandAction::InsertText {
                        text: "Hello World".to_string(),
                        options: Some(HELLO_BOX),
                    },
                },
                CommandBinding {
                    id: "call-wasm".to_string(),
                    action: CommandAction::InvokeBridge {
                        bridge: crate::bridge::WASM_BRIDGE.to_string(),
                        operation: "hello-home".to_string(),
                        argument: default_argument(),
                    },
                },
                CommandBinding {
                    id: "call-server".to_string(),
                    action: CommandAction::InvokeBridge {
                        bridge: crate::bridge::SERVER_BRIDGE.to_string(),
                        operation: "hello-counter".to_string(),
                        argument: default_argument(),
                    },
                },
            ],
        }
    }

    /// Index the bindings by command id. Later duplicates win, matching the
    /// host's associate-last-wins behavior.
    pub fn into_table(self) -> HashMap<String, CommandAction> {
        self.command
            .into_iter()
            .map(|binding| (binding.id, binding.action))
            .collect()
    }
}
