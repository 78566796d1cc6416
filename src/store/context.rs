//! Interaction history and user preferences

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::document::{load_document, save_document, StorageError};
use crate::config::Config;

/// Maximum number of interactions kept in the history
pub const MAX_HISTORY: usize = 50;

/// One completed turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(rename = "user")]
    pub user_text: String,
    #[serde(rename = "assistant")]
    pub assistant_reply: String,
    pub success: bool,
}

/// Persisted `context.json` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    #[serde(default)]
    pub history: Vec<InteractionRecord>,

    /// Keys this program does not manage, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContextDocument {
    /// Append a record, evicting the oldest beyond [`MAX_HISTORY`]
    pub fn push(&mut self, record: InteractionRecord) {
        self.history.push(record);
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }
}

/// Owns the context and preferences documents and their locations
pub struct ContextStore {
    context_path: PathBuf,
    preferences_path: PathBuf,
    context: ContextDocument,
    preferences: Value,
}

impl ContextStore {
    /// Load both documents, creating or resetting them as needed
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        let context_path = config.context_path();
        let preferences_path = config.preferences_path();

        let context = load_document(&context_path, ContextDocument::default())?;
        let preferences = load_document(
            &preferences_path,
            json!({ "name": config.name, "preferences": {} }),
        )?;

        debug!(
            history = context.history.len(),
            ?context_path,
            "context loaded"
        );

        Ok(Self {
            context_path,
            preferences_path,
            context,
            preferences,
        })
    }

    #[cfg(test)]
    pub fn history(&self) -> &[InteractionRecord] {
        &self.context.history
    }

    #[cfg(test)]
    pub fn preferences(&self) -> &Value {
        &self.preferences
    }

    /// Context as sent to the remote classifier
    pub fn context_value(&self) -> Value {
        serde_json::to_value(&self.context).unwrap_or_else(|_| json!({ "history": [] }))
    }

    /// Append one interaction to the bounded history
    pub fn record(&mut self, user_text: &str, assistant_reply: &str, success: bool) {
        self.context.push(InteractionRecord {
            user_text: user_text.to_string(),
            assistant_reply: assistant_reply.to_string(),
            success,
        });
    }

    /// Write context and preferences to disk
    pub fn persist(&self) -> Result<(), StorageError> {
        save_document(&self.context_path, &self.context)?;
        save_document(&self.preferences_path, &self.preferences)
    }
}
