//! Actions module: executes resolved intents against the local system
//!
//! The assistant loop only depends on [`ActionDispatcher`]; the
//! [`SystemController`] is the production implementation.

mod controller;
mod handlers;

use async_trait::async_trait;

use crate::intent::Parameters;

pub use controller::SystemController;

/// Result of executing one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Executes an intent and reports the outcome. Never fails; problems are
/// reported through `ActionOutcome::success`.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn dispatch(&self, intent: &str, parameters: &Parameters) -> ActionOutcome;
}
