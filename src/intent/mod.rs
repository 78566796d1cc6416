//! Intent module: turns free text into a structured command
//!
//! Resolution tries the remote classifier first and falls back to a
//! deterministic prefix table when it is unavailable.

mod fallback;
mod resolver;

use serde_json::{Map, Value};

use crate::classifier::InterpretResponse;

pub use fallback::fallback_intent;
pub use resolver::IntentResolver;

/// Named intent arguments
pub type Parameters = Map<String, Value>;

/// A resolved command, consumed once by dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub name: String,
    pub parameters: Parameters,
    /// Reply to show instead of the action message, if any
    pub suggested_reply: Option<String>,
}

impl Intent {
    pub fn new(name: &str, parameters: Parameters) -> Self {
        Self {
            name: name.to_string(),
            parameters,
            suggested_reply: None,
        }
    }
}

impl From<InterpretResponse> for Intent {
    fn from(response: InterpretResponse) -> Self {
        Self {
            name: response.intent,
            parameters: response.parameters,
            suggested_reply: Some(response.reply).filter(|reply| !reply.is_empty()),
        }
    }
}
