//! Remote-first intent resolution with local fallback

use serde_json::Value;
use tracing::debug;

use super::{fallback_intent, Intent};
use crate::classifier::ClassifierClient;

/// Resolves utterances into intents
pub struct IntentResolver {
    classifier: ClassifierClient,
}

impl IntentResolver {
    pub fn new(classifier: ClassifierClient) -> Self {
        Self { classifier }
    }

    /// Resolve `text`, using `context` as conversation history for the
    /// classifier. Never fails.
    pub async fn resolve(&self, text: &str, context: &Value) -> Intent {
        if let Some(response) = self.classifier.interpret(text, context).await {
            return response.into();
        }

        let intent = fallback_intent(text);
        debug!(intent = %intent.name, "resolved with fallback rules");
        intent
    }
}
