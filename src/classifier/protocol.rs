//! Remote classifier message definitions
//!
//! Requests are POSTed as JSON to `<base>/interpret`; every response
//! field is optional on the wire and defaulted here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::Parameters;

/// Body sent to the classifier
#[derive(Debug, Clone, Serialize)]
pub struct InterpretRequest<'a> {
    /// Raw utterance text
    pub text: &'a str,

    /// Interaction context document, passed through as-is
    pub context: &'a Value,
}

/// Classification returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterpretResponse {
    #[serde(default = "unknown_intent")]
    pub intent: String,

    #[serde(default)]
    pub parameters: Parameters,

    #[serde(default)]
    pub reply: String,
}

fn unknown_intent() -> String {
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let context = json!({ "history": [] });
        let req = InterpretRequest {
            text: "open notepad",
            context: &context,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, json!({ "text": "open notepad", "context": { "history": [] } }));
    }

    #[test]
    fn test_response_defaults() {
        let resp: InterpretResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.intent, "unknown");
        assert!(resp.parameters.is_empty());
        assert_eq!(resp.reply, "");
    }

    #[test]
    fn test_response_full() {
        let resp: InterpretResponse = serde_json::from_str(
            r#"{"intent":"browse","parameters":{"url":"example.com"},"reply":"Sure."}"#,
        )
        .unwrap();
        assert_eq!(resp.intent, "browse");
        assert_eq!(resp.parameters["url"], "example.com");
        assert_eq!(resp.reply, "Sure.");
    }

    #[test]
    fn test_response_with_wrong_types_is_malformed() {
        let result = serde_json::from_str::<InterpretResponse>(r#"{"parameters":[1,2]}"#);
        assert!(result.is_err());
    }
}
