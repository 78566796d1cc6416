//! Rule-based intent matching used when the classifier is unavailable

use serde_json::Value;

use super::{Intent, Parameters};

/// How the text after a matched prefix becomes parameters
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// Trimmed remainder under a single key
    Single(&'static str),
    /// Remainder split on the first " to " into source and destination
    SourceDestination,
    /// No parameters
    Nothing,
}

/// Prefix table, first match wins
const RULES: &[(&str, &str, Extract)] = &[
    ("open ", "open_app", Extract::Single("name")),
    ("close ", "close_app", Extract::Single("name")),
    ("browse ", "browse", Extract::Single("url")),
    ("create file ", "create_file", Extract::Single("path")),
    ("delete file ", "delete_file", Extract::Single("path")),
    ("move file ", "move_file", Extract::SourceDestination),
    ("copy file ", "copy_file", Extract::SourceDestination),
    ("search files ", "search_files", Extract::Single("query")),
    ("shutdown", "shutdown", Extract::Nothing),
    ("restart", "restart", Extract::Nothing),
    ("lock", "lock", Extract::Nothing),
];

/// Match `text` against the prefix table
pub fn fallback_intent(text: &str) -> Intent {
    for (prefix, name, extract) in RULES {
        if let Some(remainder) = strip_prefix_ignore_case(text, prefix) {
            return Intent::new(name, extract_parameters(*extract, remainder));
        }
    }

    let mut parameters = Parameters::new();
    parameters.insert("text".into(), Value::String(text.to_string()));
    Intent::new("unknown", parameters)
}

/// Case-insensitive prefix strip that keeps the original casing of the rest
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn extract_parameters(extract: Extract, remainder: &str) -> Parameters {
    let mut parameters = Parameters::new();
    match extract {
        Extract::Single(key) => {
            parameters.insert(key.into(), remainder.trim().into());
        }
        Extract::SourceDestination => {
            let (source, destination) = remainder
                .split_once(" to ")
                .unwrap_or((remainder, ""));
            parameters.insert("source".into(), source.trim().into());
            parameters.insert("destination".into(), destination.trim().into());
        }
        Extract::Nothing => {}
    }
    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(intent: &Intent) -> Value {
        Value::Object(intent.parameters.clone())
    }

    #[test]
    fn test_open_keeps_original_case() {
        let intent = fallback_intent("open Notepad");
        assert_eq!(intent.name, "open_app");
        assert_eq!(params(&intent), json!({ "name": "Notepad" }));
        assert_eq!(intent.suggested_reply, None);
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let intent = fallback_intent("OPEN  Firefox ");
        assert_eq!(intent.name, "open_app");
        assert_eq!(params(&intent), json!({ "name": "Firefox" }));
    }

    #[test]
    fn test_single_parameter_rules() {
        let cases = [
            ("close Slack", "close_app", json!({ "name": "Slack" })),
            ("browse example.com", "browse", json!({ "url": "example.com" })),
            ("create file notes/todo.txt", "create_file", json!({ "path": "notes/todo.txt" })),
            ("Delete File old.log", "delete_file", json!({ "path": "old.log" })),
            ("search files Report", "search_files", json!({ "query": "Report" })),
        ];
        for (text, name, expected) in cases {
            let intent = fallback_intent(text);
            assert_eq!(intent.name, name, "{text}");
            assert_eq!(params(&intent), expected, "{text}");
        }
    }

    #[test]
    fn test_move_file_with_destination() {
        let intent = fallback_intent("move file a.txt to b.txt");
        assert_eq!(intent.name, "move_file");
        assert_eq!(params(&intent), json!({ "source": "a.txt", "destination": "b.txt" }));
    }

    #[test]
    fn test_move_file_without_destination() {
        let intent = fallback_intent("move file a.txt");
        assert_eq!(params(&intent), json!({ "source": "a.txt", "destination": "" }));
    }

    #[test]
    fn test_copy_file_splits_on_first_to() {
        let intent = fallback_intent("copy file notes to self.txt to backup/");
        assert_eq!(intent.name, "copy_file");
        assert_eq!(
            params(&intent),
            json!({ "source": "notes", "destination": "self.txt to backup/" })
        );
    }

    #[test]
    fn test_bare_commands() {
        for (text, name) in [
            ("shutdown", "shutdown"),
            ("Shutdown now", "shutdown"),
            ("restart", "restart"),
            ("lock", "lock"),
            ("lock the screen", "lock"),
        ] {
            let intent = fallback_intent(text);
            assert_eq!(intent.name, name, "{text}");
            assert!(intent.parameters.is_empty());
        }
    }

    #[test]
    fn test_prefix_requires_trailing_space() {
        let intent = fallback_intent("opennotepad");
        assert_eq!(intent.name, "unknown");
    }

    #[test]
    fn test_unknown_text() {
        let intent = fallback_intent("foo bar");
        assert_eq!(intent.name, "unknown");
        assert_eq!(params(&intent), json!({ "text": "foo bar" }));
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        let intent = fallback_intent("ö");
        assert_eq!(intent.name, "unknown");
        let intent = fallback_intent("open café");
        assert_eq!(params(&intent), json!({ "name": "café" }));
    }
}
