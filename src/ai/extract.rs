//! Model Output Extraction
//!
//! Locates the JSON payload in a model reply. Models often wrap JSON in
//! markdown code fences even when told not to:
//! - ```` ```json ... ``` ```` wins when present
//! - otherwise the first ```` ``` ... ``` ```` block
//! - otherwise the whole reply
//!
//! No repair is attempted. A payload that does not decode is the caller's
//! fallback case.

use serde::de::DeserializeOwned;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Slice of `content` that should hold the JSON payload, trimmed
pub fn extract_payload(content: &str) -> &str {
    let payload = if let Some(start) = content.find(JSON_FENCE) {
        until_fence(&content[start + JSON_FENCE.len()..])
    } else if let Some(start) = content.find(FENCE) {
        until_fence(&content[start + FENCE.len()..])
    } else {
        content
    };
    payload.trim()
}

/// Text up to the next fence, or the rest when the fence is never closed
fn until_fence(rest: &str) -> &str {
    rest.find(FENCE).map_or(rest, |end| &rest[..end])
}

/// Extract the payload and decode it
pub fn decode_payload<T: DeserializeOwned>(content: &str) -> serde_json::Result<T> {
    serde_json::from_str(extract_payload(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_json_fence_preferred() {
        let content = "Here:\n```python\nx = 1\n```\n```json\n{\"a\": 1}\n```\ndone";
        assert_eq!(extract_payload(content), "{\"a\": 1}");
    }

    #[test]
    fn test_bare_fence() {
        let content = "```\n{\"a\": 2}\n```";
        assert_eq!(extract_payload(content), "{\"a\": 2}");
    }

    #[test]
    fn test_raw_text() {
        assert_eq!(extract_payload("  {\"a\": 3}\n"), "{\"a\": 3}");
    }

    #[test]
    fn test_unclosed_fence_takes_rest() {
        assert_eq!(extract_payload("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_decode_payload() {
        let value: Value = decode_payload("```json\n[{\"name\": \"Slack\"}]\n```").unwrap();
        assert_eq!(value, json!([{"name": "Slack"}]));

        assert!(decode_payload::<Value>("no json here").is_err());
        assert!(decode_payload::<Value>("").is_err());
    }
}
