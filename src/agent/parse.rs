//! Final answer → [`ComplianceResult`].

use tracing::warn;

use crate::ai::decode_payload;
use crate::types::ComplianceResult;

/// Decode the agent's final answer.
///
/// Any failure (malformed JSON, missing or mistyped field, unknown status)
/// yields [`ComplianceResult::inconclusive`] for `tool_name`. Never fails.
pub fn parse_compliance_result(content: &str, tool_name: &str) -> ComplianceResult {
    match decode_payload::<ComplianceResult>(content) {
        Ok(result) => {
            if result.understates_risk() {
                warn!(
                    tool = tool_name,
                    overall = %result.overall_status,
                    worst = ?result.worst_component_status(),
                    "Overall status is greener than its worst component"
                );
            }
            result
        }
        Err(e) => {
            warn!(
                tool = tool_name,
                error = %e,
                chars = content.len(),
                "Could not parse agent output, returning inconclusive result"
            );
            ComplianceResult::inconclusive(tool_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_DISCLAIMER, TrafficLight};

    const RESULT_JSON: &str = r#"{
        "tool_name": "Notion",
        "tool_url": "https://notion.so",
        "overall_status": "orange",
        "summary": "Data wordt deels in de VS verwerkt.",
        "categories": [{
            "name": "Dataopslag & Verwerking",
            "status": "orange",
            "summary": "VS met SCCs",
            "checks": [{
                "name": "Locatie",
                "description": "Waar wordt data opgeslagen?",
                "status": "orange",
                "finding": "AWS us-west-2",
                "sources": [{"url": "https://notion.so/privacy", "title": "Privacy", "quote": null}]
            }]
        }],
        "sub_processors": [{
            "name": "AWS",
            "purpose": "Hosting",
            "data_location": "VS",
            "status": "orange"
        }],
        "sources_consulted": [{"url": "https://notion.so/privacy", "title": "Privacy"}]
    }"#;

    fn assert_fallback(result: &ComplianceResult) {
        assert_eq!(result.tool_name, "Notion");
        assert_eq!(result.overall_status, TrafficLight::Orange);
        assert!(result.summary.starts_with("De analyse kon niet volledig worden afgerond."));
        assert!(result.categories.is_empty());
        assert!(result.sub_processors.is_empty());
        assert!(result.sources_consulted.is_empty());
    }

    #[test]
    fn test_fenced_bare_and_raw_are_equivalent() {
        let raw = parse_compliance_result(RESULT_JSON, "Notion");
        let json_fenced = parse_compliance_result(
            &format!("Hier is het resultaat:\n```json\n{}\n```", RESULT_JSON),
            "Notion",
        );
        let bare_fenced = parse_compliance_result(&format!("```\n{}\n```", RESULT_JSON), "Notion");

        assert_eq!(raw, json_fenced);
        assert_eq!(raw, bare_fenced);
        assert_eq!(raw.tool_url.as_deref(), Some("https://notion.so"));
        assert_eq!(raw.check_count(), 1);
        assert_eq!(raw.disclaimer, DEFAULT_DISCLAIMER);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_fallback(&parse_compliance_result("{\"tool_name\": \"Notion\",", "Notion"));
        assert_fallback(&parse_compliance_result("", "Notion"));
        assert_fallback(&parse_compliance_result("Sorry, ik kon niets vinden.", "Notion"));
    }

    #[test]
    fn test_missing_field_falls_back() {
        let content = r#"{"tool_name": "Notion", "overall_status": "green"}"#;
        assert_fallback(&parse_compliance_result(content, "Notion"));
    }

    #[test]
    fn test_invalid_status_falls_back() {
        let content = r#"{"tool_name": "Notion", "overall_status": "yellow", "summary": "?"}"#;
        assert_fallback(&parse_compliance_result(content, "Notion"));
    }

    #[test]
    fn test_understated_result_kept_as_is() {
        let content = RESULT_JSON.replacen(
            r#""overall_status": "orange""#,
            r#""overall_status": "green""#,
            1,
        );
        let result = parse_compliance_result(&content, "Notion");
        assert_eq!(result.overall_status, TrafficLight::Green);
        assert!(result.understates_risk());
    }
}
