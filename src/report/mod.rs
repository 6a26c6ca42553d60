//! Compliance Report
//!
//! Word (DOCX) rendering of a finished check for download.

mod content;
mod generator;

pub use content::{recommendations, status_label};

use chrono::{Local, NaiveDateTime};

use crate::constants::report::FILENAME_PREFIX;
use crate::types::{ComplianceResult, Result};

/// Render the report stamped with the current local time
pub fn generate_report(result: &ComplianceResult) -> Result<Vec<u8>> {
    render_report(result, Local::now().naive_local())
}

/// Render the report with an explicit generation timestamp
pub fn render_report(result: &ComplianceResult, generated_at: NaiveDateTime) -> Result<Vec<u8>> {
    generator::render(result, generated_at)
}

/// `compliance-rapport-<slug>.docx`, safe for a Content-Disposition header
pub fn report_filename(tool_name: &str) -> String {
    let slug: String = tool_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    let slug = if slug.trim_matches(['-', '.']).is_empty() {
        "tool".to_string()
    } else {
        slug
    };

    format!("{FILENAME_PREFIX}{slug}.docx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryResult, CheckResult, Source, SubProcessor, TrafficLight};
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn source(n: usize) -> Source {
        Source {
            url: format!("https://example.com/privacy/{n}"),
            title: format!("Privacy policy deel {n}"),
            quote: Some(format!("Data wordt opgeslagen in regio {n}.")),
        }
    }

    fn detailed_result() -> ComplianceResult {
        let categories = ["Dataopslag & Verwerking", "Datarechten (AVG)", "Beveiliging"]
            .iter()
            .enumerate()
            .map(|(i, name)| CategoryResult {
                name: name.to_string(),
                status: TrafficLight::Orange,
                summary: format!("Samenvatting voor {name}"),
                checks: (0..3)
                    .map(|j| CheckResult {
                        name: format!("Check {i}.{j}"),
                        description: "Beschrijving".to_string(),
                        status: TrafficLight::Green,
                        finding: format!("Bevinding {i}.{j} met details over de verwerking."),
                        sources: vec![source(i * 3 + j)],
                    })
                    .collect(),
            })
            .collect();

        ComplianceResult {
            tool_name: "Slack".to_string(),
            tool_url: Some("https://slack.com".to_string()),
            overall_status: TrafficLight::Red,
            summary: "Slack verwerkt data deels buiten de EU.".to_string(),
            categories,
            sub_processors: vec![SubProcessor {
                name: "Amazon Web Services".to_string(),
                purpose: "Hosting".to_string(),
                data_location: "VS".to_string(),
                status: TrafficLight::Red,
                source: Some(source(99)),
            }],
            sources_consulted: (0..5).map(source).collect(),
            ..ComplianceResult::inconclusive("Slack")
        }
    }

    #[test]
    fn test_renders_docx_archive() {
        let bytes = render_report(&ComplianceResult::inconclusive("Notion"), at()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_detailed_result_produces_larger_document() {
        let minimal = render_report(&ComplianceResult::inconclusive("Slack"), at()).unwrap();
        let detailed = render_report(&detailed_result(), at()).unwrap();
        assert!(detailed.len() > minimal.len());
    }

    #[test]
    fn test_generate_report_uses_current_time() {
        let bytes = generate_report(&detailed_result()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename("Slack"), "compliance-rapport-slack.docx");
        assert_eq!(
            report_filename("  Google Workspace "),
            "compliance-rapport-google-workspace.docx"
        );
        assert_eq!(
            report_filename("Miro \"Boards\"/v2"),
            "compliance-rapport-miro-boardsv2.docx"
        );
        assert_eq!(report_filename("日本"), "compliance-rapport-tool.docx");
    }
}
