//! Compliance Result Model
//!
//! The structured assessment produced by a check. Field names match the JSON
//! the agent is instructed to emit, so the same types decode the model output
//! and serialize the `result` SSE event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Disclaimer attached to every result unless the model supplies its own
pub const DEFAULT_DISCLAIMER: &str = "Dit is een initiële indicatie op basis van publiek beschikbare informatie. \
Dit rapport vormt geen juridisch advies. Raadpleeg een Functionaris \
Gegevensbescherming (FG) voor een definitieve beoordeling.";

fn default_disclaimer() -> String {
    DEFAULT_DISCLAIMER.to_string()
}

/// Traffic-light classification, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Orange,
    Red,
}

impl TrafficLight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }

    /// Most severe status in the iterator, `None` when empty
    pub fn worst(statuses: impl IntoIterator<Item = TrafficLight>) -> Option<TrafficLight> {
        statuses.into_iter().max()
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrafficLight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "orange" => Ok(Self::Orange),
            "red" => Ok(Self::Red),
            _ => Err(format!(
                "Unknown status: {}. Valid values: green, orange, red",
                s
            )),
        }
    }
}

/// A page the agent consulted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub quote: Option<String>,
}

/// Outcome of a single checklist item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub status: TrafficLight,
    pub finding: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A third party processing data on behalf of the checked tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubProcessor {
    pub name: String,
    pub purpose: String,
    pub data_location: String,
    pub status: TrafficLight,
    #[serde(default)]
    pub source: Option<Source>,
}

/// A group of checks (data storage, data rights, security)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub name: String,
    pub status: TrafficLight,
    pub summary: String,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
}

/// Full assessment for one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub tool_name: String,
    #[serde(default)]
    pub tool_url: Option<String>,
    pub overall_status: TrafficLight,
    pub summary: String,
    #[serde(default)]
    pub categories: Vec<CategoryResult>,
    #[serde(default)]
    pub sub_processors: Vec<SubProcessor>,
    #[serde(default)]
    pub sources_consulted: Vec<Source>,
    #[serde(default = "default_disclaimer")]
    pub disclaimer: String,
}

impl ComplianceResult {
    /// Orange result returned whenever the agent output cannot be used
    pub fn inconclusive(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_url: None,
            overall_status: TrafficLight::Orange,
            summary: "De analyse kon niet volledig worden afgerond. \
                Raadpleeg een FG voor een handmatige beoordeling."
                .to_string(),
            categories: Vec::new(),
            sub_processors: Vec::new(),
            sources_consulted: Vec::new(),
            disclaimer: default_disclaimer(),
        }
    }

    /// Worst status across categories and sub-processors
    pub fn worst_component_status(&self) -> Option<TrafficLight> {
        TrafficLight::worst(
            self.categories
                .iter()
                .map(|c| c.status)
                .chain(self.sub_processors.iter().map(|s| s.status)),
        )
    }

    /// True when the overall status is greener than some component.
    ///
    /// The rule is part of the agent instructions; results that break it are
    /// reported as-is.
    pub fn understates_risk(&self) -> bool {
        self.worst_component_status()
            .is_some_and(|worst| self.overall_status < worst)
    }

    /// Number of individual checks across all categories
    pub fn check_count(&self) -> usize {
        self.categories.iter().map(|c| c.checks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(status: TrafficLight) -> CategoryResult {
        CategoryResult {
            name: "Beveiliging".to_string(),
            status,
            summary: "ok".to_string(),
            checks: Vec::new(),
        }
    }

    #[test]
    fn test_traffic_light_ordering() {
        assert!(TrafficLight::Green < TrafficLight::Orange);
        assert!(TrafficLight::Orange < TrafficLight::Red);
        assert_eq!(
            TrafficLight::worst([TrafficLight::Green, TrafficLight::Red, TrafficLight::Orange]),
            Some(TrafficLight::Red)
        );
        assert_eq!(TrafficLight::worst([]), None);
    }

    #[test]
    fn test_traffic_light_serde() {
        assert_eq!(
            serde_json::to_string(&TrafficLight::Orange).unwrap(),
            "\"orange\""
        );
        assert!(serde_json::from_str::<TrafficLight>("\"purple\"").is_err());
        assert_eq!("RED".parse::<TrafficLight>().unwrap(), TrafficLight::Red);
    }

    #[test]
    fn test_minimal_result_uses_defaults() {
        let json = r#"{"tool_name": "Slack", "overall_status": "green", "summary": "Prima"}"#;
        let result: ComplianceResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.tool_url, None);
        assert!(result.categories.is_empty());
        assert!(result.sources_consulted.is_empty());
        assert_eq!(result.disclaimer, DEFAULT_DISCLAIMER);
    }

    #[test]
    fn test_inconclusive_result() {
        let result = ComplianceResult::inconclusive("Notion");
        assert_eq!(result.tool_name, "Notion");
        assert_eq!(result.overall_status, TrafficLight::Orange);
        assert!(result.summary.contains("niet volledig"));
        assert!(result.categories.is_empty());
        assert!(result.sub_processors.is_empty());
    }

    #[test]
    fn test_understates_risk() {
        let mut result = ComplianceResult::inconclusive("Zoom");
        result.overall_status = TrafficLight::Green;
        assert!(!result.understates_risk());

        result.categories.push(category(TrafficLight::Red));
        assert!(result.understates_risk());
        assert_eq!(result.worst_component_status(), Some(TrafficLight::Red));

        result.overall_status = TrafficLight::Red;
        assert!(!result.understates_risk());
    }
}
