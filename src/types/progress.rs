//! Progress and request payloads exchanged with the API layer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::compliance::ComplianceResult;
use super::error::{CheckerError, Result};

/// Progress update relayed as a `progress` SSE event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub step: String,
    pub message: String,
    /// Fraction in [0, 1]
    pub progress: f32,
}

impl ProgressUpdate {
    pub fn new(step: impl Into<String>, message: impl Into<String>, progress: f32) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
            progress: progress.clamp(0.0, 1.0),
        }
    }
}

/// Item of the check stream
#[derive(Debug, Clone)]
pub enum CheckEvent {
    Progress(ProgressUpdate),
    Result(Box<ComplianceResult>),
}

/// Body of `/api/check` and `/api/report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub tool_name: String,
}

impl CheckRequest {
    pub fn validate(&self) -> Result<()> {
        if self.tool_name.trim().is_empty() {
            return Err(CheckerError::Validation(
                "tool_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Contact details captured when a report is downloaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub function: String,
    pub tool_name: String,
}

impl LeadRequest {
    pub fn validate(&self) -> Result<()> {
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(CheckerError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// Candidate returned by `/api/search-tool`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCandidate {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl ToolCandidate {
    /// Echo of the raw query, used whenever search or normalisation fails
    pub fn from_query(query: &str) -> Self {
        Self {
            name: query.trim().to_string(),
            url: String::new(),
            description: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(email: &str) -> LeadRequest {
        LeadRequest {
            name: "Jan".to_string(),
            email: email.to_string(),
            company: "Acme".to_string(),
            function: "CTO".to_string(),
            tool_name: "Slack".to_string(),
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(ProgressUpdate::new("x", "y", 1.5).progress, 1.0);
        assert_eq!(ProgressUpdate::new("x", "y", -0.2).progress, 0.0);
    }

    #[test]
    fn test_check_request_validation() {
        assert!(CheckRequest { tool_name: "Slack".into() }.validate().is_ok());
        assert!(CheckRequest { tool_name: "   ".into() }.validate().is_err());
    }

    #[test]
    fn test_lead_email_validation() {
        assert!(lead("jan@acme.nl").validate().is_ok());
        assert!(lead("jan@acme").validate().is_err());
        assert!(lead("not an email").validate().is_err());
        assert!(lead("").validate().is_err());
    }

    #[test]
    fn test_candidate_description_defaults() {
        let c: ToolCandidate = serde_json::from_str(r#"{"name": "Slack", "url": "https://slack.com"}"#).unwrap();
        assert_eq!(c.description, "");
        assert_eq!(ToolCandidate::from_query("  salck ").name, "salck");
    }
}
