use console::{StyledObject, style};

use crate::types::{ComplianceResult, ProgressUpdate, TrafficLight};

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors and final results
    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// `[ 45%] message` line, written to stderr so stdout stays clean for JSON
    pub fn progress(&self, update: &ProgressUpdate) {
        if !self.quiet {
            eprintln!(
                "{} {}",
                style(format!("[{:>3.0}%]", update.progress * 100.0)).dim(),
                update.message
            );
        }
    }

    /// Human-readable summary of a finished check
    pub fn result(&self, result: &ComplianceResult) {
        self.header(&format!("{}: {}", result.tool_name, status(result.overall_status)));
        println!("{}", result.summary);

        for category in &result.categories {
            self.section(&format!("{} ({})", category.name, status(category.status)));
            println!("{}", category.summary);
            for check in &category.checks {
                println!("  {} {}", status(check.status), check.name);
                println!("      {}", style(&check.finding).dim());
            }
        }

        if !result.sub_processors.is_empty() {
            self.section("Sub-verwerkers");
            for sub in &result.sub_processors {
                println!(
                    "  {} {} ({}, {})",
                    status(sub.status),
                    sub.name,
                    sub.purpose,
                    sub.data_location
                );
            }
        }

        println!("\n{}", style(&result.disclaimer).italic().dim());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Status word in its traffic-light colour
pub fn status(status: TrafficLight) -> StyledObject<&'static str> {
    let word = match status {
        TrafficLight::Green => "GROEN",
        TrafficLight::Orange => "ORANJE",
        TrafficLight::Red => "ROOD",
    };
    match status {
        TrafficLight::Green => style(word).green().bold(),
        TrafficLight::Orange => style(word).yellow().bold(),
        TrafficLight::Red => style(word).red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_words() {
        assert_eq!(status(TrafficLight::Green).force_styling(false).to_string(), "GROEN");
        assert_eq!(status(TrafficLight::Orange).force_styling(false).to_string(), "ORANJE");
        assert_eq!(status(TrafficLight::Red).force_styling(false).to_string(), "ROOD");
    }
}
