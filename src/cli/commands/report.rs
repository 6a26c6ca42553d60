//! Report Command
//!
//! Renders a saved result (output of `check --json`) into a `.docx`.
//!
//! Usage:
//!   toolchecker report <RESULT_JSON> [-o FILE]

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::report::{generate_report, report_filename};
use crate::types::{ComplianceResult, Result};

pub fn run(input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let path = write_report(input, output)?;
    Output::new().success(&format!("Report written to {}", path.display()));
    Ok(path)
}

fn write_report(input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let content = fs::read_to_string(input)?;
    let result: ComplianceResult = serde_json::from_str(&content)?;

    let bytes = generate_report(&result)?;
    let path = output.unwrap_or_else(|| PathBuf::from(report_filename(&result.tool_name)));
    fs::write(&path, bytes)?;
    Ok(path)
}
