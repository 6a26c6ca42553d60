//! Config Command
//!
//! Usage:
//!   toolchecker config show [-f toml|json]
//!   toolchecker config path
//!   toolchecker config init [--force]

use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::{CheckerError, Result};

/// Print the effective (merged) configuration
pub fn show(config: &Config, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" => false,
        other => {
            return Err(CheckerError::Config(format!(
                "Unknown format '{other}'. Valid values: toml, json"
            )));
        }
    };

    println!("{}", ConfigLoader::render(config, as_json)?);
    Ok(())
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write `toolchecker.toml` in the current directory
pub fn init(force: bool) -> Result<()> {
    let output = Output::new();
    let path = ConfigLoader::project_config_path();

    if ConfigLoader::init_project(&path, force)? {
        output.success(&format!("Created {}", path.display()));
    } else {
        output.warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
