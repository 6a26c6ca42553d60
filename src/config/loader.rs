//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/toolchecker/config.toml)
//! 3. Project config (./toolchecker.toml, or an explicit path)
//! 4. Flat deployment variables (AZURE_OPENAI_API_KEY, ...)
//! 5. Environment variables (TOOLCHECKER_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{CheckerError, Result};

/// Deployment variable names and the config keys they populate
const DEPLOYMENT_ENV: &[(&str, &str)] = &[
    ("AZURE_OPENAI_API_KEY", "llm.api_key"),
    ("AZURE_OPENAI_ENDPOINT", "llm.endpoint"),
    ("AZURE_OPENAI_DEPLOYMENT", "llm.deployment"),
    ("AZURE_OPENAI_API_VERSION", "llm.api_version"),
    ("BING_SUBSCRIPTION_KEY", "search.bing_api_key"),
    ("AZURE_COMMUNICATION_CONNECTION_STRING", "email.connection_string"),
    ("AZURE_COMMUNICATION_SENDER", "email.sender"),
    ("LEAD_EMAIL_RECIPIENT", "email.recipient"),
    ("FRONTEND_URL", "server.frontend_url"),
];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project (or `explicit`) → deployment vars → prefixed env
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::project_config_path);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        } else if explicit.is_some() {
            return Err(CheckerError::Config(format!(
                "Config file not found: {}",
                project_path.display()
            )));
        }

        for (var, key) in DEPLOYMENT_ENV {
            if let Ok(value) = env::var(var)
                && !value.is_empty()
            {
                debug!("Applying {} from environment", var);
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        // e.g. TOOLCHECKER_LLM__DEPLOYMENT -> llm.deployment
        figment = figment.merge(Env::prefixed("TOOLCHECKER_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| CheckerError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CheckerError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/toolchecker/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("toolchecker"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("toolchecker.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration. Secrets are never included.
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| CheckerError::Config(e.to_string()))
        }
    }

    /// Write a commented default project config
    pub fn init_project(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::default_project_config())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_project_config() -> String {
        r#"# ToolChecker Configuration
# Secrets belong in the environment (.env), not in this file:
#   AZURE_OPENAI_API_KEY, BING_SUBSCRIPTION_KEY, AZURE_COMMUNICATION_CONNECTION_STRING

[server]
host = "0.0.0.0"
port = 8000
frontend_url = "http://localhost:5173"
serve_frontend = false
frontend_dir = "frontend/dist"

[llm]
provider = "azure-openai"
endpoint = ""
deployment = "gpt-4o"
api_version = "2024-12-01-preview"
temperature = 0.1
timeout_secs = 120
max_turns = 25
json_mode = true

[search]
provider = "auto"
max_results = 10

[fetch]
timeout_secs = 15
max_chars = 12000

[email]
sender = ""
recipient = "data.team@samhoud.com"

[store]
max_entries = 500
ttl_secs = 86400
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toolchecker.toml");
        fs::write(
            &path,
            "[llm]\ndeployment = \"gpt-4o-mini\"\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.deployment, "gpt-4o-mini");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.fetch.max_chars, 12_000);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toolchecker.toml");
        fs::write(&path, "[llm]\ntemperature = 5.0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");
        assert!(matches!(
            ConfigLoader::load(Some(&path)),
            Err(CheckerError::Config(_))
        ));
    }

    #[test]
    fn test_init_project_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toolchecker.toml");

        assert!(ConfigLoader::init_project(&path, false).unwrap());
        assert!(!ConfigLoader::init_project(&path, false).unwrap());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toolchecker.toml");
        fs::write(&path, "").unwrap();

        // SAFETY: This test runs in isolation
        unsafe {
            env::set_var("TOOLCHECKER_LLM__API_VERSION", "2099-01-01");
        }
        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.llm.api_version, "2099-01-01");
        unsafe {
            env::remove_var("TOOLCHECKER_LLM__API_VERSION");
        }
    }

    #[test]
    fn test_deployment_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toolchecker.toml");
        fs::write(&path, "").unwrap();

        // SAFETY: This test runs in isolation
        unsafe {
            env::set_var("LEAD_EMAIL_RECIPIENT", "leads@example.com");
        }
        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.email.recipient, "leads@example.com");
        unsafe {
            env::remove_var("LEAD_EMAIL_RECIPIENT");
        }
    }

    #[test]
    fn test_render_hides_secrets() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-hidden".to_string());

        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[llm]"));
        assert!(!toml.contains("sk-hidden"));

        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(!json.contains("sk-hidden"));
    }
}
