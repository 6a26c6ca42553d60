//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/toolchecker/config.toml)
//! 3. Project config (./toolchecker.toml)
//! 4. Deployment environment variables (AZURE_OPENAI_*, BING_*, ...)
//! 5. Prefixed environment variables (TOOLCHECKER_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
