//! Serve Command
//!
//! Runs the HTTP API until interrupted.

use crate::api;
use crate::cli::Output;
use crate::config::Config;
use crate::types::Result;

pub async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    Output::new().info(&format!(
        "Serving ToolChecker on http://{}:{} (Ctrl-C to stop)",
        config.server.host, config.server.port
    ));
    api::serve(&config).await
}
