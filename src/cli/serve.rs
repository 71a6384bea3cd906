//! Serve command implementation

use std::process::ExitCode;

use crate::config::Config;
use crate::mcp::run_server;

use super::{runtime, EXIT_ERROR, EXIT_SUCCESS};

/// Start the MCP server and block until the host closes stdin.
pub fn run_serve(config: &Config) -> ExitCode {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    match rt.block_on(run_server(config)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "MCP server stopped");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
