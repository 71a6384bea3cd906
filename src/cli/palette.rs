//! Palette command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::client::ColorClient;
use crate::config::Config;
use crate::mcp::tools::palettes::to_pretty_json;
use crate::models::STATUS_SUCCESS;

use super::{runtime, EXIT_ERROR, EXIT_SUCCESS};

/// Print the palette of `image` as JSON, in the same shape the MCP tool returns.
pub fn run_palette(config: &Config, image: &Path) -> ExitCode {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    let client = match ColorClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match rt.block_on(client.fetch_raw(image)) {
        Ok(response) => {
            println!("{}", to_pretty_json(&response));
            if response["status"]["type"] == STATUS_SUCCESS {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            println!("{}", to_pretty_json(&e.to_json()));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
