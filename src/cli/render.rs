//! Render and stripe command implementations

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::client::ColorClient;
use crate::config::{Config, RenderSettings};
use crate::mcp::tools::render::{check_response, generate_palette, success_message};
use crate::models::ColorSetResponse;
use crate::palette::render_palette;
use crate::worker::RenderPool;

use super::{runtime, StripeArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Fetch the palette of `image` and write it as a stripe PNG.
pub fn run_render(config: &Config, image: &Path, args: &StripeArgs) -> ExitCode {
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
    let pool = RenderPool::new(config.render.render_workers);

    let result =
        rt.block_on(generate_palette(&client, &config.render, &pool, image, args.render_request()));
    match result {
        Ok(path) => {
            println!("{}", success_message(&path));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Render a stripe PNG from a color API response saved as JSON.
pub fn run_stripe(settings: &RenderSettings, response_path: &Path, args: &StripeArgs) -> ExitCode {
    let raw = match fs::read_to_string(response_path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: Failed to read '{}': {}", response_path.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let response: ColorSetResponse = match serde_json::from_str(&raw) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: '{}' is not a color API response: {}", response_path.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    if let Err(e) = check_response(&response) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    match render_palette(&response, &args.render_request(), &settings.output_dir) {
        Ok(path) => {
            println!("{}", success_message(&path));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
