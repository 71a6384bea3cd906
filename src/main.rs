//! palette-mcp - MCP server and CLI for image color palettes

use std::process::ExitCode;

use palette_mcp::cli;

fn main() -> ExitCode {
    cli::run()
}
