//! MCP (Model Context Protocol) server
//!
//! Exposes palette extraction and palette rendering as MCP tools so AI
//! models can inspect the colors of local images and turn them into
//! stripe images.
//!
//! Start the server with `palette-mcp serve` (the default command).

mod server;
pub mod tools;

pub use server::{run_server, PaletteMcpServer};
