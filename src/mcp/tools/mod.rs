//! MCP tool definitions
//!
//! Each tool wraps a library operation and returns plain text, so failures
//! reach the calling model as readable messages instead of protocol errors.

pub mod palettes;
pub mod render;
