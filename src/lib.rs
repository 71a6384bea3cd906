//! palette-mcp - Image color palettes for MCP hosts
//!
//! This library provides functionality to:
//! - Fetch the dominant colors of a local image from a color-extraction API
//! - Lay out a weighted color list as proportional vertical stripes
//! - Write the stripes as a PNG palette image
//! - Serve both operations as MCP tools over stdio

pub mod cli;
pub mod client;
pub mod color;
pub mod config;
pub mod mcp;
pub mod models;
pub mod output;
pub mod palette;
pub mod worker;
