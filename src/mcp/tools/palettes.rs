//! MCP get_img_palette_tool — fetch the color palette of an image as JSON.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::client::ColorClient;

/// Input parameters for the get_img_palette_tool tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPaletteInput {
    #[schemars(description = "Path to a local image file to analyze")]
    pub image_path: String,
}

/// Fetch the palette for `input.image_path`.
///
/// Returns the API response, or `{"error": "..."}` when the call failed,
/// as JSON text indented by four spaces.
pub async fn run_get_palette(client: &ColorClient, input: GetPaletteInput) -> String {
    match client.fetch_raw(Path::new(&input.image_path)).await {
        Ok(response) => to_pretty_json(&response),
        Err(e) => {
            tracing::error!(image = %input.image_path, error = %e, "Palette fetch failed");
            to_pretty_json(&e.to_json())
        }
    }
}

/// Serialize with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => format!("{{\"error\": \"failed to serialize response: {}\"}}", e),
    }
}
