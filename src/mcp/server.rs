//! Core MCP server implementation.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};

use super::tools::palettes::{run_get_palette, GetPaletteInput};
use super::tools::render::{run_generate_palette, GeneratePaletteInput};
use crate::client::ColorClient;
use crate::config::{Config, RenderSettings};
use crate::worker::RenderPool;

/// The palette MCP server
///
/// Holds only immutable shared state; every tool call works on its own
/// request and response.
#[derive(Debug, Clone)]
pub struct PaletteMcpServer {
    client: Arc<ColorClient>,
    settings: Arc<RenderSettings>,
    pool: RenderPool,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PaletteMcpServer {
    pub fn new(client: ColorClient, settings: RenderSettings) -> Self {
        let pool = RenderPool::new(settings.render_workers);
        Self {
            client: Arc::new(client),
            settings: Arc::new(settings),
            pool,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "get_img_palette_tool",
        description = "Get the dominant color palette of a local image. Returns the color \
                       extraction result as JSON: background, foreground and whole-image colors \
                       with html_code and percent, plus object_percentage. On failure returns \
                       {\"error\": \"...\"}."
    )]
    async fn get_img_palette_tool(
        &self,
        Parameters(input): Parameters<GetPaletteInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = run_get_palette(&self.client, input).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "generate_palette_img_tool",
        description = "Extract the color palette of a local image and save it as a PNG of \
                       vertical stripes, heaviest color first, each stripe an equal share of the \
                       width. Returns a message with the path of the written image."
    )]
    async fn generate_palette_img_tool(
        &self,
        Parameters(input): Parameters<GeneratePaletteInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = run_generate_palette(&self.client, &self.settings, &self.pool, input).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PaletteMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "palette-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Palette MCP server — use get_img_palette_tool to inspect the dominant colors \
                 of a local image and generate_palette_img_tool to save them as a stripe PNG."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server on stdin/stdout
pub async fn run_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = ColorClient::new(config)?;
    tracing::info!(
        endpoint = client.endpoint(),
        output_dir = %config.render.output_dir.display(),
        render_workers = config.render.render_workers,
        "Starting palette MCP server on stdio"
    );
    let server = PaletteMcpServer::new(client, config.render.clone());
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
