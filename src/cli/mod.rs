//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations. With no subcommand the MCP server
//! is started, which is how MCP hosts launch the binary.

mod palette;
mod render;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RenderSettings};
use crate::models::ColorKey;
use crate::palette::{RenderRequest, DEFAULT_HEIGHT, DEFAULT_MAX_COLORS, DEFAULT_WIDTH};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// palette-mcp - Image color palettes for MCP hosts
#[derive(Parser)]
#[command(name = "palette-mcp")]
#[command(about = "Fetch dominant-color palettes of images and render them as stripe PNGs")]
#[command(version)]
pub struct Cli {
    /// .env file consulted for settings missing from the process environment
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP (Model Context Protocol) server on stdin/stdout (default)
    Serve,

    /// Print the color palette of an image as JSON
    Palette {
        /// Image file to analyze
        image: PathBuf,
    },

    /// Fetch the palette of an image and render it as a stripe PNG
    Render {
        /// Image file to analyze
        image: PathBuf,

        #[command(flatten)]
        stripe: StripeArgs,
    },

    /// Render a stripe PNG from a saved color API response (no network access)
    Stripe {
        /// JSON file holding a color API response
        response: PathBuf,

        #[command(flatten)]
        stripe: StripeArgs,
    },
}

/// Options shared by the commands that write a palette image.
#[derive(Args, Debug, Clone)]
pub struct StripeArgs {
    /// Output PNG path. If omitted: {output_dir}/img_{color_key}_{timestamp}.png
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Color category to render
    #[arg(long, value_enum, default_value_t = ColorKey::ImageColors)]
    pub color_key: ColorKey,

    /// Maximum number of stripes
    #[arg(long, default_value_t = DEFAULT_MAX_COLORS as u32, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_colors: u32,

    /// Image width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..=16384))]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..=16384))]
    pub height: u32,
}

impl StripeArgs {
    pub fn render_request(&self) -> RenderRequest {
        RenderRequest {
            color_key: self.color_key,
            max_colors: self.max_colors as usize,
            width: self.width,
            height: self.height,
            output_path: self.output.clone(),
        }
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => match load_config(&cli.env_file) {
            Ok(config) => serve::run_serve(&config),
            Err(code) => code,
        },
        Commands::Palette { image } => match load_config(&cli.env_file) {
            Ok(config) => palette::run_palette(&config, &image),
            Err(code) => code,
        },
        Commands::Render { image, stripe } => match load_config(&cli.env_file) {
            Ok(config) => render::run_render(&config, &image, &stripe),
            Err(code) => code,
        },
        Commands::Stripe { response, stripe } => match RenderSettings::load(&cli.env_file) {
            Ok(settings) => render::run_stripe(&settings, &response, &stripe),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_INVALID_ARGS)
            }
        },
    }
}

/// Logs go to stderr: stdout carries the MCP protocol.
fn init_tracing() {
    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(env_file: &std::path::Path) -> Result<Config, ExitCode> {
    Config::load(env_file).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

fn runtime() -> Result<Runtime, ExitCode> {
    Runtime::new().map_err(|e| {
        eprintln!("Error: Failed to create async runtime: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}
