//! Palette stripe rendering
//!
//! Turns one color category of a [`ColorSetResponse`] into a `width × height`
//! image of vertical stripes, one per selected color, ordered left to right by
//! descending weight.
//!
//! Stripe widths come from integer division: with `n` stripes, the first
//! `width % n` stripes are one pixel wider than the rest, so the widths always
//! sum to exactly `width`.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::color::parse_color;
use crate::models::{ColorEntry, ColorKey, ColorSetResponse};
use crate::output::{resolve_output_path, save_png};

pub const DEFAULT_MAX_COLORS: usize = 7;
pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 100;
/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 16384;
/// Largest accepted `width * height`; 3 bytes per pixel, so about 48 MiB.
pub const MAX_PIXELS: u64 = 16 * 1024 * 1024;

/// Color used to close the strip when no entry had a usable color.
const FALLBACK_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No colors found for key '{0}'")]
    NoColorsFound(ColorKey),
    #[error("No colors selected for key '{0}'")]
    NoColorsSelected(ColorKey),
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Parameters for one palette render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub color_key: ColorKey,
    pub max_colors: usize,
    pub width: u32,
    pub height: u32,
    /// Explicit destination; a timestamped name is generated when `None`.
    pub output_path: Option<PathBuf>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            color_key: ColorKey::default(),
            max_colors: DEFAULT_MAX_COLORS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            output_path: None,
        }
    }
}

impl RenderRequest {
    /// Check the numeric bounds before any work is done.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.max_colors == 0 {
            return Err(RenderError::InvalidRequest("max_colors must be at least 1".into()));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(RenderError::InvalidRequest(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_DIMENSION, value
                )));
            }
        }
        let pixels = u64::from(self.width) * u64::from(self.height);
        if pixels > MAX_PIXELS {
            return Err(RenderError::InvalidRequest(format!(
                "width x height must not exceed {} pixels, got {}x{}",
                MAX_PIXELS, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// One vertical band of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stripe {
    pub x: u32,
    pub width: u32,
    pub color: Rgb<u8>,
}

/// Stripe layout of a palette image, independent of any pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    width: u32,
    height: u32,
    stripes: Vec<Stripe>,
}

impl PaletteImage {
    /// Lay out `selected` entries across `width` pixels.
    ///
    /// Entries without a usable color code are skipped with a warning; their
    /// share of the width is absorbed by a closing stripe in the last valid
    /// color (black if there was none).
    pub fn layout(selected: &[&ColorEntry], width: u32, height: u32) -> Self {
        let mut stripes = Vec::with_capacity(selected.len() + 1);
        let mut x = 0;
        let mut last_color = None;

        for (entry, stripe_width) in selected.iter().zip(stripe_widths(width, selected.len())) {
            let Some(code) = entry.color_code() else {
                tracing::warn!(entry = ?entry, "Skipping color due to missing 'html_code'");
                continue;
            };
            let color = match parse_color(code) {
                Ok(color) => color,
                Err(e) => {
                    tracing::warn!(html_code = code, error = %e, "Skipping color with unparseable 'html_code'");
                    continue;
                }
            };
            stripes.push(Stripe { x, width: stripe_width, color });
            x += stripe_width;
            last_color = Some(color);
        }

        if x < width {
            stripes.push(Stripe {
                x,
                width: width - x,
                color: last_color.unwrap_or(FALLBACK_COLOR),
            });
        }

        Self { width, height, stripes }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stripes(&self) -> &[Stripe] {
        &self.stripes
    }

    /// Rasterize the layout.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut columns = vec![FALLBACK_COLOR; self.width as usize];
        for stripe in &self.stripes {
            let start = stripe.x as usize;
            columns[start..start + stripe.width as usize].fill(stripe.color);
        }
        RgbImage::from_fn(self.width, self.height, |x, _| columns[x as usize])
    }
}

/// Split `width` into `count` integer widths that sum to `width`.
///
/// ```
/// use palette_mcp::palette::stripe_widths;
///
/// assert_eq!(stripe_widths(100, 3), vec![34, 33, 33]);
/// assert_eq!(stripe_widths(10, 4), vec![3, 3, 2, 2]);
/// ```
pub fn stripe_widths(width: u32, count: usize) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as u32;
    let (base, remainder) = (width / n, width % n);
    (0..n).map(|i| base + u32::from(i < remainder)).collect()
}

/// The `max_colors` heaviest entries, heaviest first.
///
/// The sort is stable: entries with equal percent keep their original order.
pub fn select_colors(entries: &[ColorEntry], max_colors: usize) -> Vec<&ColorEntry> {
    let mut sorted: Vec<&ColorEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
    sorted.truncate(max_colors);
    sorted
}

/// Lay out the palette for `request.color_key` without touching the filesystem.
pub fn build_palette(
    response: &ColorSetResponse,
    request: &RenderRequest,
) -> Result<PaletteImage, RenderError> {
    request.validate()?;

    let entries = response.entries(request.color_key);
    if entries.is_empty() {
        return Err(RenderError::NoColorsFound(request.color_key));
    }

    let selected = select_colors(entries, request.max_colors);
    if selected.is_empty() {
        return Err(RenderError::NoColorsSelected(request.color_key));
    }

    Ok(PaletteImage::layout(&selected, request.width, request.height))
}

/// Render the palette and write it as PNG, returning the path written.
///
/// Without an explicit `request.output_path` the file is named
/// `img_{color_key}_{timestamp}.png` inside `output_dir`.
pub fn render_palette(
    response: &ColorSetResponse,
    request: &RenderRequest,
    output_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let palette = build_palette(response, request)?;
    let path = resolve_output_path(request.output_path.as_deref(), output_dir, request.color_key);

    save_png(&palette.to_rgb_image(), &path)
        .map_err(|source| RenderError::Write { path: path.clone(), source })?;

    tracing::info!(path = %path.display(), stripes = palette.stripes().len(), "Palette image saved");
    Ok(path)
}
