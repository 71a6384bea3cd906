//! Data model for color-extraction responses
//!
//! Mirrors the JSON shape returned by the Imagga `/v2/colors` endpoint:
//!
//! ```json
//! {
//!   "result": {
//!     "colors": {
//!       "background_colors": [{"html_code": "#2a2b2f", "percent": 61.4, ...}],
//!       "foreground_colors": [...],
//!       "image_colors": [...],
//!       "object_percentage": 20.79
//!     }
//!   },
//!   "status": {"text": "", "type": "success"}
//! }
//! ```
//!
//! Fields this crate does not interpret are kept in `extra` maps so that a
//! response can be re-serialized without losing anything the API sent.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status type the API reports for a successful extraction.
pub const STATUS_SUCCESS: &str = "success";

/// Which color category of a response to render.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ColorKey {
    /// Colors of the detected background region
    BackgroundColors,
    /// Colors of the detected foreground object
    ForegroundColors,
    /// Colors of the whole image
    #[default]
    ImageColors,
}

impl ColorKey {
    pub const ALL: [ColorKey; 3] =
        [ColorKey::BackgroundColors, ColorKey::ForegroundColors, ColorKey::ImageColors];

    /// The JSON key this category is stored under.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorKey::BackgroundColors => "background_colors",
            ColorKey::ForegroundColors => "foreground_colors",
            ColorKey::ImageColors => "image_colors",
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorKey::ALL.into_iter().find(|k| k.as_str() == s).ok_or_else(|| {
            let valid: Vec<&str> = ColorKey::ALL.iter().map(|k| k.as_str()).collect();
            format!("unknown color key '{}', expected one of: {}", s, valid.join(", "))
        })
    }
}

/// One detected color and its weight within the image or region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    /// Color code, normally `#RRGGBB`. Entries without one are skipped when rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_code: Option<String>,
    /// Relative weight in percent (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    /// `r`, `g`, `b`, `closest_palette_*` and anything else the API sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorEntry {
    pub fn new(html_code: impl Into<String>, percent: f64) -> Self {
        Self { html_code: Some(html_code.into()), percent: Some(percent), extra: Map::new() }
    }

    /// Weight used for ordering; a missing percent counts as zero.
    pub fn weight(&self) -> f64 {
        self.percent.unwrap_or(0.0)
    }

    /// The color code, if present and non-blank.
    pub fn color_code(&self) -> Option<&str> {
        self.html_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// The `result.colors` object: one list per [`ColorKey`] plus metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_colors: Option<Vec<ColorEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_colors: Option<Vec<ColorEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_colors: Option<Vec<ColorEntry>>,
    /// Share of the image covered by the detected foreground object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_percentage: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorSets {
    /// Entries for `key`; empty when the category is absent.
    pub fn get(&self, key: ColorKey) -> &[ColorEntry] {
        let set = match key {
            ColorKey::BackgroundColors => &self.background_colors,
            ColorKey::ForegroundColors => &self.foreground_colors,
            ColorKey::ImageColors => &self.image_colors,
        };
        set.as_deref().unwrap_or_default()
    }

    /// True when no category holds a single entry.
    pub fn is_empty(&self) -> bool {
        ColorKey::ALL.iter().all(|k| self.get(*k).is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSets>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `status` object the API attaches to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parsed color-extraction response.
///
/// Immutable once received; rendering only borrows from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PaletteResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApiStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorSetResponse {
    /// Build a successful response around `colors`.
    pub fn success(colors: ColorSets) -> Self {
        Self {
            result: Some(PaletteResult { colors: Some(colors), extra: Map::new() }),
            status: Some(ApiStatus {
                kind: Some(STATUS_SUCCESS.to_string()),
                text: Some(String::new()),
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// The `status.type` field, if the API sent one.
    pub fn status_kind(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.kind.as_deref())
    }

    /// The `status.text` field, if the API sent a non-empty one.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.text.as_deref()).filter(|t| !t.is_empty())
    }

    pub fn is_success(&self) -> bool {
        self.status_kind() == Some(STATUS_SUCCESS)
    }

    /// The `result.colors` object, if present.
    pub fn colors(&self) -> Option<&ColorSets> {
        self.result.as_ref().and_then(|r| r.colors.as_ref())
    }

    /// Entries stored under `key`; empty when anything along the path is missing.
    pub fn entries(&self, key: ColorKey) -> &[ColorEntry] {
        self.colors().map(|c| c.get(key)).unwrap_or_default()
    }
}
