//! MCP generate_palette_img_tool — fetch an image's palette and render it as a stripe PNG.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

use crate::client::{ApiError, ColorClient};
use crate::config::RenderSettings;
use crate::models::{ColorKey, ColorSetResponse};
use crate::palette::{
    render_palette, RenderError, RenderRequest, DEFAULT_HEIGHT, DEFAULT_MAX_COLORS, DEFAULT_WIDTH,
    MAX_DIMENSION,
};
use crate::worker::{RenderPool, WorkerError};

/// Input parameters for the generate_palette_img_tool tool.
///
/// Values are accepted loosely and checked in [`GeneratePaletteInput::render_request`],
/// so a bad `color_key` or a negative size is reported as a failure message
/// rather than rejected while decoding the call.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeneratePaletteInput {
    #[schemars(description = "Path to a local image file to analyze")]
    pub image_path: String,

    #[schemars(
        description = "Where to write the PNG. If omitted, img_{color_key}_{timestamp}.png is created in the output directory"
    )]
    #[serde(default)]
    pub output_path: Option<String>,

    #[schemars(
        with = "ColorKey",
        description = "Color category to render: background_colors, foreground_colors or image_colors (default: image_colors)"
    )]
    #[serde(default = "default_color_key")]
    pub color_key: String,

    #[schemars(description = "Maximum number of stripes, heaviest colors first (default: 7)")]
    #[serde(default = "default_max_colors")]
    pub max_colors: i64,

    #[schemars(description = "Image width in pixels (default: 500)")]
    #[serde(default = "default_width")]
    pub width: i64,

    #[schemars(description = "Image height in pixels (default: 100)")]
    #[serde(default = "default_height")]
    pub height: i64,
}

fn default_color_key() -> String {
    ColorKey::default().to_string()
}

fn default_max_colors() -> i64 {
    DEFAULT_MAX_COLORS as i64
}

fn default_width() -> i64 {
    i64::from(DEFAULT_WIDTH)
}

fn default_height() -> i64 {
    i64::from(DEFAULT_HEIGHT)
}

impl GeneratePaletteInput {
    /// Convert the raw arguments into a checked [`RenderRequest`].
    pub fn render_request(&self) -> Result<RenderRequest, RenderError> {
        let color_key = self.color_key.trim().parse::<ColorKey>().map_err(RenderError::InvalidRequest)?;
        let max_colors = usize::try_from(self.max_colors)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| RenderError::InvalidRequest(format!("max_colors must be at least 1, got {}", self.max_colors)))?;
        let request = RenderRequest {
            color_key,
            max_colors,
            width: dimension("width", self.width)?,
            height: dimension("height", self.height)?,
            output_path: self.output_path.as_ref().filter(|p| !p.trim().is_empty()).map(PathBuf::from),
        };
        request.validate()?;
        Ok(request)
    }
}

fn dimension(name: &str, value: i64) -> Result<u32, RenderError> {
    u32::try_from(value).ok().filter(|v| (1..=MAX_DIMENSION).contains(v)).ok_or_else(|| {
        RenderError::InvalidRequest(format!("{} must be between 1 and {}, got {}", name, MAX_DIMENSION, value))
    })
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("could not fetch colors: {0}")]
    Fetch(#[from] ApiError),
    #[error("color API returned status '{kind}': {reason}")]
    ApiStatus { kind: String, reason: String },
    #[error("color API response contains no color data")]
    NoColorData,
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Reject responses that must not reach the renderer: API-level failures and
/// responses without any colors.
pub fn check_response(response: &ColorSetResponse) -> Result<(), GenerateError> {
    if !response.is_success() {
        return Err(GenerateError::ApiStatus {
            kind: response.status_kind().unwrap_or("missing").to_string(),
            reason: response.status_text().unwrap_or("no reason given").to_string(),
        });
    }
    match response.colors() {
        Some(colors) if !colors.is_empty() => Ok(()),
        _ => Err(GenerateError::NoColorData),
    }
}

/// Fetch, validate and render; the render itself runs on `pool`.
pub async fn generate_palette(
    client: &ColorClient,
    settings: &RenderSettings,
    pool: &RenderPool,
    image_path: &Path,
    request: RenderRequest,
) -> Result<PathBuf, GenerateError> {
    request.validate()?;

    let response = client.fetch_colors(image_path).await?;
    check_response(&response)?;

    let output_dir = settings.output_dir.clone();
    let path = pool.run(move || render_palette(&response, &request, &output_dir)).await??;
    Ok(path)
}

/// Success message naming the written file.
pub fn success_message(path: &Path) -> String {
    format!("Palette image generated successfully. Check \"{}\"", path.display())
}

/// Execute the tool and describe the outcome in one line.
pub async fn run_generate_palette(
    client: &ColorClient,
    settings: &RenderSettings,
    pool: &RenderPool,
    input: GeneratePaletteInput,
) -> String {
    let result = match input.render_request() {
        Ok(request) => generate_palette(client, settings, pool, Path::new(&input.image_path), request).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(path) => success_message(&path),
        Err(e) => {
            tracing::error!(image = %input.image_path, error = %e, "Palette generation failed");
            format!("Failed to generate palette image: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credentials};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        _server: MockServer,
        client: ColorClient,
        settings: RenderSettings,
        pool: RenderPool,
        dir: TempDir,
        image: PathBuf,
    }

    async fn fixture(status: u16, body: serde_json::Value) -> Fixture {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        let mut config = Config::with_credentials(Credentials::new("k", "s"));
        config.endpoint = server.uri();
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.jpg");
        std::fs::write(&image, b"jpeg").unwrap();
        let settings =
            RenderSettings { output_dir: dir.path().join("outputs"), ..RenderSettings::default() };

        Fixture {
            client: ColorClient::new(&config).unwrap(),
            _server: server,
            settings,
            pool: RenderPool::new(2),
            dir,
            image,
        }
    }

    fn input(image: &Path) -> GeneratePaletteInput {
        serde_json::from_value(json!({ "image_path": image.display().to_string() })).unwrap()
    }

    fn success_body() -> serde_json::Value {
        json!({
            "result": {"colors": {
                "background_colors": [{"html_code": "#000000", "percent": 100.0}],
                "foreground_colors": [],
                "image_colors": [
                    {"html_code": "#ff0000", "percent": 20.0},
                    {"html_code": "#00ff00", "percent": 50.0},
                    {"html_code": "#0000ff", "percent": 30.0}
                ],
                "object_percentage": 33.3
            }},
            "status": {"text": "", "type": "success"}
        })
    }

    #[test]
    fn test_input_defaults() {
        let input = input(Path::new("x.png"));
        assert_eq!(input.color_key, "image_colors");
        assert_eq!(input.render_request().unwrap(), RenderRequest::default());
    }

    #[test]
    fn test_out_of_range_arguments_are_invalid_requests() {
        for args in [
            json!({"image_path": "x.png", "color_key": "colors"}),
            json!({"image_path": "x.png", "max_colors": -1}),
            json!({"image_path": "x.png", "max_colors": 0}),
            json!({"image_path": "x.png", "width": -5}),
            json!({"image_path": "x.png", "height": 5_000_000_000i64}),
            json!({"image_path": "x.png", "width": 16384, "height": 16384}),
        ] {
            let input: GeneratePaletteInput = serde_json::from_value(args.clone()).unwrap();
            let err = input.render_request().unwrap_err();
            assert!(matches!(err, RenderError::InvalidRequest(_)), "{}: {:?}", args, err);
        }

        let input: GeneratePaletteInput = serde_json::from_value(
            json!({"image_path": "x.png", "color_key": " foreground_colors ", "max_colors": 2}),
        )
        .unwrap();
        let request = input.render_request().unwrap();
        assert_eq!(request.color_key, ColorKey::ForegroundColors);
        assert_eq!(request.max_colors, 2);
    }

    #[test]
    fn test_check_response() {
        let ok: ColorSetResponse = serde_json::from_value(success_body()).unwrap();
        assert!(check_response(&ok).is_ok());

        let failed: ColorSetResponse =
            serde_json::from_value(json!({"status": {"type": "error", "text": "quota exceeded"}}))
                .unwrap();
        let err = check_response(&failed).unwrap_err();
        assert_eq!(err.to_string(), "color API returned status 'error': quota exceeded");

        let empty: ColorSetResponse =
            serde_json::from_value(json!({"result": {"colors": {}}, "status": {"type": "success"}}))
                .unwrap();
        assert!(matches!(check_response(&empty), Err(GenerateError::NoColorData)));

        let no_status: ColorSetResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(check_response(&no_status), Err(GenerateError::ApiStatus { .. })));
    }

    #[tokio::test]
    async fn test_generate_with_explicit_output_path() {
        let f = fixture(200, success_body()).await;
        let out = f.dir.path().join("strip.png");
        let mut input = input(&f.image);
        input.output_path = Some(out.display().to_string());
        input.width = 100;
        input.height = 10;

        let message = run_generate_palette(&f.client, &f.settings, &f.pool, input).await;

        assert_eq!(message, success_message(&out));
        let image = image::open(&out).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (100, 10));
        // Heaviest color first: green 50, blue 30, red 20.
        assert_eq!(image.get_pixel(0, 0), &image::Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(34, 0), &image::Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(99, 9), &image::Rgb([255, 0, 0]));
    }

    #[tokio::test]
    async fn test_generate_with_default_output_path() {
        let f = fixture(200, success_body()).await;
        let mut input = input(&f.image);
        input.color_key = ColorKey::BackgroundColors.to_string();

        let path = generate_palette(
            &f.client,
            &f.settings,
            &f.pool,
            &f.image,
            input.render_request().unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(path.parent(), Some(f.settings.output_dir.as_path()));
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("img_background_colors_"));
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_api_error_status_writes_nothing() {
        let f = fixture(
            403,
            json!({"status": {"text": "You have reached your monthly limits", "type": "error"}}),
        )
        .await;

        let message = run_generate_palette(&f.client, &f.settings, &f.pool, input(&f.image)).await;

        assert!(message.starts_with("Failed to generate palette image"), "{}", message);
        assert!(message.contains("You have reached your monthly limits"), "{}", message);
        assert!(!f.settings.output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_color_key_reports_no_colors() {
        let f = fixture(200, success_body()).await;
        let mut input = input(&f.image);
        input.color_key = ColorKey::ForegroundColors.to_string();

        let message = run_generate_palette(&f.client, &f.settings, &f.pool, input).await;

        assert!(message.contains("No colors found for key 'foreground_colors'"), "{}", message);
        assert!(!f.settings.output_dir.exists());
    }

    #[tokio::test]
    async fn test_invalid_arguments_skip_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(0)
            .mount(&server)
            .await;
        let mut config = Config::with_credentials(Credentials::new("k", "s"));
        config.endpoint = server.uri();
        let client = ColorClient::new(&config).unwrap();

        for (field, value, expected) in [
            ("max_colors", json!(0), "max_colors must be at least 1"),
            ("max_colors", json!(-1), "max_colors must be at least 1"),
            ("color_key", json!("colors"), "unknown color key 'colors'"),
            ("width", json!(-3), "width must be between 1 and 16384"),
        ] {
            let mut args = json!({"image_path": "photo.jpg"});
            args[field] = value;
            let input: GeneratePaletteInput = serde_json::from_value(args).unwrap();
            let message =
                run_generate_palette(&client, &RenderSettings::default(), &RenderPool::new(1), input)
                    .await;

            assert!(message.starts_with("Failed to generate palette image"), "{}", message);
            assert!(message.contains(expected), "{}", message);
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let f = fixture(200, success_body()).await;
        let message = run_generate_palette(
            &f.client,
            &f.settings,
            &f.pool,
            input(Path::new("/nonexistent/photo.jpg")),
        )
        .await;
        assert!(message.starts_with("Failed to generate palette image: could not fetch colors"));
    }
}
