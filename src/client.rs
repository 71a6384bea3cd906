//! Client for the remote color-extraction API
//!
//! One `POST` per call: the image goes up as a multipart file part named
//! `image`, authenticated with HTTP basic auth, and the JSON body comes back
//! as a [`ColorSetResponse`]. Failures are returned as [`ApiError`] values so
//! callers can turn them into data rather than aborting a tool call.

use std::io;
use std::path::{Path, PathBuf};

use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{Config, Credentials};
use crate::models::ColorSetResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to read image '{}': {source}", .path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Request to color API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Color API returned HTTP {status} with a body that is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The `{"error": "<message>"}` shape handed back to tool callers.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Reusable client bound to one endpoint and credential pair.
#[derive(Debug, Clone)]
pub struct ColorClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl ColorClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { http, endpoint: config.endpoint.clone(), credentials: config.credentials.clone() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `image_path` and return the parsed extraction result.
    ///
    /// The body is parsed whatever the HTTP status, since the API reports its
    /// own failures as JSON with `status.type` set to `"error"`.
    pub async fn fetch_colors(&self, image_path: &Path) -> Result<ColorSetResponse, ApiError> {
        let (status, body) = self.upload(image_path).await?;
        let parsed: ColorSetResponse = serde_json::from_slice(&body)
            .map_err(|source| ApiError::Decode { status: status.as_u16(), source })?;
        tracing::debug!(http_status = status.as_u16(), api_status = ?parsed.status_kind(), "Color API responded");
        Ok(parsed)
    }

    /// Like [`fetch_colors`](Self::fetch_colors), but returns the JSON body
    /// exactly as the API sent it.
    pub async fn fetch_raw(&self, image_path: &Path) -> Result<Value, ApiError> {
        let (status, body) = self.upload(image_path).await?;
        let parsed: Value = serde_json::from_slice(&body)
            .map_err(|source| ApiError::Decode { status: status.as_u16(), source })?;
        tracing::debug!(http_status = status.as_u16(), "Color API responded");
        Ok(parsed)
    }

    async fn upload(&self, image_path: &Path) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|source| ApiError::ReadImage { path: image_path.to_path_buf(), source })?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        tracing::debug!(path = %image_path.display(), size = bytes.len(), "Uploading image");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_path(image_path))?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}
