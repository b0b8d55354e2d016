use reqwest::multipart::{Form, Part};

use super::truncate_body;
use crate::config::ClientConfig;
use crate::error::OverlayError;
use crate::model::LegacyTranslation;
use crate::source::SourceImage;

/// Client for the multipart photo endpoint (`/ocr-translate`)
#[derive(Clone)]
pub struct LegacyClient {
    client: reqwest::Client,
    url: String,
}

impl LegacyClient {
    pub fn new(config: &ClientConfig) -> Result<Self, OverlayError> {
        let client = config
            .http_client()
            .map_err(|e| OverlayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.legacy_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upload a captured photo as `photo.jpg` and return both texts
    pub async fn ocr_translate(
        &self,
        photo: &SourceImage,
    ) -> Result<LegacyTranslation, OverlayError> {
        let jpeg = photo.to_jpeg().await?;
        tracing::info!(
            "Uploading {} ({} bytes as JPEG) to {}",
            photo.name(),
            jpeg.len(),
            self.url
        );

        let part = Part::bytes(jpeg)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(OverlayError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| OverlayError::InvalidResponse(e.to_string()))
    }
}
