use std::time::Instant;

use super::{truncate_body, InferenceService};
use crate::config::ClientConfig;
use crate::error::OverlayError;
use crate::model::{HealthStatus, InferRequest, InferResult};

/// Client for `POST /infer`
#[derive(Clone)]
pub struct InferClient {
    client: reqwest::Client,
    infer_url: String,
    health_url: String,
}

impl InferClient {
    pub fn new(config: &ClientConfig) -> Result<Self, OverlayError> {
        let client = config
            .http_client()
            .map_err(|e| OverlayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            infer_url: config.infer_url(),
            health_url: config.health_url(),
        })
    }

    /// Check `GET /` on the service
    pub async fn health(&self) -> Result<HealthStatus, OverlayError> {
        let response = self.client.get(&self.health_url).send().await?;
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

    async fn send(&self, request: &InferRequest) -> Result<InferResult, OverlayError> {
        let start = Instant::now();
        tracing::info!(
            "Submitting {} bytes of base64 to {} ({} -> {})",
            request.image_b64.len(),
            self.infer_url,
            request.language,
            request.target_language
        );

        let response = self.client.post(&self.infer_url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // The service reports failures as `success: false`, sometimes with a
        // non-2xx status; only fall back to the status when the body is not ours.
        let result = match serde_json::from_slice::<InferResult>(&body) {
            Ok(result) => result,
            Err(e) if status.is_success() => {
                return Err(OverlayError::InvalidResponse(e.to_string()));
            }
            Err(_) => {
                return Err(OverlayError::HttpStatus {
                    status: status.as_u16(),
                    body: truncate_body(&body),
                });
            }
        };

        tracing::info!(
            "Inference answered in {}ms (success: {}, pages: {}, service time: {:.2}s)",
            start.elapsed().as_millis(),
            result.success,
            result.pages.len(),
            result.processing_time
        );

        Ok(result)
    }
}

impl InferenceService for InferClient {
    async fn infer(&self, request: &InferRequest) -> Result<InferResult, OverlayError> {
        self.send(request).await
    }
}
