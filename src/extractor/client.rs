//! Image-extraction service HTTP client.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::{ExtractorError, ExtractorResult};
use super::types::{ExtractionErrorBody, ExtractionResponse};

/// Client for the image-extraction service.
#[derive(Debug, Clone)]
pub struct ExtractorClient {
    /// HTTP client.
    client: Client,
    /// Base URL for the extraction service (e.g., "http://localhost:8000").
    base_url: String,
}

impl ExtractorClient {
    /// Create a new extraction client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Check if the extraction service is reachable and healthy.
    pub async fn health_check(&self) -> ExtractorResult<bool> {
        let url = format!("{}/health", self.base_url);
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| ExtractorError::Unreachable {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

        Ok(response.status().is_success())
    }

    /// Submit an image for drug-label extraction.
    ///
    /// A transport failure (connect refused, timeout, DNS) is
    /// `Unreachable`; a non-success response carries the service's own
    /// status and detail through as `Upstream`.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn extract(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ExtractorResult<ExtractionResponse> {
        let url = format!("{}/extract-drug-info", self.base_url);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ExtractorError::InvalidRequest(e.to_string()))?;
        let form = Form::new().part("file", part);

        debug!("Submitting image to extraction service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractorError::Unreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ExtractionErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| "Image extraction failed".to_string());
            return Err(ExtractorError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ExtractorError::InvalidResponse(e.to_string()))
    }
}
