// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - HTTP client for the processing service
//
// One multipart POST per transfer. The transport timeout is the only
// deadline; hitting it is reported like any other transport failure.

use crate::slot::{SelectedFile, SlotKind};
use crate::transfer::{ResultImage, TransferRequest, TransferSuccess};
use crate::types::{AppError, AppSettings};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Body returned by `POST /api/transfer`, on success or failure
#[derive(Debug, Default, Deserialize)]
struct TransferResponseBody {
    #[serde(default)]
    success: bool,
    result_image: Option<String>,
    processing_time: Option<f64>,
    error: Option<String>,
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    pub model_status: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Client for the remote style transfer service
#[derive(Debug, Clone)]
pub struct StyleTransferClient {
    http_client: Client,
    transfer_url: String,
    health_url: String,
}

impl StyleTransferClient {
    pub fn new(settings: &AppSettings) -> Result<Self, AppError> {
        Self::with_builder(settings, Client::builder())
    }

    fn with_builder(settings: &AppSettings, builder: ClientBuilder) -> Result<Self, AppError> {
        settings.validate()?;

        let http_client = builder
            .timeout(settings.request_timeout())
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            transfer_url: settings.transfer_url(),
            health_url: settings.health_url(),
        })
    }

    fn file_part(file: &SelectedFile) -> Result<Part, AppError> {
        Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| AppError::InvalidResponse(format!("Invalid MIME type: {}", e)))
    }

    /// Send both images and wait for the stylized result
    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferSuccess, AppError> {
        let form = Form::new()
            .part(
                SlotKind::Content.field_name(),
                Self::file_part(&request.content)?,
            )
            .part(SlotKind::Style.field_name(), Self::file_part(&request.style)?);

        tracing::info!(
            "POST {} ({} + {} bytes)",
            self.transfer_url,
            request.content.size(),
            request.style.size()
        );

        let response = self
            .http_client
            .post(&self.transfer_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout
                } else if e.is_connect() {
                    AppError::Network(format!("Cannot connect to {} - {}", self.transfer_url, e))
                } else {
                    AppError::Network(format!("Transfer request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response.text().await?;
        Self::parse_transfer_response(status, &text)
    }

    fn parse_transfer_response(status: StatusCode, text: &str) -> Result<TransferSuccess, AppError> {
        let body: Option<TransferResponseBody> = serde_json::from_str(text).ok();

        if !status.is_success() {
            return Err(AppError::Service {
                status: status.as_u16(),
                message: body.and_then(|b| non_blank(b.error)),
            });
        }

        let body = body.ok_or_else(|| {
            AppError::InvalidResponse(format!("Unparseable response body ({} bytes)", text.len()))
        })?;

        if !body.success {
            return Err(AppError::Service {
                status: status.as_u16(),
                message: non_blank(body.error),
            });
        }

        let result_image = body
            .result_image
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::InvalidResponse("Missing result_image".to_string()))?;

        Ok(TransferSuccess {
            result_image: ResultImage::new(result_image),
            processing_time_secs: body.processing_time,
        })
    }

    /// Ask the service whether it is up and its model is loaded
    pub async fn check_health(&self) -> Result<ServiceHealth, AppError> {
        let response = self
            .http_client
            .get(&self.health_url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Service returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse health: {}", e)))
    }

    /// Download the bytes behind a result given as a URL
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Result download returned status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Blank service messages count as no message
fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
