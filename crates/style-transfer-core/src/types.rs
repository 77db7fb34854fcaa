// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default processing service address
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Hard limit for a single transfer request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Banner text when submit is attempted with a slot empty
pub const MISSING_IMAGES_MESSAGE: &str = "Please upload both content and style images";

/// Banner text when the service gave no usable error message
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process images. Please try again.";

/// Application settings (GUI-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Base URL of the processing service, without a trailing `/api/...`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Transport timeout for a transfer request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where downloaded results are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Theme preference: "dark", "light", or "system"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_download_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.download_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_theme() -> String {
    "system".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            download_dir: default_download_dir(),
            theme: default_theme(),
        }
    }
}

impl AppSettings {
    /// Check that the settings can drive a client
    pub fn validate(&self) -> Result<(), AppError> {
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::InvalidConfig(format!("Invalid API URL {:?}: {}", self.api_base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfig(format!(
                "API URL must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Endpoint that accepts the multipart transfer request
    pub fn transfer_url(&self) -> String {
        format!("{}/api/transfer", self.api_base_url.trim_end_matches('/'))
    }

    /// Endpoint reporting service and model readiness
    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please upload both content and style images")]
    MissingImages,

    #[error("A transfer is already in progress")]
    TransferInProgress,

    #[error("File rejected: {0}")]
    FileRejected(String),

    #[error("Service returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Service {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AppError {
    /// User-visible text for the error banner
    pub fn banner_message(&self) -> String {
        match self {
            Self::MissingImages => MISSING_IMAGES_MESSAGE.to_string(),
            Self::Service {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::FileRejected(reason) => reason.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Text shown on a slot card when a pick is turned down
    pub fn pick_message(&self) -> String {
        match self {
            Self::FileRejected(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout
        } else if err.is_decode() {
            AppError::InvalidResponse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.theme, "system");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_endpoint_urls_ignore_trailing_slash() {
        let settings = AppSettings {
            api_base_url: "https://styles.example.com/".to_string(),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.transfer_url(),
            "https://styles.example.com/api/transfer"
        );
        assert_eq!(settings.health_url(), "https://styles.example.com/health");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad_scheme = AppSettings {
            api_base_url: "ftp://example.com".to_string(),
            ..AppSettings::default()
        };
        assert!(matches!(
            bad_scheme.validate(),
            Err(AppError::InvalidConfig(_))
        ));

        let zero_timeout = AppSettings {
            request_timeout_secs: 0,
            ..AppSettings::default()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_banner_messages() {
        assert_eq!(
            AppError::MissingImages.banner_message(),
            "Please upload both content and style images"
        );
        assert_eq!(
            AppError::Service {
                status: 503,
                message: Some("model unavailable".to_string()),
            }
            .banner_message(),
            "model unavailable"
        );
        assert_eq!(
            AppError::Service {
                status: 500,
                message: None,
            }
            .banner_message(),
            FALLBACK_ERROR_MESSAGE
        );
        assert_eq!(AppError::Timeout.banner_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(
            AppError::Service {
                status: 503,
                message: Some(" ".to_string()),
            }
            .banner_message(),
            FALLBACK_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_pick_messages() {
        assert_eq!(
            AppError::FileRejected("Only one image can be used here".to_string()).pick_message(),
            "Only one image can be used here"
        );

        let unreadable = AppError::FileIo("Permission denied".to_string()).pick_message();
        assert_eq!(unreadable, "File I/O error: Permission denied");
        assert_ne!(unreadable, FALLBACK_ERROR_MESSAGE);
    }
}
