// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Settings loading
//
// Settings are read from a local JSON file when one exists. The service
// address can be overridden from the environment. Nothing is written back.

use crate::types::{AppError, AppSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `AppSettings::api_base_url`
pub const API_URL_ENV: &str = "STYLE_TRANSFER_API_URL";

/// In-memory copy of the settings loaded at startup
pub struct SettingsStore {
    settings: AppSettings,
}

impl SettingsStore {
    /// Load settings from the platform config directory and the environment
    pub fn new() -> Result<Self, AppError> {
        let file_path = Self::get_settings_path()?;
        tracing::info!("Settings file path: {:?}", file_path);

        let env_url = std::env::var(API_URL_ENV).ok();
        Self::load(Some(file_path), env_url)
    }

    /// Load settings from an explicit file and optional URL override
    pub fn load(file_path: Option<PathBuf>, api_url_override: Option<String>) -> Result<Self, AppError> {
        let mut settings = match file_path.as_deref() {
            Some(path) if path.exists() => Self::read_file(path)?,
            _ => {
                tracing::info!("No settings file found, using defaults");
                AppSettings::default()
            }
        };

        if let Some(url) = api_url_override.filter(|u| !u.trim().is_empty()) {
            tracing::info!("Using API URL from {}: {}", API_URL_ENV, url);
            settings.api_base_url = url.trim().to_string();
        }

        settings.validate()?;

        Ok(Self { settings })
    }

    fn read_file(path: &Path) -> Result<AppSettings, AppError> {
        tracing::info!("Loading settings from disk");
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::FileIo(format!("Failed to read settings: {}", e)))?;

        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse settings, using defaults: {}", e);
            AppSettings::default()
        }))
    }

    /// Get the path to the settings file
    fn get_settings_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "styletransfer", "client")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        Ok(config_dir.join("settings.json"))
    }

    /// Get current settings
    pub fn get(&self) -> AppSettings {
        self.settings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(Some(dir.path().join("settings.json")), None).unwrap();
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn test_reads_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"apiBaseUrl": "http://gpu-box:9000", "requestTimeoutSecs": 30}}"#
        )
        .unwrap();

        let store = SettingsStore::load(Some(file.path().to_path_buf()), None).unwrap();
        let settings = store.get();
        assert_eq!(settings.api_base_url, "http://gpu-box:9000");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.theme, "system");
    }

    #[test]
    fn test_unparseable_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let store = SettingsStore::load(Some(file.path().to_path_buf()), None).unwrap();
        assert_eq!(store.get().api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_env_override_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"apiBaseUrl": "http://gpu-box:9000"}}"#).unwrap();

        let store = SettingsStore::load(
            Some(file.path().to_path_buf()),
            Some("https://styles.example.com".to_string()),
        )
        .unwrap();
        assert_eq!(store.get().api_base_url, "https://styles.example.com");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let result = SettingsStore::load(None, Some("not a url".to_string()));
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }
}
