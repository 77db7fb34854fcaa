// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Upload slots
//
// A slot holds at most one picked image plus a temporary preview file that
// frontends can display by path. The preview is deleted whenever the slot
// lets go of its image.

use crate::types::AppError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Largest image the picker accepts (10 MiB)
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions the picker accepts
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Which of the two inputs a slot feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Content,
    Style,
}

impl SlotKind {
    /// Multipart field name expected by the processing service
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Content => "content_image",
            Self::Style => "style_image",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Content => "Content Image",
            Self::Style => "Style Image",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Content => "Upload content image",
            Self::Style => "Upload style image",
        }
    }
}

/// An image picked by the user, held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Temporary on-disk copy of image bytes for display.
///
/// The backing file is removed when the handle is dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write `bytes` to a fresh temporary file ending in `.{extension}`
    pub fn from_bytes(bytes: &[u8], extension: Option<&str>) -> Result<Self, AppError> {
        let suffix = extension.map(|e| format!(".{}", e)).unwrap_or_default();
        let mut file = tempfile::Builder::new()
            .prefix("style-transfer-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Holds at most one picked image
#[derive(Debug, Default)]
pub struct UploadSlot {
    file: Option<SelectedFile>,
    preview: Option<PreviewHandle>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `file`, replacing and releasing anything held before
    pub fn select(&mut self, file: SelectedFile) {
        // Release the old preview before creating the new one
        self.clear();

        match PreviewHandle::from_bytes(file.bytes(), file.extension()) {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => tracing::warn!("Failed to create preview for {}: {}", file.name(), e),
        }
        self.file = Some(file);
    }

    /// Drop the held image and its preview; no-op when already empty
    pub fn clear(&mut self) {
        self.preview = None;
        self.file = None;
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name())
    }

    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_ref().map(|p| p.path())
    }
}

/// What the file picker accepts: a single image of a supported type and size
#[derive(Debug, Clone)]
pub struct ImageFileFilter {
    pub allowed_extensions: &'static [&'static str],
    pub max_bytes: u64,
}

impl Default for ImageFileFilter {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl ImageFileFilter {
    /// Read the single picked file, or explain why it was turned down
    pub fn pick(&self, paths: &[PathBuf]) -> Result<SelectedFile, AppError> {
        let path = match paths {
            [path] => path,
            [] => return Err(AppError::FileRejected("No file selected".to_string())),
            _ => {
                return Err(AppError::FileRejected(
                    "Only one image can be dropped at a time".to_string(),
                ))
            }
        };

        let name = path
            .file_name()
            .ok_or_else(|| AppError::FileRejected("Invalid file path".to_string()))?
            .to_string_lossy()
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !self.allowed_extensions.contains(&extension.as_str()) {
            return Err(AppError::FileRejected(format!(
                "{} is not a supported image (PNG, JPG, JPEG, WEBP)",
                name
            )));
        }

        let mime_type = mime_guess::from_path(path)
            .first()
            .filter(|m| m.type_() == mime_guess::mime::IMAGE)
            .ok_or_else(|| AppError::FileRejected(format!("{} is not an image", name)))?;

        let size = fs::metadata(path)
            .map_err(|e| AppError::FileIo(format!("Failed to get file info: {}", e)))?
            .len();

        if size == 0 {
            return Err(AppError::FileRejected(format!("{} is empty", name)));
        }
        if size > self.max_bytes {
            return Err(AppError::FileRejected(format!(
                "{} is larger than {} MB",
                name,
                self.max_bytes / (1024 * 1024)
            )));
        }

        let bytes = fs::read(path)
            .map_err(|e| AppError::FileIo(format!("Failed to read {}: {}", name, e)))?;

        tracing::info!("Picked {} ({} bytes, {})", name, bytes.len(), mime_type);
        Ok(SelectedFile::new(name, mime_type.to_string(), bytes))
    }
}
