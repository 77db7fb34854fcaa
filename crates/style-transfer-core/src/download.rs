// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Result download
//
// Turns a result image (data URI or URL) into bytes and writes them to the
// download directory without overwriting earlier downloads.

use crate::client::StyleTransferClient;
use crate::transfer::ResultImage;
use crate::types::AppError;
use crate::view::DOWNLOAD_FILE_NAME;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Decode a `data:<mime>;base64,<payload>` URI
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AppError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::InvalidResponse("Not a data URI".to_string()))?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::InvalidResponse("Malformed data URI".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(AppError::InvalidResponse(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::InvalidResponse(format!("Invalid base64 image: {}", e)))
}

/// Raw bytes of a result, fetching it when it is a URL
pub async fn result_bytes(
    client: &StyleTransferClient,
    image: &ResultImage,
) -> Result<Vec<u8>, AppError> {
    if image.is_data_uri() {
        decode_data_uri(image.as_str())
    } else {
        client.fetch_bytes(image.as_str()).await
    }
}

/// `stylized-image.png`, `stylized-image (1).png`, ... in `dir`
fn candidate_paths(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    let path = Path::new(DOWNLOAD_FILE_NAME);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    std::iter::once(dir.join(DOWNLOAD_FILE_NAME))
        .chain((1..).map(move |n| dir.join(format!("{} ({}).{}", stem, n, ext))))
}

/// Create the first download file in `dir` that does not exist yet.
///
/// Files are opened with `create_new`, so a name taken between lookups is
/// skipped instead of truncated.
pub fn create_download_file(dir: &Path) -> Result<(PathBuf, File), AppError> {
    for path in candidate_paths(dir) {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::FileIo(format!(
                    "Failed to create {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    Err(AppError::FileIo("No free download file name".to_string()))
}

/// Write a result into `dir` and return where it landed
pub async fn save_result(
    client: &StyleTransferClient,
    image: &ResultImage,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let bytes = result_bytes(client, image).await?;

    fs::create_dir_all(dir)
        .map_err(|e| AppError::FileIo(format!("Failed to create download dir: {}", e)))?;

    let (path, mut file) = create_download_file(dir)?;
    file.write_all(&bytes)
        .map_err(|e| AppError::FileIo(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!("Saved result to {:?} ({} bytes)", path, bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppSettings;

    #[test]
    fn test_decode_data_uri() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_rejects_non_base64_uris() {
        assert!(decode_data_uri("https://cdn.example.com/out.png").is_err());
        assert!(decode_data_uri("data:image/png,raw").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,***").is_err());
    }

    #[test]
    fn test_download_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let (first, _) = create_download_file(dir.path()).unwrap();
        assert_eq!(first, dir.path().join("stylized-image.png"));

        let (second, _) = create_download_file(dir.path()).unwrap();
        assert_eq!(second, dir.path().join("stylized-image (1).png"));

        let (third, _) = create_download_file(dir.path()).unwrap();
        assert_eq!(third, dir.path().join("stylized-image (2).png"));
    }

    #[test]
    fn test_download_file_skips_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stylized-image.png"), b"mine").unwrap();
        fs::write(dir.path().join("stylized-image (1).png"), b"also mine").unwrap();

        let (path, mut file) = create_download_file(dir.path()).unwrap();
        file.write_all(b"new").unwrap();

        assert_eq!(path, dir.path().join("stylized-image (2).png"));
        assert_eq!(fs::read(dir.path().join("stylized-image.png")).unwrap(), b"mine");
        assert_eq!(
            fs::read(dir.path().join("stylized-image (1).png")).unwrap(),
            b"also mine"
        );
    }

    #[tokio::test]
    async fn test_save_result_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = StyleTransferClient::new(&AppSettings::default()).unwrap();
        let image = ResultImage::new("data:image/png;base64,aGVsbG8=");

        fs::write(dir.path().join("stylized-image.png"), b"earlier").unwrap();

        let first = save_result(&client, &image, dir.path()).await.unwrap();
        let second = save_result(&client, &image, dir.path()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            fs::read(dir.path().join("stylized-image.png")).unwrap(),
            b"earlier"
        );
        assert_eq!(fs::read(&first).unwrap(), b"hello");
        assert_eq!(fs::read(&second).unwrap(), b"hello");
    }
}
