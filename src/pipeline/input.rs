//! Input loading: turn a chosen file into a [`StagedDocument`].
//!
//! This is the per-file step that can fail independently of the other slots:
//! the file may be missing, unreadable, empty, or of an unsupported type.
//! The image-or-PDF constraint is enforced here, at selection time, so a bad
//! choice surfaces immediately rather than as a confusing model error later.
//!
//! MIME sniffing prefers magic bytes over the file extension — scanners and
//! phone cameras routinely produce mislabelled files — and falls back to the
//! extension only when the content is unrecognised.

use crate::error::ExtractError;
use crate::session::StagedDocument;
use std::path::Path;
use tracing::debug;

/// Load and stage a document from disk, enforcing the image/PDF constraint.
pub async fn load_document(path: impl AsRef<Path>) -> Result<StagedDocument, ExtractError> {
    let path = path.as_ref();

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    if bytes.is_empty() {
        return Err(ExtractError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mime_type = sniff_mime(&bytes, path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(
        "Staged '{}': {} bytes, {}",
        file_name,
        bytes.len(),
        mime_type
    );

    Ok(StagedDocument::new(file_name, mime_type, bytes))
}

/// Determine the MIME type from magic bytes, falling back to the extension.
///
/// Only image types and PDF are accepted; anything else is an
/// [`ExtractError::UnsupportedMediaType`].
fn sniff_mime(bytes: &[u8], path: &Path) -> Result<&'static str, ExtractError> {
    if bytes.starts_with(b"%PDF") {
        return Ok("application/pdf");
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Ok("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok("image/jpeg");
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Ok("image/webp");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Ok("image/gif");
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "" => Err(ExtractError::UnsupportedMediaType {
            path: path.to_path_buf(),
            detail: "unrecognised content and no file extension".into(),
        }),
        other => Err(ExtractError::UnsupportedMediaType {
            path: path.to_path_buf(),
            detail: format!("unrecognised content, extension '.{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut f = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        f.write_all(bytes).expect("write temp file");
        f
    }

    #[tokio::test]
    async fn loads_pdf_by_magic_bytes() {
        // Deliberately misleading extension; the magic bytes must win.
        let f = write_temp(".dat", b"%PDF-1.7 content");
        let doc = load_document(f.path()).await.unwrap();
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.size, 16);
    }

    #[tokio::test]
    async fn loads_jpeg_by_magic_bytes() {
        let f = write_temp(".bin", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        let doc = load_document(f.path()).await.unwrap();
        assert_eq!(doc.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn falls_back_to_extension_for_unrecognised_content() {
        let f = write_temp(".png", b"not really a png");
        let doc = load_document(f.path()).await.unwrap();
        assert_eq!(doc.mime_type, "image/png");
    }

    #[tokio::test]
    async fn rejects_unsupported_type() {
        let f = write_temp(".txt", b"plain text notes");
        let err = load_document(f.path()).await.unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn rejects_empty_file() {
        let f = write_temp(".pdf", b"");
        let err = load_document(f.path()).await.unwrap_err();
        assert!(matches!(err, ExtractError::EmptyFile { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = load_document("/no/such/dir/invoice.pdf").await.unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn webp_magic_requires_riff_header() {
        let mut bytes = b"RIFF\x00\x00\x00\x00WEBP".to_vec();
        assert_eq!(
            sniff_mime(&bytes, Path::new("x.bin")).unwrap(),
            "image/webp"
        );
        bytes[0] = b'X';
        assert!(sniff_mime(&bytes, Path::new("x.bin")).is_err());
    }
}
