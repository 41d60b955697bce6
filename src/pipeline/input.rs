//! Input staging: read a user-supplied path into an owned byte buffer.
//!
//! The pipeline works purely on in-memory bytes, so the only job here is to
//! turn filesystem failures into meaningful errors and reject files that are
//! obviously not PNG/JPEG before the decoder sees them.

use crate::error::SplitError;
use image::ImageFormat;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Formats the decoder is asked to handle.
pub const SUPPORTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

/// Read a local PNG/JPEG file into memory.
pub fn read_input(path: impl AsRef<Path>) -> Result<Vec<u8>, SplitError> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => SplitError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SplitError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    match sniff_format(&bytes) {
        Some(format) => {
            debug!(
                "Read {} ({:?}, {} bytes)",
                path.display(),
                format,
                bytes.len()
            );
            Ok(bytes)
        }
        None => Err(SplitError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Identify a supported format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .filter(|f| SUPPORTED_FORMATS.contains(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn sniff_recognises_png_and_jpeg() {
        assert_eq!(sniff_format(PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn sniff_rejects_pdf_and_empty() {
        assert_eq!(sniff_format(b"%PDF-1.7"), None);
        assert_eq!(sniff_format(b""), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_input("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, SplitError::FileNotFound { .. }));
    }

    #[test]
    fn text_file_is_unsupported() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello, not an image").unwrap();
        let err = read_input(tmp.path()).unwrap_err();
        assert!(matches!(err, SplitError::UnsupportedFormat { .. }));
    }

    #[test]
    fn png_file_is_read_whole() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(PNG_MAGIC).unwrap();
        tmp.write_all(&[0u8; 16]).unwrap();
        let bytes = read_input(tmp.path()).unwrap();
        assert_eq!(bytes.len(), PNG_MAGIC.len() + 16);
    }
}
