//! Decode raw PNG/JPEG bytes into the RGB source grid.

use crate::error::SplitError;
use image::RgbImage;
use tracing::debug;

/// Decode `bytes` into an 8-bit RGB image.
///
/// Alpha is dropped and grayscale is expanded. Undecodable data and
/// zero-area results both surface as [`SplitError::InvalidImage`].
pub fn decode(bytes: &[u8]) -> Result<RgbImage, SplitError> {
    let img = image::load_from_memory(bytes).map_err(|e| SplitError::InvalidImage {
        detail: e.to_string(),
    })?;

    let rgb = img.to_rgb8();
    ensure_non_empty(&rgb)?;
    debug!("Decoded source image {}x{}", rgb.width(), rgb.height());
    Ok(rgb)
}

/// Reject zero-area grids.
pub fn ensure_non_empty(img: &RgbImage) -> Result<(), SplitError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(SplitError::InvalidImage {
            detail: format!("zero-area image ({}x{})", img.width(), img.height()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_rgba_png_to_rgb() {
        let src = RgbaImage::from_pixel(7, 5, Rgba([10, 20, 30, 128]));
        let rgb = decode(&png_bytes(DynamicImage::ImageRgba8(src))).unwrap();
        assert_eq!(rgb.dimensions(), (7, 5));
        assert_eq!(rgb.get_pixel(3, 2).0, [10, 20, 30]);
    }

    #[test]
    fn garbage_is_invalid_image() {
        let err = decode(b"\x89PNG\r\n\x1a\nnot really").unwrap_err();
        assert!(matches!(err, SplitError::InvalidImage { .. }));
    }

    #[test]
    fn zero_area_is_invalid_image() {
        let err = ensure_non_empty(&RgbImage::new(0, 12)).unwrap_err();
        assert!(err.to_string().contains("0x12"));
    }
}
