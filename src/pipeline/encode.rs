//! Preview encoding: page canvas → PNG bytes.
//!
//! PNG keeps page text crisp and is what the previews were always written
//! as. The PDF itself does not go through here; see [`super::assemble`].

use crate::error::SplitError;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Encode a page canvas as PNG.
pub fn encode_preview(img: &RgbImage) -> Result<Vec<u8>, SplitError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| SplitError::EncodeFailed {
            what: "preview PNG".into(),
            detail: e.to_string(),
        })?;

    debug!(
        "Encoded {}x{} preview → {} bytes",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}
