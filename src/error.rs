//! Error types for the pagesplit library.
//!
//! Every failure is local to one invocation: nothing here carries state that
//! could leak into the next image. [`SplitError`] is split into three bands:
//!
//! * **Input**: the bytes never became a pixel grid (missing file, not a
//!   PNG/JPEG, undecodable, zero-area).
//! * **Pipeline**: the four outcomes of the detection/normalisation core.
//!   Only [`SplitError::NoPagesDetected`] is an expected, user-facing outcome;
//!   the others are contract breaches and abort the invocation.
//! * **Output**: encoding or writing the finished artifact failed.
//!
//! No variant is ever paired with a partial document: assembly is
//! all-or-nothing.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pagesplit library.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read, but it is neither PNG nor JPEG.
    #[error("Unsupported image format for '{path}': expected PNG or JPEG")]
    UnsupportedFormat { path: PathBuf },

    /// The bytes could not be decoded, or decoded to a zero-area image.
    #[error("Invalid image: {detail}")]
    InvalidImage { detail: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// No candidate region survived the minimum-size filter.
    ///
    /// This is an expected outcome for unsuitable input rather than a crash;
    /// see [`SplitError::is_recoverable`].
    #[error(
        "No proper bordered pages detected ({candidates} candidate regions, \
none at least {min_width}x{min_height}px).\nPlease try a cleaner image."
    )]
    NoPagesDetected {
        candidates: usize,
        min_width: u32,
        min_height: u32,
    },

    /// A region box does not lie within the source image.
    #[error(
        "Region {x},{y} {width}x{height} lies outside the {image_width}x{image_height} source image"
    )]
    InvalidRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// The document assembler was handed zero pages.
    #[error("Cannot assemble a document with no pages")]
    EmptyDocument,

    // ── Output errors ─────────────────────────────────────────────────────
    /// PNG/JPEG/PDF encoding of a finished page failed.
    #[error("Failed to encode {what}: {detail}")]
    EncodeFailed { what: String, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SplitError {
    /// `true` for outcomes the caller should surface as a message and move
    /// on from, rather than treat as a failure of the tool.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SplitError::NoPagesDetected { .. })
    }
}
