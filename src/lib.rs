//! # pagesplit
//!
//! Split one tall image holding several bordered document pages (a long
//! screenshot of stacked scans, say) into a clean multi-page PDF with one
//! fixed-size page per detected region.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PNG/JPEG bytes
//!  │
//!  ├─ 1. Decode     bytes → RGB grid
//!  ├─ 2. Edges      grayscale → small Gaussian blur → Canny
//!  ├─ 3. Regions    outermost contours → bounding boxes
//!  ├─ 4. Filter     drop boxes ≤ min size, order top-to-bottom, rank 0..N
//!  ├─ 5. Normalise  crop → uniform Lanczos scale → centre on a fixed canvas
//!  └─ 6. Assemble   canvases → one PDF (+ canvases kept for previews)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagesplit::{split_file, SplitConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = split_file("screenshot.png", &SplitConfig::default())?;
//!     std::fs::write("pages.pdf", &output.document.bytes)?;
//!     eprintln!("{} pages", output.document.page_count);
//!     Ok(())
//! }
//! ```
//!
//! An image with no qualifying region returns
//! [`SplitError::NoPagesDetected`], which [`SplitError::is_recoverable`]
//! flags as a user-facing outcome rather than a failure.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pagesplit` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pagesplit = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod split;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PageEncoding, SplitConfig, SplitConfigBuilder};
pub use error::SplitError;
pub use output::{SplitOutput, SplitReport, SplitStats};
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
pub use split::{
    detect_pages, save_document, split, split_async, split_file, split_to_file, write_previews,
};
pub use types::{Background, BoundingBox, Document, NormalizedCanvas, PageRegion, PageSize};
