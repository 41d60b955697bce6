//! Pipeline stages for splitting one image into pages.
//!
//! Each submodule implements exactly one transformation step and owns no
//! state between calls.
//!
//! ## Data Flow
//!
//! ```text
//! input ─▶ decode ─▶ edges ─▶ regions ─▶ filter ─▶ normalize ─▶ assemble
//! (bytes)  (RGB)     (Canny)  (contours) (size,   (per page)   (PDF)
//!                                         order)        └──▶ encode (PNG previews)
//! ```
//!
//! 1. [`input`]    : read a local PNG/JPEG into memory
//! 2. [`decode`]   : bytes → RGB grid; rejects undecodable or empty input
//! 3. [`edges`]    : grayscale, small Gaussian blur, Canny
//! 4. [`regions`]  : bounding boxes of outermost contours
//! 5. [`filter`]   : minimum-size filter, top-to-bottom order, ranks
//! 6. [`normalize`]: crop, uniform scale, centre on a fixed canvas
//! 7. [`assemble`] : canvases → one multi-page PDF
//! 8. [`encode`]   : canvases → PNG previews

pub mod assemble;
pub mod decode;
pub mod edges;
pub mod encode;
pub mod filter;
pub mod input;
pub mod normalize;
pub mod regions;
