//! Entry points that run the whole pipeline on one image.
//!
//! [`split`] is the core: bytes in, [`SplitOutput`] out, no I/O. The other
//! functions wrap it with file reading, atomic file writing, or a hop onto
//! tokio's blocking pool. Every call owns its own source image and canvases,
//! so independent calls may run in parallel freely.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::output::{SplitOutput, SplitStats};
use crate::pipeline::assemble::DocumentAssembler;
use crate::pipeline::decode;
use crate::pipeline::edges::EdgeDetector;
use crate::pipeline::encode::encode_preview;
use crate::pipeline::filter::RegionFilter;
use crate::pipeline::input;
use crate::pipeline::normalize::PageNormalizer;
use crate::pipeline::regions::RegionFinder;
use crate::types::{Document, NormalizedCanvas, PageRegion};
use image::RgbImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Split an in-memory PNG/JPEG into a multi-page PDF.
///
/// # Errors
/// * [`SplitError::InvalidImage`]: undecodable or zero-area input.
/// * [`SplitError::NoPagesDetected`]: nothing passed the size filter. This
///   is the expected answer for unsuitable images; check
///   [`SplitError::is_recoverable`].
/// * [`SplitError::InvalidRegion`] / [`SplitError::EmptyDocument`]: internal
///   contract breaches.
///
/// # Example
/// ```rust,no_run
/// use pagesplit::{split, SplitConfig};
///
/// let bytes = std::fs::read("long_screenshot.png")?;
/// match split(&bytes, &SplitConfig::default()) {
///     Ok(out) => std::fs::write("pages.pdf", &out.document.bytes)?,
///     Err(e) if e.is_recoverable() => eprintln!("{e}"),
///     Err(e) => return Err(e.into()),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn split(bytes: &[u8], config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let total_start = Instant::now();

    // ── Step 1: Decode ───────────────────────────────────────────────────
    let source = decode::decode(bytes)?;
    let (source_width, source_height) = source.dimensions();
    info!("Splitting {}x{} image", source_width, source_height);

    // ── Step 2: Detect regions ───────────────────────────────────────────
    let detect_start = Instant::now();
    let (candidates, regions) = detect_regions(&source, config)?;
    let detect_duration_ms = detect_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_split_start(regions.len());
    }

    // ── Step 3: Normalise each region ────────────────────────────────────
    let normalize_start = Instant::now();
    let pages = normalize_regions(&source, &regions, config)?;
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;
    drop(source);

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let assemble_start = Instant::now();
    let document = DocumentAssembler::from_config(config).assemble(&pages)?;
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_split_complete(document.page_count);
    }

    let stats = SplitStats {
        source_width,
        source_height,
        candidate_regions: candidates,
        accepted_pages: pages.len(),
        detect_duration_ms,
        normalize_duration_ms,
        assemble_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Split complete: {} pages from {} candidates, {}ms total",
        stats.accepted_pages, stats.candidate_regions, stats.total_duration_ms
    );

    Ok(SplitOutput {
        document,
        pages,
        regions,
        stats,
    })
}

/// Run detection only and return the ordered page regions.
///
/// Useful to preview what [`split`] would cut without paying for
/// resampling and PDF encoding.
pub fn detect_pages(bytes: &[u8], config: &SplitConfig) -> Result<Vec<PageRegion>, SplitError> {
    let source = decode::decode(bytes)?;
    let (_, regions) = detect_regions(&source, config)?;
    Ok(regions)
}

/// Read a PNG/JPEG file and split it.
pub fn split_file(path: impl AsRef<Path>, config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let bytes = input::read_input(path)?;
    split(&bytes, config)
}

/// Split a file and write the PDF to `output_path`.
///
/// The PDF is written to a temporary file next to the destination and then
/// renamed over it, so a failed or interrupted run never leaves a partial
/// document behind.
pub fn split_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &SplitConfig,
) -> Result<SplitOutput, SplitError> {
    let output = split_file(input_path, config)?;
    save_document(&output.document, output_path)?;
    Ok(output)
}

/// Atomically write an assembled document to `path`.
pub fn save_document(document: &Document, path: impl AsRef<Path>) -> Result<(), SplitError> {
    let path = path.as_ref();
    write_atomic(path, &document.bytes)?;
    info!("Wrote {} ({} pages)", path.display(), document.page_count);
    Ok(())
}

/// Write each page as `page_<n>.png` (1-indexed) into `dir`.
pub fn write_previews(
    pages: &[NormalizedCanvas],
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, SplitError> {
    let dir = dir.as_ref();
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = dir.join(format!("page_{}.png", page.rank + 1));
        let png = encode_preview(&page.image)?;
        write_atomic(&path, &png)?;
        written.push(path);
    }
    debug!("Wrote {} previews to {}", written.len(), dir.display());
    Ok(written)
}

/// [`split`] on tokio's blocking pool.
///
/// Detection and resampling are CPU-bound; running them inline would stall
/// the async worker threads for the whole image.
pub async fn split_async(bytes: Vec<u8>, config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || split(&bytes, &config))
        .await
        .map_err(|e| SplitError::Internal(format!("Split task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Edges → contours → filter. Returns the candidate count alongside the
/// accepted regions.
fn detect_regions(
    source: &RgbImage,
    config: &SplitConfig,
) -> Result<(usize, Vec<PageRegion>), SplitError> {
    let edges = EdgeDetector::from_config(config).detect(source)?;
    let candidates = RegionFinder.find_regions(&edges);
    let regions = RegionFilter::from_config(config).filter(&candidates)?;
    Ok((candidates.len(), regions))
}

fn normalize_regions(
    source: &RgbImage,
    regions: &[PageRegion],
    config: &SplitConfig,
) -> Result<Vec<NormalizedCanvas>, SplitError> {
    let normalizer = PageNormalizer::from_config(config);
    let total = regions.len();
    let mut pages = Vec::with_capacity(total);

    for region in regions {
        let page_num = region.rank + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }
        pages.push(normalizer.normalize(source, region)?);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total);
        }
    }

    Ok(pages)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SplitError> {
    let fail = |source: std::io::Error| SplitError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
