//! CLI binary for pagesplit.
//!
//! A thin shim over the library crate that maps CLI flags to `SplitConfig`,
//! runs one independent split per input, and reports results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use pagesplit::pipeline::input::read_input;
use pagesplit::{
    detect_pages, save_document, split_async, write_previews, Background, PageEncoding,
    PageSize, ProgressCallback, SplitConfig, SplitError, SplitProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Shared bar across all inputs; one callback per input carries its label.
struct CliProgressCallback {
    bar: ProgressBar,
    label: String,
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_split_start(&self, total_pages: usize) {
        self.bar
            .set_message(format!("{}: {total_pages} pages detected", self.label));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize) {
        self.bar
            .set_message(format!("{}: page {page_num}/{total_pages}", self.label));
    }
}

fn progress_bar(total_inputs: usize) -> ProgressBar {
    let bar = ProgressBar::new(total_inputs as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} images  {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Splitting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One screenshot → screenshot_split.pdf next to it
  pagesplit screenshot.png

  # Explicit output file and PNG previews of each page
  pagesplit screenshot.png -o pages.pdf --previews previews/

  # Letter size at 150 dpi, grey letterbox, smaller pages allowed
  pagesplit scan.jpg --page-size 1275x1650 --background dddddd --min-width 300

  # Many uploads at once, results as JSON
  pagesplit --out-dir out/ -j 8 --json *.png

  # Show what would be cut without writing anything
  pagesplit --detect-only screenshot.png

EXIT STATUS:
  0  every input produced a document
  2  at least one input had no bordered pages (nothing written for it)
  1  any other error
"#;

/// Split long screenshots of bordered pages into clean multi-page PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "pagesplit",
    version,
    about = "Split long screenshots of bordered pages into clean multi-page PDFs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PNG or JPEG images to split.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write the PDF here (single input only).
    #[arg(short, long, env = "PAGESPLIT_OUTPUT", conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for `<stem>_split.pdf` files. Default: next to each input.
    #[arg(long, env = "PAGESPLIT_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Regions must be wider than this many pixels.
    #[arg(long, env = "PAGESPLIT_MIN_WIDTH", default_value_t = 400)]
    min_width: u32,

    /// Regions must be taller than this many pixels.
    #[arg(long, env = "PAGESPLIT_MIN_HEIGHT", default_value_t = 400)]
    min_height: u32,

    /// Output page size in pixels, WIDTHxHEIGHT.
    #[arg(long, env = "PAGESPLIT_PAGE_SIZE", default_value = "1240x1754",
          value_parser = parse_page_size)]
    page_size: PageSize,

    /// Letterbox colour as RRGGBB hex.
    #[arg(long, env = "PAGESPLIT_BACKGROUND", default_value = "ffffff",
          value_parser = parse_background)]
    background: Background,

    /// Resolution recorded in the PDF (72–600).
    #[arg(long, env = "PAGESPLIT_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Embed pages as JPEG at this quality instead of lossless.
    #[arg(long, env = "PAGESPLIT_JPEG",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg: Option<u8>,

    /// Never enlarge regions smaller than the page.
    #[arg(long, env = "PAGESPLIT_NO_UPSCALE")]
    no_upscale: bool,

    /// Also write `page_<n>.png` previews into this directory.
    #[arg(long, env = "PAGESPLIT_PREVIEWS")]
    previews: Option<PathBuf>,

    /// Print detected regions only; write nothing.
    #[arg(long)]
    detect_only: bool,

    /// Print a JSON report instead of human-readable lines.
    #[arg(long, env = "PAGESPLIT_JSON")]
    json: bool,

    /// Number of images processed concurrently.
    #[arg(short, long, env = "PAGESPLIT_JOBS", default_value_t = 4)]
    jobs: usize,

    /// Disable progress bar.
    #[arg(long, env = "PAGESPLIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAGESPLIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAGESPLIT_QUIET")]
    quiet: bool,
}

/// Where one input's PDF and previews go.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Destination {
    pdf: PathBuf,
    previews: Option<PathBuf>,
}

/// Result of one input, for reporting.
enum Outcome {
    Split {
        pdf: PathBuf,
        report: pagesplit::SplitReport,
        previews: Vec<PathBuf>,
    },
    Detected(Vec<pagesplit::PageRegion>),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!("--output takes a single input; use --out-dir for several");
    }

    let base_config = build_config(&cli)?;
    let destinations = plan_destinations(&cli)?;
    let bar = show_progress.then(|| progress_bar(cli.inputs.len()));

    // ── Run every input independently ────────────────────────────────────
    let jobs = cli.inputs.iter().cloned().zip(destinations).enumerate();
    let mut results: Vec<(usize, PathBuf, Result<Outcome, SplitError>)> =
        stream::iter(jobs.map(|(index, (input, dest))| {
            let mut config = base_config.clone();
            if let Some(ref bar) = bar {
                let cb: ProgressCallback = Arc::new(CliProgressCallback {
                    bar: bar.clone(),
                    label: display_name(&input),
                });
                config.progress_callback = Some(cb);
            }
            let cli = &cli;
            let bar = bar.clone();
            async move {
                let result = process_one(cli, &input, &dest, &config).await;
                if let Some(bar) = bar {
                    bar.inc(1);
                }
                (index, input, result)
            }
        }))
        .buffer_unordered(cli.jobs.max(1))
        .collect()
        .await;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    // Report in the order the inputs were given.
    results.sort_by_key(|(index, _, _)| *index);
    let results: Vec<(PathBuf, Result<Outcome, SplitError>)> = results
        .into_iter()
        .map(|(_, input, result)| (input, result))
        .collect();

    report(&cli, &results)?;

    let fatal = results
        .iter()
        .any(|(_, r)| matches!(r, Err(e) if !e.is_recoverable()));
    let no_pages = results
        .iter()
        .any(|(_, r)| matches!(r, Err(e) if e.is_recoverable()));

    Ok(if fatal {
        ExitCode::FAILURE
    } else if no_pages {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

/// Read, split, and write one input.
async fn process_one(
    cli: &Cli,
    input: &Path,
    dest: &Destination,
    config: &SplitConfig,
) -> Result<Outcome, SplitError> {
    let bytes = read_input(input)?;

    if cli.detect_only {
        let config = config.clone();
        let regions = tokio::task::spawn_blocking(move || detect_pages(&bytes, &config))
            .await
            .map_err(|e| SplitError::Internal(format!("Detect task panicked: {e}")))??;
        return Ok(Outcome::Detected(regions));
    }

    let output = split_async(bytes, config).await?;

    save_document(&output.document, &dest.pdf)?;

    let previews = match dest.previews {
        Some(ref dir) => write_previews(&output.pages, dir)?,
        None => Vec::new(),
    };

    Ok(Outcome::Split {
        pdf: dest.pdf.clone(),
        report: output.report(),
        previews,
    })
}

fn report(cli: &Cli, results: &[(PathBuf, Result<Outcome, SplitError>)]) -> Result<()> {
    if cli.json {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(input, result)| match result {
                Ok(Outcome::Split {
                    pdf,
                    report,
                    previews,
                }) => serde_json::json!({
                    "input": input,
                    "output": pdf,
                    "previews": previews,
                    "report": report,
                }),
                Ok(Outcome::Detected(regions)) => serde_json::json!({
                    "input": input,
                    "regions": regions,
                }),
                Err(e) => serde_json::json!({
                    "input": input,
                    "error": e.to_string(),
                    "no_pages_detected": e.is_recoverable(),
                }),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("Failed to serialise report")?
        );
        return Ok(());
    }

    for (input, result) in results {
        let name = display_name(input);
        match result {
            Ok(Outcome::Split { pdf, report, .. }) => {
                if !cli.quiet {
                    eprintln!(
                        "{} {}  {} pages  {}  →  {}",
                        green("✔"),
                        name,
                        bold(&report.page_count.to_string()),
                        dim(&format!("{}ms", report.stats.total_duration_ms)),
                        bold(&pdf.display().to_string()),
                    );
                }
            }
            Ok(Outcome::Detected(regions)) => {
                println!("{name}: {} pages", regions.len());
                for r in regions {
                    println!(
                        "  page {:>3}: {}x{} at ({}, {})",
                        r.rank + 1,
                        r.bbox.width,
                        r.bbox.height,
                        r.bbox.x,
                        r.bbox.y
                    );
                }
            }
            Err(e) if e.is_recoverable() => {
                eprintln!("{} {}  {}", yellow("⚠"), name, e);
            }
            Err(e) => {
                eprintln!("{} {}  {}", red("✘"), name, e);
            }
        }
    }
    Ok(())
}

/// Map CLI args to `SplitConfig`.
fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let encoding = match cli.jpeg {
        Some(quality) => PageEncoding::Jpeg { quality },
        None => PageEncoding::Flate,
    };

    SplitConfig::builder()
        .min_page_size(cli.min_width, cli.min_height)
        .target_size(cli.page_size)
        .background(cli.background)
        .dpi(cli.dpi)
        .allow_upscale(!cli.no_upscale)
        .page_encoding(encoding)
        .build()
        .context("Invalid configuration")
}

/// Work out every input's PDF path and preview directory up front.
///
/// Inputs sharing a file stem (`a.png`, `a.jpg`) are told apart by their
/// extension. Anything still colliding after that, such as the same file
/// given twice or equal names from different directories with `--out-dir`,
/// is rejected before any work starts.
fn plan_destinations(cli: &Cli) -> Result<Vec<Destination>> {
    let destinations: Vec<Destination> = cli
        .inputs
        .iter()
        .map(|input| {
            let label = output_label(input, &cli.inputs);
            let pdf = match (&cli.output, &cli.out_dir) {
                (Some(out), _) => out.clone(),
                (None, Some(dir)) => dir.join(format!("{label}_split.pdf")),
                (None, None) => input.with_file_name(format!("{label}_split.pdf")),
            };
            let previews = cli.previews.as_ref().map(|dir| {
                if cli.inputs.len() > 1 {
                    dir.join(&label)
                } else {
                    dir.clone()
                }
            });
            Destination { pdf, previews }
        })
        .collect();

    if cli.detect_only {
        return Ok(destinations);
    }

    for (i, a) in destinations.iter().enumerate() {
        for (j, b) in destinations.iter().enumerate().skip(i + 1) {
            if a.pdf == b.pdf {
                anyhow::bail!(
                    "'{}' and '{}' would both be written to '{}'",
                    cli.inputs[i].display(),
                    cli.inputs[j].display(),
                    a.pdf.display()
                );
            }
            if let (Some(pa), Some(pb)) = (&a.previews, &b.previews) {
                if pa == pb {
                    anyhow::bail!(
                        "'{}' and '{}' would both write previews into '{}'",
                        cli.inputs[i].display(),
                        cli.inputs[j].display(),
                        pa.display()
                    );
                }
            }
        }
    }
    Ok(destinations)
}

/// File stem of `input`, plus its extension when another input has the
/// same stem.
fn output_label(input: &Path, inputs: &[PathBuf]) -> String {
    let stem = file_stem(input);
    let shared = inputs
        .iter()
        .filter(|other| file_stem(other) == stem)
        .count()
        > 1;
    match input.extension() {
        Some(ext) if shared => format!("{stem}_{}", ext.to_string_lossy()),
        _ => stem,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse `--page-size` as `WIDTHxHEIGHT`.
fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let (w, h) = s
        .trim()
        .to_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: u32 = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
    if w == 0 || h == 0 {
        return Err(format!("page size must be non-zero, got {w}x{h}"));
    }
    Ok(PageSize::new(w, h))
}

/// Parse `--background` as `RRGGBB` (leading `#` allowed).
fn parse_background(s: &str) -> Result<Background, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("invalid hex colour '{s}'"))
    };
    Ok(Background([channel(0)?, channel(2)?, channel(4)?]))
}
