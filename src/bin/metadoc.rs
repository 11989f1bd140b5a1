//! CLI binary for metadoc.
//!
//! A thin shim over the library crate that maps CLI flags to `CheckConfig`
//! and prints per-file reports.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use metadoc::{
    check_file, BatchOutput, BatchStats, CheckConfig, CheckReport, FileReport, ModelHandle,
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check a single document
  metadoc skripsi.docx

  # Check a whole submission folder
  metadoc uploads/*.docx uploads/*.pdf

  # Machine-readable reports
  metadoc --json thesis.docx > report.json

  # Enable ML scoring with exported classifier artifacts
  metadoc --model-dir ./artifacts makalah.docx

  # Raise the payload ceiling for a large batch
  metadoc --max-payload-mb 200 archive/*.pdf

THE RUBRIC:
  Font          Times New Roman (exact per run; substring match for PDF)
  Size          12 pt (exact for DOCX; ±0.5 pt for PDF)
  Line spacing  1.5 (DOCX only)
  Margins       left 4 cm, right/top/bottom 3 cm, ±0.1 cm (DOCX only;
                PDF reports an advisory that margins were not checked)

CLASSIFIER ARTIFACTS (optional):
  --model-dir expects two JSON files exported from the trained model:
    document_classifier.json   {"coefficients": [...], "intercept": ...}
    model_columns.json         ["unique_fonts", "font_size_variance", ...]
  Missing or unreadable artifacts silently disable ML scoring; rule-based
  checks are unaffected.

ENVIRONMENT VARIABLES:
  METADOC_MODEL_DIR   Default for --model-dir
  RUST_LOG            Tracing filter (overrides -v/-q)

EXIT CODES:
  0  every document passed
  1  at least one document failed (or could not be read)
"#;

/// Check .docx/.pdf documents against the academic formatting rubric.
#[derive(Parser, Debug)]
#[command(
    name = "metadoc",
    version,
    about = "Check .docx/.pdf documents against the academic formatting rubric",
    long_about = "Validate .docx and .pdf documents against a fixed academic formatting rubric \
(font family, font size, line spacing, page margins) and report per-document pass/fail with \
human-readable diagnostics. Optionally scores each document with an exported classifier.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Documents to check (.docx or .pdf).
    files: Vec<PathBuf>,

    /// Output structured JSON reports instead of human-readable text.
    #[arg(long, env = "METADOC_JSON")]
    json: bool,

    /// Directory holding the classifier artifacts.
    #[arg(long, env = "METADOC_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Per-submission payload ceiling in megabytes.
    #[arg(long, env = "METADOC_MAX_PAYLOAD_MB", default_value_t = 50)]
    max_payload_mb: u64,

    /// Disable progress bar.
    #[arg(long, env = "METADOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "METADOC_VERBOSE")]
    verbose: bool,

    /// Suppress per-message detail; print only the verdict lines.
    #[arg(short, long, env = "METADOC_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library logs go to stderr so --json output on stdout stays clean.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = CheckConfig::builder()
        .max_payload_bytes(cli.max_payload_mb.saturating_mul(1024 * 1024));
    if let Some(ref dir) = cli.model_dir {
        if let Some(model) = ModelHandle::load(dir) {
            builder = builder.model(model);
        } else if !cli.quiet {
            eprintln!(
                "{} no usable classifier artifacts in {} — rule checks only",
                cyan("ℹ"),
                dir.display()
            );
        }
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Check files sequentially ─────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.files.len() > 1;
    let bar = progress_bar(if show_progress { cli.files.len() } else { 0 });

    let start = Instant::now();
    let total_files = cli.files.len();
    let mut reports: Vec<FileReport> = Vec::with_capacity(total_files);

    for path in &cli.files {
        bar.set_message(path.display().to_string());
        let report = match check_file(path, &config).await {
            Ok(report) => report,
            // A file the CLI cannot read still gets a failed report so the
            // rest of the batch keeps going.
            Err(e) => {
                let filename = path.display().to_string();
                CheckReport::failed(e.to_string()).into_file_report(filename)
            }
        };
        reports.push(report);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let passed = reports.iter().filter(|r| r.report.success).count();
    let failed = reports.len() - passed;
    let output = BatchOutput {
        stats: BatchStats {
            total_files,
            passed,
            failed,
            skipped: 0,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        reports,
    };

    // ── Print ────────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize reports")?
        );
    } else {
        print_human(&output, cli.quiet);
    }

    if output.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    if len == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("Checking");
    bar
}

fn print_human(output: &BatchOutput, quiet: bool) {
    for file in &output.reports {
        if file.report.success {
            println!("{} {}", green("✓"), bold(&file.filename));
        } else {
            println!("{} {}", red("✗"), bold(&file.filename));
        }
        if !quiet {
            for message in &file.report.messages {
                println!("    • {message}");
            }
            if let Some(ref confidence) = file.report.confidence {
                println!("    {}", dim(&format!("confidence: {confidence}")));
            }
        }
    }

    let stats = &output.stats;
    let verdict = if stats.failed == 0 {
        green("✔")
    } else {
        red("✘")
    };
    eprintln!(
        "{} {} passed, {} failed  {}",
        verdict,
        bold(&stats.passed.to_string()),
        if stats.failed == 0 {
            stats.failed.to_string()
        } else {
            red(&stats.failed.to_string())
        },
        dim(&format!(
            "({} files in {} ms)",
            stats.total_files, stats.duration_ms
        )),
    );
}
