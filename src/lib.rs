//! # metadoc
//!
//! Validate uploaded `.docx` and `.pdf` documents against a fixed academic
//! formatting rubric (font family, font size, line spacing, page margins)
//! and report per-document pass/fail with human-readable diagnostics.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes
//!  │
//!  ├─ 1. Route     extension routing + payload ceiling (no parse yet)
//!  ├─ 2. Normalize DOCX (zip + XML walk) or PDF (content-stream walk)
//!  ├─ 3. Rules     fixed rubric → ordered violation messages + pass/fail
//!  ├─ 4. Features  font histogram, size variance, spacings, margins
//!  ├─ 5. Vectorize reconcile features with the trained column schema
//!  └─ 6. Score     optional classifier verdict merged into the report
//! ```
//!
//! Steps 4–6 only run when classifier artifacts were loaded; their absence
//! disables ML scoring without affecting the rule-based checks, and any
//! scorer failure degrades to a failure note on that one document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metadoc::{check_batch, CheckConfig, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let files = vec![UploadedFile::new(
//!         "skripsi.docx",
//!         std::fs::read("skripsi.docx")?,
//!     )];
//!     let output = check_batch(files, &CheckConfig::default()).await?;
//!     for report in &output.reports {
//!         println!("{}: {}", report.filename, report.report.success);
//!         for message in &report.report.messages {
//!             println!("  - {message}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## The Rubric
//!
//! | Rule | DOCX | PDF |
//! |------|------|-----|
//! | Font | `Times New Roman`, exact per run | name contains `times new roman` |
//! | Size | 12 pt exact (absent = skipped) | 12 pt ± 0.5 |
//! | Spacing | 1.5 exact per paragraph | not applicable |
//! | Margins | 4/3/3/3 cm ± 0.1 (first section) | advisory: not checked |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `metadoc` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! metadoc = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod check;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use check::{check_batch, check_bytes, check_file, check_sync};
pub use config::{CheckConfig, CheckConfigBuilder, DEFAULT_MAX_PAYLOAD_BYTES};
pub use document::{
    DocxDocument, NormalizedDocument, PageMargins, Paragraph, PdfDocument, PdfPage, Run, TextSpan,
};
pub use error::{DocumentError, MetaDocError};
pub use model::{LinearScorer, ModelHandle, Prediction, Scorer, ScorerError};
pub use pipeline::input::{DeclaredType, UploadedFile};
pub use report::{BatchOutput, BatchStats, CheckReport, FileReport};
