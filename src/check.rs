//! Checking entry points.
//!
//! One submission = one strictly sequential pass over its files; each file
//! runs the full pipeline (parse → rules → features → vectorize → score)
//! independently, and any per-document failure degrades to a failed report
//! for that document only — sibling documents always keep processing.
//!
//! The CPU-bound pipeline runs inside `spawn_blocking` so the async entry
//! points never stall a runtime worker thread on a large document.

use crate::config::CheckConfig;
use crate::document::NormalizedDocument;
use crate::error::{DocumentError, MetaDocError};
use crate::model::ModelHandle;
use crate::pipeline::input::{self, DeclaredType, UploadedFile};
use crate::pipeline::{features, rules, vectorize};
use crate::report::{BatchOutput, BatchStats, CheckReport, FileReport};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Synthetic report for an empty submission.
const NO_FILES: &str = "Tidak ada file yang diunggah.";
/// Synthetic-report filename for an oversized submission.
const TOO_LARGE: &str = "File terlalu besar.";
/// Synthetic-report message for an oversized submission.
const TOO_LARGE_DETAIL: &str = "File terlalu besar. Maksimal 50MB.";

/// Check one or more uploaded files against the rubric.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutput)` with one report per processed file. Per-document
/// failures (corrupt file, wrong extension, classifier error) appear as
/// failed reports, never as `Err`.
///
/// # Errors
/// Returns `Err(MetaDocError)` only for fatal internal errors.
pub async fn check_batch(
    files: Vec<UploadedFile>,
    config: &CheckConfig,
) -> Result<BatchOutput, MetaDocError> {
    let start = Instant::now();

    // ── Step 1: Submission-level gates, before any parsing ───────────────
    if files.is_empty() {
        info!("Empty submission");
        return Ok(synthetic_batch(NO_FILES, NO_FILES, 0, start));
    }

    let payload = input::total_payload(&files);
    if payload > config.max_payload_bytes {
        warn!(
            "Submission of {} bytes exceeds the {} byte ceiling",
            payload, config.max_payload_bytes
        );
        return Ok(synthetic_batch(TOO_LARGE, TOO_LARGE_DETAIL, files.len(), start));
    }

    // ── Step 2: Sequential per-file pipeline ─────────────────────────────
    let total_files = files.len();
    let mut reports: Vec<FileReport> = Vec::with_capacity(total_files);
    let mut skipped = 0usize;

    for file in files {
        // Empty filename entries are silently skipped, not reported.
        if file.filename.is_empty() {
            skipped += 1;
            continue;
        }

        let report = match DeclaredType::from_filename(&file.filename) {
            None => {
                let err = DocumentError::UnsupportedExtension {
                    filename: file.filename.clone(),
                };
                debug!("{err}");
                CheckReport::failed(err.user_message())
            }
            Some(declared) => check_bytes(file.bytes, declared, config).await?,
        };
        reports.push(report.into_file_report(file.filename));
    }

    // ── Step 3: Aggregate ────────────────────────────────────────────────
    let passed = reports.iter().filter(|r| r.report.success).count();
    let failed = reports.len() - passed;
    let stats = BatchStats {
        total_files,
        passed,
        failed,
        skipped,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Checked {} files: {} passed, {} failed, {} skipped in {}ms",
        total_files, passed, failed, skipped, stats.duration_ms
    );

    Ok(BatchOutput { reports, stats })
}

/// Check a single document's bytes as the declared type.
///
/// Parsing and rule evaluation run on the blocking thread pool. A document
/// that cannot be parsed yields a failed report, not an `Err`.
pub async fn check_bytes(
    bytes: Vec<u8>,
    declared: DeclaredType,
    config: &CheckConfig,
) -> Result<CheckReport, MetaDocError> {
    let model = config.model.clone();
    tokio::task::spawn_blocking(move || check_bytes_blocking(&bytes, declared, model.as_ref()))
        .await
        .map_err(|e| MetaDocError::Internal(format!("Check task panicked: {e}")))
}

/// Check a document on disk, routing on its filename.
///
/// # Errors
/// I/O problems reading the file are fatal (`FileNotFound`,
/// `PermissionDenied`, `ReadFailed`); everything downstream degrades to a
/// failed report as usual.
pub async fn check_file(
    path: impl AsRef<Path>,
    config: &CheckConfig,
) -> Result<FileReport, MetaDocError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let Some(declared) = DeclaredType::from_filename(&filename) else {
        let err = DocumentError::UnsupportedExtension {
            filename: filename.clone(),
        };
        return Ok(CheckReport::failed(err.user_message()).into_file_report(filename));
    };

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MetaDocError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => MetaDocError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => MetaDocError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if bytes.len() as u64 > config.max_payload_bytes {
        return Ok(CheckReport::failed(TOO_LARGE_DETAIL).into_file_report(filename));
    }

    let report = check_bytes(bytes, declared, config).await?;
    Ok(report.into_file_report(filename))
}

/// Synchronous wrapper around [`check_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn check_sync(
    files: Vec<UploadedFile>,
    config: &CheckConfig,
) -> Result<BatchOutput, MetaDocError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MetaDocError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(check_batch(files, config))
}

// ── Internal pipeline ────────────────────────────────────────────────────

/// The full single-document pipeline, on the blocking pool.
fn check_bytes_blocking(
    bytes: &[u8],
    declared: DeclaredType,
    model: Option<&ModelHandle>,
) -> CheckReport {
    let doc = match input::parse(bytes, declared) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("{e}");
            return CheckReport::failed(e.user_message());
        }
    };

    let mut report = rules::check(&doc);

    if let Some(model) = model {
        apply_model(model, &doc, declared, &mut report);
    }
    report
}

/// Score the document and merge the verdict into the rule report.
///
/// A scorer failure is isolated: the rule-based messages stay untouched, a
/// generic failure note is appended, and the report is forced to failed.
fn apply_model(
    model: &ModelHandle,
    doc: &NormalizedDocument,
    declared: DeclaredType,
    report: &mut CheckReport,
) {
    let features = features::extract(doc);
    let row = vectorize::vectorize(&features, model.columns());

    match model.score(&row) {
        Ok(prediction) => {
            let message = if prediction.label {
                "Dokumen sesuai dengan kriteria (Prediksi ML: Correct)."
            } else {
                "Dokumen tidak sesuai dengan kriteria (Prediksi ML: Incorrect)."
            };
            report.messages.push(message.to_string());
            report.confidence = Some(format!("{:.2}%", prediction.confidence * 100.0));
            report.success = report.success && prediction.label;
        }
        Err(e) => {
            let failure = DocumentError::ClassifierFailure {
                detail: e.to_string(),
            };
            warn!("{failure}");
            report.messages.push(ml_failure_message(declared).to_string());
            report.success = false;
        }
    }
}

fn ml_failure_message(declared: DeclaredType) -> &'static str {
    match declared {
        DeclaredType::Docx => "Gagal melakukan prediksi ML pada dokumen.",
        DeclaredType::Pdf => "Gagal melakukan prediksi ML pada dokumen PDF.",
    }
}

/// A batch consisting of one synthetic failed report.
fn synthetic_batch(filename: &str, message: &str, total_files: usize, start: Instant) -> BatchOutput {
    BatchOutput {
        reports: vec![CheckReport::failed(message).into_file_report(filename)],
        stats: BatchStats {
            total_files,
            passed: 0,
            failed: 1,
            skipped: 0,
            duration_ms: start.elapsed().as_millis() as u64,
        },
    }
}
