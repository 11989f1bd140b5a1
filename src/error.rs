//! Error types for the metadoc library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MetaDocError`] — **Fatal**: the check cannot proceed at all (missing
//!   input file, corrupt classifier artifacts, invalid configuration).
//!   Returned as `Err(MetaDocError)` from the top-level `check*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (corrupt
//!   archive, wrong magic bytes, classifier refused the row) but other
//!   documents in the same submission are fine. The pipeline converts these
//!   into failed [`crate::report::FileReport`] entries so one bad upload
//!   never aborts its siblings.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the metadoc library.
///
/// Per-document failures use [`DocumentError`] and surface as failed report
/// entries rather than being propagated here.
#[derive(Debug, Error)]
pub enum MetaDocError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the file failed for a reason other than the two above.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Classifier artifact errors ────────────────────────────────────────
    /// A classifier artifact exists on disk but cannot be parsed.
    #[error("Classifier artifact '{path}' is unreadable: {detail}")]
    CorruptArtifact { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error scoped to a single document.
///
/// The checking pipeline catches every variant and degrades it to a failed
/// report entry; the remaining documents in the submission keep processing.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The byte stream could not be parsed as a `.docx` archive.
    #[error("not a readable .docx document: {detail}")]
    UnreadableDocx { detail: String },

    /// The byte stream could not be parsed as a PDF.
    #[error("not a readable PDF document: {detail}")]
    UnreadablePdf { detail: String },

    /// The filename carries an extension no checker is registered for.
    #[error("unsupported extension on '{filename}'")]
    UnsupportedExtension { filename: String },

    /// The classifier rejected the feature row or failed internally.
    #[error("classifier failure: {detail}")]
    ClassifierFailure { detail: String },
}

impl DocumentError {
    /// The user-facing diagnostic this failure contributes to a report.
    ///
    /// The `Display` impl above carries the technical detail for logs; these
    /// strings are the fixed wording shown to uploaders.
    pub fn user_message(&self) -> &'static str {
        match self {
            DocumentError::UnreadableDocx { .. } => {
                "Gagal membaca dokumen .docx. Pastikan file dalam format yang benar."
            }
            DocumentError::UnreadablePdf { .. } => "Gagal membaca dokumen PDF.",
            DocumentError::UnsupportedExtension { .. } => {
                "Silakan unggah file .docx atau .pdf saja."
            }
            DocumentError::ClassifierFailure { .. } => "Gagal melakukan prediksi ML pada dokumen.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = MetaDocError::FileNotFound {
            path: PathBuf::from("/tmp/missing.docx"),
        };
        assert!(e.to_string().contains("missing.docx"));
    }

    #[test]
    fn corrupt_artifact_display() {
        let e = MetaDocError::CorruptArtifact {
            path: PathBuf::from("model_columns.json"),
            detail: "expected array".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("model_columns.json"));
        assert!(msg.contains("expected array"));
    }

    #[test]
    fn document_error_display_is_non_empty() {
        let errors: &[DocumentError] = &[
            DocumentError::UnreadableDocx { detail: "bad zip".into() },
            DocumentError::UnreadablePdf { detail: "bad xref".into() },
            DocumentError::UnsupportedExtension { filename: "notes.txt".into() },
            DocumentError::ClassifierFailure { detail: "row length".into() },
        ];
        for e in errors {
            assert!(!e.to_string().is_empty(), "empty display for {e:?}");
            assert!(!e.user_message().is_empty());
        }
    }

    #[test]
    fn user_messages_are_the_fixed_report_wording() {
        let e = DocumentError::UnreadablePdf { detail: "xref".into() };
        assert_eq!(e.user_message(), "Gagal membaca dokumen PDF.");
        let e = DocumentError::UnsupportedExtension { filename: "a.txt".into() };
        assert_eq!(e.user_message(), "Silakan unggah file .docx atau .pdf saja.");
    }
}
