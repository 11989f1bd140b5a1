//! Submission boundary: extension routing and payload accounting.
//!
//! Only `.docx` and `.pdf` are routed to a checker. Routing happens on the
//! lower-cased filename BEFORE any bytes are touched, so a mis-named upload
//! is rejected without a parse attempt. The payload ceiling is likewise
//! enforced over the whole submission up front.

use crate::document::NormalizedDocument;
use crate::error::DocumentError;

/// The document type a filename declares.
///
/// Declared, not detected: a `.docx` extension on a PDF byte stream routes
/// to the DOCX adapter, which then fails with an unreadable-document report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Docx,
    Pdf,
}

impl DeclaredType {
    /// Route a filename to a checker, case-insensitively.
    ///
    /// `None` means the extension is unsupported and the submission layer
    /// should reject the file without parsing it.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".docx") {
            Some(DeclaredType::Docx)
        } else if lower.ends_with(".pdf") {
            Some(DeclaredType::Pdf)
        } else {
            None
        }
    }
}

/// One file of a submission: the name the uploader gave it plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Total submission size, checked against the payload ceiling before any
/// per-file processing starts.
pub fn total_payload(files: &[UploadedFile]) -> u64 {
    files.iter().map(|f| f.bytes.len() as u64).sum()
}

/// Parse raw bytes as the declared type.
pub fn parse(bytes: &[u8], declared: DeclaredType) -> Result<NormalizedDocument, DocumentError> {
    match declared {
        DeclaredType::Docx => super::docx::parse_docx(bytes).map(NormalizedDocument::Docx),
        DeclaredType::Pdf => super::pdf::parse_pdf(bytes).map(NormalizedDocument::Pdf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_case_insensitive() {
        assert_eq!(DeclaredType::from_filename("Thesis.DOCX"), Some(DeclaredType::Docx));
        assert_eq!(DeclaredType::from_filename("paper.Pdf"), Some(DeclaredType::Pdf));
        assert_eq!(DeclaredType::from_filename("skripsi.docx"), Some(DeclaredType::Docx));
    }

    #[test]
    fn unsupported_extensions_are_not_routed() {
        assert_eq!(DeclaredType::from_filename("notes.txt"), None);
        assert_eq!(DeclaredType::from_filename("archive.docx.zip"), None);
        assert_eq!(DeclaredType::from_filename(""), None);
        // Old binary Word format is NOT supported
        assert_eq!(DeclaredType::from_filename("legacy.doc"), None);
    }

    #[test]
    fn payload_total_sums_all_files() {
        let files = vec![
            UploadedFile::new("a.docx", vec![0u8; 10]),
            UploadedFile::new("b.pdf", vec![0u8; 32]),
        ];
        assert_eq!(total_payload(&files), 42);
    }

    #[test]
    fn mis_declared_bytes_fail_as_unreadable() {
        let err = parse(b"%PDF-1.5 not a zip", DeclaredType::Docx).unwrap_err();
        assert!(matches!(err, DocumentError::UnreadableDocx { .. }));
    }
}
