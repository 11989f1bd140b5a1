//! Normalized in-memory document model.
//!
//! Both adapters reduce their source format to the small slice of formatting
//! the rubric cares about: who says what in which font, at which size, with
//! which spacing, inside which margins. Everything else (styles, images,
//! tables, math) is dropped at parse time.
//!
//! A [`NormalizedDocument`] is built once per upload and owned exclusively by
//! the checking pipeline for that request; nothing is shared across requests
//! and nothing is persisted.

/// A parsed document, normalized for rule checking and feature extraction.
///
/// The two variants deliberately keep their own shapes: the DOCX formatting
/// model is paragraph/run-oriented with section margins, while PDF text is a
/// flat sequence of styled spans per page with no margin information at all.
#[derive(Debug, Clone)]
pub enum NormalizedDocument {
    Docx(DocxDocument),
    Pdf(PdfDocument),
}

// ── DOCX model ───────────────────────────────────────────────────────────

/// Body-level paragraphs plus the first section's page margins.
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    pub paragraphs: Vec<Paragraph>,
    /// `None` when the document has no section properties; the rule checker
    /// reports margins as uncheckable in that case.
    pub margins: Option<PageMargins>,
}

/// One `w:p` element: its runs and the paragraph-level line spacing.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    /// Line spacing as a multiple (1.5 = one-and-a-half) for `auto` spacing,
    /// or in points for `exact`/`atLeast` rules. `None` when unset.
    pub line_spacing: Option<f64>,
}

impl Paragraph {
    /// Concatenated run text, used for violation-message previews.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// One `w:r` element with its directly-applied character formatting.
///
/// Formatting inherited from styles is NOT resolved; a run with no explicit
/// `w:rFonts`/`w:sz` carries `None` here, and the checker treats each case
/// per its own rule (absent font = mismatch, absent size = skipped).
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub text: String,
    pub font_name: Option<String>,
    pub font_size_pt: Option<f64>,
}

/// Page margins of a section, in centimeters.
///
/// All four sides are always present together; a source that cannot provide
/// them yields no `PageMargins` at all (the PDF path never produces one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub left_cm: f64,
    pub right_cm: f64,
    pub top_cm: f64,
    pub bottom_cm: f64,
}

// ── PDF model ────────────────────────────────────────────────────────────

/// Text spans per page, extracted from the content streams.
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
}

/// One page's text spans. `number` is 1-indexed, as shown in messages.
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub number: usize,
    pub spans: Vec<TextSpan>,
}

/// A run of text shown under one `Tf` font selection.
///
/// `font` is the raw-cased BaseFont name (subset prefixes included); callers
/// lower-case for matching. `size` is the `Tf` operand, no implicit default.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub font: String,
    pub size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_text_concatenates_runs() {
        let para = Paragraph {
            runs: vec![
                Run { text: "Hello ".into(), ..Default::default() },
                Run { text: "world".into(), ..Default::default() },
            ],
            line_spacing: None,
        };
        assert_eq!(para.text(), "Hello world");
    }

    #[test]
    fn empty_paragraph_has_empty_text() {
        assert_eq!(Paragraph::default().text(), "");
    }
}
