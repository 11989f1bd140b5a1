//! Rule checker: applies the fixed academic formatting rubric.
//!
//! The rubric (all values institutional, none configurable):
//!
//! * Font: Times New Roman everywhere
//! * Size: 12 pt (±0.5 pt for PDF, where sizes are floats from `Tf`)
//! * Line spacing: exactly 1.5 (DOCX only)
//! * Margins: left 4.0 cm, right/top/bottom 3.0 cm, ±0.1 cm (DOCX only)
//!
//! The two variants share one contract — `check(&NormalizedDocument)` —
//! and accumulate violations instead of short-circuiting, so a report lists
//! every offending paragraph. Inside one paragraph's run loop, however, the
//! FIRST font or size violation ends the scan for that paragraph: one
//! message per paragraph per run-level rule, and a font mismatch on a run
//! skips that same run's size check.
//!
//! Messages are user-facing Indonesian diagnostics with a 30-character text
//! preview locating the violation.

use crate::document::{DocxDocument, NormalizedDocument, PageMargins, PdfDocument};
use crate::report::CheckReport;

/// Required font family, compared exactly (case-sensitive) for DOCX runs.
pub const EXPECTED_FONT: &str = "Times New Roman";
/// Required font size in points.
pub const EXPECTED_FONT_SIZE_PT: f64 = 12.0;
/// Required line spacing multiple.
pub const EXPECTED_LINE_SPACING: f64 = 1.5;

/// Required margins in centimeters: (label, left/right/top/bottom accessor).
const EXPECTED_LEFT_CM: f64 = 4.0;
const EXPECTED_RIGHT_CM: f64 = 3.0;
const EXPECTED_TOP_CM: f64 = 3.0;
const EXPECTED_BOTTOM_CM: f64 = 3.0;
/// Margin tolerance in centimeters.
const MARGIN_TOLERANCE_CM: f64 = 0.1;

/// PDF font names are matched as a lower-cased substring.
const PDF_FONT_NEEDLE: &str = "times new roman";
/// PDF size tolerance in points.
const PDF_SIZE_TOLERANCE_PT: f64 = 0.5;

/// Characters of context quoted in a violation message.
const PREVIEW_CHARS: usize = 30;

/// Check a normalized document against the rubric.
pub fn check(doc: &NormalizedDocument) -> CheckReport {
    match doc {
        NormalizedDocument::Docx(docx) => check_docx(docx),
        NormalizedDocument::Pdf(pdf) => check_pdf(pdf),
    }
}

// ── DOCX variant ─────────────────────────────────────────────────────────

/// Evaluate the DOCX rubric: per-run font/size, per-paragraph spacing, and
/// the first section's margins.
pub fn check_docx(doc: &DocxDocument) -> CheckReport {
    let mut messages = Vec::new();
    let mut success = true;

    for para in &doc.paragraphs {
        let quoted = preview(&para.text());

        for run in &para.runs {
            // An absent font is a mismatch: the rubric demands the font be
            // set explicitly, not inherited from a style.
            if run.font_name.as_deref() != Some(EXPECTED_FONT) {
                messages.push(format!("Font tidak sesuai di paragraf: \"{quoted}...\""));
                success = false;
                break;
            }
            // An absent size is skipped; a present size must be exact.
            if let Some(size) = run.font_size_pt {
                if size != EXPECTED_FONT_SIZE_PT {
                    messages.push(format!(
                        "Ukuran font tidak sesuai di paragraf: \"{quoted}...\""
                    ));
                    success = false;
                    break;
                }
            }
        }

        // Spacing is evaluated independently of the run loop: every
        // offending paragraph is reported.
        if let Some(spacing) = para.line_spacing {
            if spacing != EXPECTED_LINE_SPACING {
                messages.push(format!("Spasi tidak sesuai di paragraf: \"{quoted}...\""));
                success = false;
            }
        }
    }

    match doc.margins {
        Some(margins) => check_margins(&margins, &mut messages, &mut success),
        None => {
            messages.push("Tidak dapat memeriksa margin.".to_string());
            success = false;
        }
    }

    CheckReport {
        success,
        messages,
        confidence: None,
    }
}

/// Each side is checked independently; every violation quotes the actual
/// value at two decimals and the expected value.
fn check_margins(margins: &PageMargins, messages: &mut Vec<String>, success: &mut bool) {
    let sides = [
        ("kiri", margins.left_cm, EXPECTED_LEFT_CM),
        ("kanan", margins.right_cm, EXPECTED_RIGHT_CM),
        ("atas", margins.top_cm, EXPECTED_TOP_CM),
        ("bawah", margins.bottom_cm, EXPECTED_BOTTOM_CM),
    ];
    for (side, actual, expected) in sides {
        if (actual - expected).abs() > MARGIN_TOLERANCE_CM {
            messages.push(format!(
                "Margin {side} tidak sesuai: {actual:.2} cm (Diharapkan: {expected:.1} cm)"
            ));
            *success = false;
        }
    }
}

// ── PDF variant ──────────────────────────────────────────────────────────

/// Evaluate the PDF rubric per span across all pages.
///
/// Success is computed BEFORE the margin advisory is appended, so the
/// advisory — present in every PDF report — never flips an otherwise clean
/// result.
pub fn check_pdf(doc: &PdfDocument) -> CheckReport {
    let mut messages = Vec::new();

    for page in &doc.pages {
        for span in &page.spans {
            let font = span.font.to_lowercase();
            let quoted = preview(span.text.trim());

            if !font.contains(PDF_FONT_NEEDLE) {
                messages.push(format!(
                    "Font tidak sesuai di halaman {}: \"{quoted}...\"",
                    page.number
                ));
            }
            if (span.size - EXPECTED_FONT_SIZE_PT).abs() > PDF_SIZE_TOLERANCE_PT {
                messages.push(format!(
                    "Ukuran font tidak sesuai di halaman {}: \"{quoted}...\"",
                    page.number
                ));
            }
        }
    }

    let success = messages.is_empty();
    messages.push("Pemeriksaan margin pada PDF tidak dilakukan secara mendalam.".to_string());

    CheckReport {
        success,
        messages,
        confidence: None,
    }
}

/// First `PREVIEW_CHARS` characters (not bytes — previews may be non-ASCII).
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
