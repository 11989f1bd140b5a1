//! Feature extraction: aggregate descriptive statistics for the classifier.
//!
//! Walks the same normalized model as the rule checker but never judges it —
//! it only summarizes: which fonts appear and how often, how varied the
//! sizes are, how many distinct line spacings exist, and what the margins
//! are. The classifier decides what those numbers mean.
//!
//! The output is an explicit fixed-schema record; reconciliation with the
//! trained column layout happens in [`super::vectorize`].

use crate::document::{DocxDocument, NormalizedDocument, PdfDocument};

/// Font size assumed for a run that sets none, for statistics only.
/// (The rule checker skips absent sizes instead of defaulting them.)
const DEFAULT_SIZE_PT: f64 = 12.0;

/// Placeholder font name for runs with no explicit font.
const UNKNOWN_FONT: &str = "Unknown";

/// Per-document descriptive statistics, computed once and consumed once by
/// the vectorizer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Number of distinct font names.
    pub unique_fonts: usize,
    /// Highest-occurrence font name; ties go to the first one seen.
    pub most_common_font: String,
    /// Sample standard deviation of the DISTINCT size values (not weighted
    /// by occurrence count); 0 with fewer than two distinct sizes.
    pub font_size_variance: f64,
    /// Number of distinct non-null line spacings. `None` on the PDF path,
    /// where the concept does not exist; the vectorizer reconciles it to 0.
    pub unique_line_spacings: Option<usize>,
    pub left_margin_cm: f64,
    pub right_margin_cm: f64,
    pub top_margin_cm: f64,
    pub bottom_margin_cm: f64,
}

/// Extract features from a normalized document.
pub fn extract(doc: &NormalizedDocument) -> FeatureVector {
    match doc {
        NormalizedDocument::Docx(docx) => extract_docx(docx),
        NormalizedDocument::Pdf(pdf) => extract_pdf(pdf),
    }
}

/// DOCX features: fonts and sizes per run, spacings per paragraph, margins
/// from the first section (zeros when there is none).
pub fn extract_docx(doc: &DocxDocument) -> FeatureVector {
    let mut fonts = Histogram::default();
    let mut sizes = DistinctValues::default();
    let mut spacings = DistinctValues::default();

    for para in &doc.paragraphs {
        for run in &para.runs {
            fonts.add(
                run.font_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FONT.to_string()),
            );
            sizes.add(run.font_size_pt.unwrap_or(DEFAULT_SIZE_PT));
        }
        if let Some(spacing) = para.line_spacing {
            spacings.add(spacing);
        }
    }

    let (left, right, top, bottom) = match doc.margins {
        Some(m) => (m.left_cm, m.right_cm, m.top_cm, m.bottom_cm),
        None => (0.0, 0.0, 0.0, 0.0),
    };

    FeatureVector {
        unique_fonts: fonts.len(),
        most_common_font: fonts
            .dominant()
            .unwrap_or(UNKNOWN_FONT)
            .to_string(),
        font_size_variance: sample_std(sizes.values()),
        unique_line_spacings: Some(spacings.len()),
        left_margin_cm: left,
        right_margin_cm: right,
        top_margin_cm: top,
        bottom_margin_cm: bottom,
    }
}

/// PDF features: fonts (raw-cased) and sizes per span; margins hard-zero
/// since extraction is unsupported, spacing absent entirely.
pub fn extract_pdf(doc: &PdfDocument) -> FeatureVector {
    let mut fonts = Histogram::default();
    let mut sizes = DistinctValues::default();

    for page in &doc.pages {
        for span in &page.spans {
            fonts.add(span.font.clone());
            sizes.add(span.size);
        }
    }

    FeatureVector {
        unique_fonts: fonts.len(),
        most_common_font: fonts
            .dominant()
            .unwrap_or(UNKNOWN_FONT)
            .to_string(),
        font_size_variance: sample_std(sizes.values()),
        unique_line_spacings: None,
        left_margin_cm: 0.0,
        right_margin_cm: 0.0,
        top_margin_cm: 0.0,
        bottom_margin_cm: 0.0,
    }
}

// ── Accumulators ─────────────────────────────────────────────────────────

/// Occurrence counts in first-seen order, so a count tie is broken toward
/// the font that appeared earliest in the document.
#[derive(Debug, Default)]
struct Histogram {
    entries: Vec<(String, usize)>,
}

impl Histogram {
    fn add(&mut self, key: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 += 1;
        } else {
            self.entries.push((key, 1));
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dominant(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k.as_str())
    }
}

/// Distinct f64 values in first-seen order (bit equality; NaN never enters).
#[derive(Debug, Default)]
struct DistinctValues {
    values: Vec<f64>,
}

impl DistinctValues {
    fn add(&mut self, value: f64) {
        if !self.values.iter().any(|v| v.to_bits() == value.to_bits()) {
            self.values.push(value);
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Sample standard deviation (n − 1 denominator); 0 for fewer than two
/// values, where the statistic is undefined.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (sum_sq / (n - 1.0)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PageMargins, Paragraph, PdfPage, Run, TextSpan};

    fn run(font: Option<&str>, size: Option<f64>) -> Run {
        Run {
            text: "x".into(),
            font_name: font.map(String::from),
            font_size_pt: size,
        }
    }

    fn docx(paragraphs: Vec<Paragraph>, margins: Option<PageMargins>) -> DocxDocument {
        DocxDocument { paragraphs, margins }
    }

    #[test]
    fn dominant_font_is_highest_count() {
        let doc = docx(
            vec![Paragraph {
                runs: vec![
                    run(Some("Arial"), Some(12.0)),
                    run(Some("Times New Roman"), Some(12.0)),
                    run(Some("Times New Roman"), Some(12.0)),
                ],
                line_spacing: None,
            }],
            None,
        );
        let features = extract_docx(&doc);
        assert_eq!(features.unique_fonts, 2);
        assert_eq!(features.most_common_font, "Times New Roman");
    }

    #[test]
    fn dominant_font_tie_goes_to_first_seen() {
        let doc = docx(
            vec![Paragraph {
                runs: vec![run(Some("Arial"), None), run(Some("Calibri"), None)],
                line_spacing: None,
            }],
            None,
        );
        assert_eq!(extract_docx(&doc).most_common_font, "Arial");
    }

    #[test]
    fn empty_document_is_unknown_with_zero_variance() {
        let features = extract_docx(&docx(vec![], None));
        assert_eq!(features.unique_fonts, 0);
        assert_eq!(features.most_common_font, "Unknown");
        assert_eq!(features.font_size_variance, 0.0);
        assert_eq!(features.unique_line_spacings, Some(0));
    }

    #[test]
    fn absent_font_counts_as_unknown_and_absent_size_as_twelve() {
        let doc = docx(
            vec![Paragraph {
                runs: vec![run(None, None), run(None, Some(12.0))],
                line_spacing: None,
            }],
            None,
        );
        let features = extract_docx(&doc);
        assert_eq!(features.unique_fonts, 1);
        assert_eq!(features.most_common_font, "Unknown");
        // Both runs land on 12pt — a single distinct size, variance 0.
        assert_eq!(features.font_size_variance, 0.0);
    }

    #[test]
    fn variance_is_over_distinct_sizes_unweighted() {
        // Sizes 10, 12, 12, 12, 14 → distinct {10, 12, 14} → sample std 2.
        let doc = docx(
            vec![Paragraph {
                runs: vec![
                    run(Some("A"), Some(10.0)),
                    run(Some("A"), Some(12.0)),
                    run(Some("A"), Some(12.0)),
                    run(Some("A"), Some(12.0)),
                    run(Some("A"), Some(14.0)),
                ],
                line_spacing: None,
            }],
            None,
        );
        let features = extract_docx(&doc);
        assert!((features.font_size_variance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn line_spacings_count_distinct_non_null_values() {
        let doc = docx(
            vec![
                Paragraph { runs: vec![], line_spacing: Some(1.5) },
                Paragraph { runs: vec![], line_spacing: Some(1.5) },
                Paragraph { runs: vec![], line_spacing: Some(1.0) },
                Paragraph { runs: vec![], line_spacing: None },
            ],
            None,
        );
        assert_eq!(extract_docx(&doc).unique_line_spacings, Some(2));
    }

    #[test]
    fn docx_margins_are_copied_or_zeroed() {
        let with = extract_docx(&docx(
            vec![],
            Some(PageMargins {
                left_cm: 4.0,
                right_cm: 3.0,
                top_cm: 3.0,
                bottom_cm: 3.0,
            }),
        ));
        assert_eq!(with.left_margin_cm, 4.0);
        assert_eq!(with.bottom_margin_cm, 3.0);

        let without = extract_docx(&docx(vec![], None));
        assert_eq!(without.left_margin_cm, 0.0);
        assert_eq!(without.top_margin_cm, 0.0);
    }

    #[test]
    fn pdf_features_have_zero_margins_and_no_spacing() {
        let doc = PdfDocument {
            pages: vec![PdfPage {
                number: 1,
                spans: vec![
                    TextSpan { text: "a".into(), font: "TimesNewRomanPSMT".into(), size: 12.0 },
                    TextSpan { text: "b".into(), font: "ArialMT".into(), size: 10.0 },
                    TextSpan { text: "c".into(), font: "TimesNewRomanPSMT".into(), size: 12.0 },
                ],
            }],
        };
        let features = extract_pdf(&doc);
        assert_eq!(features.unique_fonts, 2);
        assert_eq!(features.most_common_font, "TimesNewRomanPSMT");
        assert!(features.font_size_variance > 0.0);
        assert_eq!(features.unique_line_spacings, None);
        assert_eq!(features.left_margin_cm, 0.0);
        assert_eq!(features.right_margin_cm, 0.0);
    }

    #[test]
    fn pdf_font_names_stay_raw_cased() {
        let doc = PdfDocument {
            pages: vec![PdfPage {
                number: 1,
                spans: vec![TextSpan { text: "x".into(), font: "ARIALMT".into(), size: 12.0 }],
            }],
        };
        assert_eq!(extract_pdf(&doc).most_common_font, "ARIALMT");
    }

    #[test]
    fn sample_std_edge_cases() {
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[12.0]), 0.0);
        assert!((sample_std(&[10.0, 14.0]) - std::f64::consts::SQRT_2 * 2.0).abs() < 1e-12);
    }
}
