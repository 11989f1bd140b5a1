//! DOCX document-model adapter.
//!
//! A `.docx` file is a ZIP archive; the formatting the rubric cares about all
//! lives in `word/document.xml`:
//!
//! - `w:body/w:p` — paragraphs (body-level only; paragraphs inside `w:tbl`
//!   are out of scope for the rubric, as are headers/footers)
//! - `w:r/w:rPr/w:rFonts@w:ascii` — a run's explicit font
//! - `w:r/w:rPr/w:sz@w:val` — a run's explicit size, in half-points
//! - `w:pPr/w:spacing@w:line` (+ `@w:lineRule`) — paragraph line spacing
//! - `w:sectPr/w:pgMar` — page margins, in twips
//!
//! Formatting inherited from styles is NOT resolved: a run without explicit
//! run properties surfaces `None` for font and size, which is exactly what
//! the rule checker evaluates against.
//!
//! Parsed with a manual ZIP + streaming-XML walk; the walk keeps its location
//! flags and accumulators in a single state struct so each element handler
//! stays a small method.

use crate::document::{DocxDocument, PageMargins, Paragraph, Run};
use crate::error::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Twips (twentieths of a point) per centimeter: 1440 per inch, 2.54 cm each.
const TWIPS_PER_INCH: f64 = 1440.0;
const CM_PER_INCH: f64 = 2.54;

/// Parse raw bytes as a DOCX archive into the normalized model.
pub fn parse_docx(bytes: &[u8]) -> Result<DocxDocument, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::UnreadableDocx { detail: e.to_string() })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::UnreadableDocx {
            detail: format!("word/document.xml: {e}"),
        })?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::UnreadableDocx { detail: e.to_string() })?;

    let doc = walk_document(&xml)?;
    debug!(
        "Parsed docx: {} paragraphs, margins {}",
        doc.paragraphs.len(),
        if doc.margins.is_some() { "present" } else { "absent" }
    );
    Ok(doc)
}

/// Walk `word/document.xml` and collect paragraphs, runs, and margins.
pub(crate) fn walk_document(xml: &str) -> Result<DocxDocument, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut state = WalkState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                state.handle_container_start(e);
                state.handle_leaf(e);
            }
            Ok(Event::Empty(ref e)) => state.handle_leaf(e),
            Ok(Event::End(ref e)) => state.handle_container_end(e.name().as_ref()),
            Ok(Event::Text(ref t)) => {
                if state.in_text {
                    if let Some(run) = state.current_run.as_mut() {
                        run.text.push_str(&t.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::UnreadableDocx {
                    detail: format!("XML error at byte {}: {e}", reader.buffer_position()),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(DocxDocument {
        paragraphs: state.paragraphs,
        margins: state.margins,
    })
}

// ── XML attribute helpers ────────────────────────────────────────────────

/// Extract an attribute value by key from an element.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract an attribute value by key and parse as f64.
fn get_attr_f64(e: &BytesStart, key: &[u8]) -> Option<f64> {
    get_attr(e, key).and_then(|s| s.parse().ok())
}

fn twips_to_cm(twips: f64) -> f64 {
    twips / TWIPS_PER_INCH * CM_PER_INCH
}

// ── Walk state ───────────────────────────────────────────────────────────

/// State container for the document.xml walk.
#[derive(Default)]
struct WalkState {
    paragraphs: Vec<Paragraph>,
    margins: Option<PageMargins>,

    // Location tracking
    table_depth: usize,
    // w:p can nest (text boxes inside runs); only depth-1 body paragraphs
    // become model paragraphs.
    paragraph_depth: usize,
    in_paragraph_props: bool,
    in_run: bool,
    in_run_props: bool,
    in_text: bool,

    // Builders
    current_paragraph: Option<Paragraph>,
    current_run: Option<Run>,
}

impl WalkState {
    fn handle_container_start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:tbl" => self.table_depth += 1,
            // Body-level paragraphs only; table-cell paragraphs are skipped.
            b"w:p" => {
                self.paragraph_depth += 1;
                if self.table_depth == 0 && self.paragraph_depth == 1 {
                    self.current_paragraph = Some(Paragraph::default());
                }
            }
            b"w:pPr" => self.in_paragraph_props = true,
            b"w:r" if self.current_paragraph.is_some() => {
                self.in_run = true;
                self.current_run = Some(Run::default());
            }
            // w:rPr also appears under w:pPr (paragraph-mark formatting);
            // only run-level properties matter here.
            b"w:rPr" if self.in_run => self.in_run_props = true,
            b"w:t" if self.in_run => self.in_text = true,
            _ => {}
        }
    }

    fn handle_container_end(&mut self, name: &[u8]) {
        match name {
            b"w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            b"w:p" => {
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
                if self.paragraph_depth == 0 {
                    if let Some(para) = self.current_paragraph.take() {
                        self.paragraphs.push(para);
                    }
                }
            }
            b"w:pPr" => self.in_paragraph_props = false,
            b"w:r" => {
                self.in_run = false;
                if let Some(run) = self.current_run.take() {
                    if let Some(para) = self.current_paragraph.as_mut() {
                        para.runs.push(run);
                    }
                }
            }
            b"w:rPr" => self.in_run_props = false,
            b"w:t" => self.in_text = false,
            _ => {}
        }
    }

    /// Attribute-carrying leaf elements; emitted as either `Start` or `Empty`
    /// depending on the producer, so both event arms funnel here.
    fn handle_leaf(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:rFonts" if self.in_run_props => {
                if let Some(font) = get_attr(e, b"w:ascii") {
                    if let Some(run) = self.current_run.as_mut() {
                        run.font_name = Some(font);
                    }
                }
            }
            b"w:sz" if self.in_run_props => {
                // Half-points on the wire: w:val="24" is 12pt.
                if let Some(half_points) = get_attr_f64(e, b"w:val") {
                    if let Some(run) = self.current_run.as_mut() {
                        run.font_size_pt = Some(half_points / 2.0);
                    }
                }
            }
            // w:spacing under w:rPr is character spacing — not line spacing.
            b"w:spacing" if self.in_paragraph_props && !self.in_run_props => {
                if let Some(line) = get_attr_f64(e, b"w:line") {
                    let rule = get_attr(e, b"w:lineRule");
                    let spacing = match rule.as_deref() {
                        // "auto" (and no rule) means a multiple of single
                        // spacing, in 240ths; "exact"/"atLeast" are a fixed
                        // height in twips, surfaced in points.
                        None | Some("auto") => line / 240.0,
                        _ => line / 20.0,
                    };
                    if let Some(para) = self.current_paragraph.as_mut() {
                        para.line_spacing = Some(spacing);
                    }
                }
            }
            b"w:pgMar" if self.margins.is_none() => {
                // First w:sectPr in document order wins, whether it sits in
                // a paragraph's w:pPr (section break) or at body level.
                let sides = (
                    get_attr_f64(e, b"w:left"),
                    get_attr_f64(e, b"w:right"),
                    get_attr_f64(e, b"w:top"),
                    get_attr_f64(e, b"w:bottom"),
                );
                if let (Some(left), Some(right), Some(top), Some(bottom)) = sides {
                    self.margins = Some(PageMargins {
                        left_cm: twips_to_cm(left),
                        right_cm: twips_to_cm(right),
                        top_cm: twips_to_cm(top),
                        bottom_cm: twips_to_cm(bottom),
                    });
                }
            }
            b"w:tab" if self.in_run && !self.in_run_props => {
                if let Some(run) = self.current_run.as_mut() {
                    run.text.push('\t');
                }
            }
            b"w:br" | b"w:cr" if self.in_run => {
                if let Some(run) = self.current_run.as_mut() {
                    run.text.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wrap body XML in the document envelope the walker expects.
    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
        )
    }

    const SECT_A4_THESIS: &str = r#"<w:sectPr><w:pgMar w:top="1701" w:right="1701" w:bottom="1701" w:left="2268" w:header="709" w:footer="709" w:gutter="0"/></w:sectPr>"#;

    #[test]
    fn run_formatting_is_captured() {
        let xml = document_xml(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman"/><w:sz w:val="24"/></w:rPr><w:t>Bab I</w:t></w:r></w:p>"#,
        );
        let doc = walk_document(&xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        let run = &doc.paragraphs[0].runs[0];
        assert_eq!(run.text, "Bab I");
        assert_eq!(run.font_name.as_deref(), Some("Times New Roman"));
        assert_eq!(run.font_size_pt, Some(12.0));
    }

    #[test]
    fn unstyled_run_has_no_explicit_formatting() {
        let xml = document_xml(r#"<w:p><w:r><w:t>plain</w:t></w:r></w:p>"#);
        let doc = walk_document(&xml).unwrap();
        let run = &doc.paragraphs[0].runs[0];
        assert_eq!(run.font_name, None);
        assert_eq!(run.font_size_pt, None);
    }

    #[test]
    fn auto_line_spacing_is_a_multiple() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:spacing w:line="360" w:lineRule="auto"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = walk_document(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].line_spacing, Some(1.5));
    }

    #[test]
    fn exact_line_spacing_is_in_points() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:spacing w:line="360" w:lineRule="exact"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = walk_document(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].line_spacing, Some(18.0));
    }

    #[test]
    fn spacing_without_line_attr_is_ignored() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:spacing w:before="120" w:after="120"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = walk_document(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].line_spacing, None);
    }

    #[test]
    fn margins_convert_twips_to_cm() {
        let xml = document_xml(&format!("<w:p><w:r><w:t>x</w:t></w:r></w:p>{SECT_A4_THESIS}"));
        let doc = walk_document(&xml).unwrap();
        let margins = doc.margins.expect("sectPr present");
        assert!((margins.left_cm - 4.0).abs() < 0.01, "left: {}", margins.left_cm);
        assert!((margins.right_cm - 3.0).abs() < 0.01);
        assert!((margins.top_cm - 3.0).abs() < 0.01);
        assert!((margins.bottom_cm - 3.0).abs() < 0.01);
    }

    #[test]
    fn missing_sect_pr_leaves_margins_absent() {
        let xml = document_xml(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        let doc = walk_document(&xml).unwrap();
        assert!(doc.margins.is_none());
    }

    #[test]
    fn first_section_wins() {
        let body = format!(
            r#"<w:p><w:pPr>{SECT_A4_THESIS}</w:pPr></w:p><w:sectPr><w:pgMar w:top="720" w:right="720" w:bottom="720" w:left="720"/></w:sectPr>"#
        );
        let doc = walk_document(&document_xml(&body)).unwrap();
        let margins = doc.margins.unwrap();
        assert!((margins.left_cm - 4.0).abs() < 0.01);
    }

    #[test]
    fn table_paragraphs_are_skipped() {
        let body = r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>body</w:t></w:r></w:p>"#;
        let doc = walk_document(&document_xml(body)).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.paragraphs[0].text(), "body");
    }

    #[test]
    fn tabs_and_breaks_appear_in_text() {
        let body = r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#;
        let doc = walk_document(&document_xml(body)).unwrap();
        assert_eq!(doc.paragraphs[0].text(), "a\tb\nc");
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let err = parse_docx(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, DocumentError::UnreadableDocx { .. }));
    }

    #[test]
    fn zip_without_document_xml_is_unreadable() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/other.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = parse_docx(cursor.get_ref()).unwrap_err();
        assert!(matches!(err, DocumentError::UnreadableDocx { .. }));
    }
}
