//! PDF document-model adapter.
//!
//! Text is recovered straight from each page's content stream: the walk
//! tracks the active `Tf` font selection and collects the text-showing
//! operators (`Tj`, `'`, `"`, `TJ`) into [`TextSpan`]s. A span covers one
//! stretch of text in one font at one size; line-advance operators start a
//! new span so spans roughly follow visual lines. Non-text content (images,
//! paths) never produces a span.
//!
//! Font resource names are resolved to their `BaseFont` through the page's
//! (possibly inherited) `Resources` dictionary, with any `ABCDEF+` subset
//! prefix stripped. Span text is decoded lossily — it is only used for
//! 30-character message previews, never for layout.
//!
//! Page margins are deliberately not extracted; the rule checker reports PDF
//! margin checking as not performed.

use crate::document::{PdfDocument, PdfPage, TextSpan};
use crate::error::DocumentError;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use tracing::debug;

/// Parse raw bytes as a PDF into the normalized model.
pub fn parse_pdf(bytes: &[u8]) -> Result<PdfDocument, DocumentError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| DocumentError::UnreadablePdf { detail: e.to_string() })?;

    let mut pages = Vec::new();
    for (&number, &page_id) in doc.get_pages().iter() {
        let spans = extract_page_spans(&doc, page_id);
        pages.push(PdfPage {
            number: number as usize,
            spans,
        });
    }
    debug!(
        "Parsed pdf: {} pages, {} spans",
        pages.len(),
        pages.iter().map(|p| p.spans.len()).sum::<usize>()
    );
    Ok(PdfDocument { pages })
}

/// Walk one page's content stream into text spans.
///
/// A page whose content cannot be decoded yields no spans rather than
/// failing the document; the document-level `load_mem` already vouched for
/// overall structure.
fn extract_page_spans(doc: &Document, page_id: ObjectId) -> Vec<TextSpan> {
    let Ok(data) = doc.get_page_content(page_id) else {
        debug!("Page {:?}: unreadable content stream", page_id);
        return Vec::new();
    };
    let Ok(content) = Content::decode(&data) else {
        debug!("Page {:?}: undecodable content stream", page_id);
        return Vec::new();
    };

    let fonts = page_font_names(doc, page_id);
    let mut spans = Vec::new();
    let mut current = SpanBuilder::default();

    for op in &content.operations {
        match op.operator.as_ref() {
            "Tf" => {
                current.flush(&mut spans);
                if let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) {
                    current.font = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string());
                }
                if let Some(size) = op.operands.get(1).and_then(number) {
                    current.size = size;
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    current.push_bytes(bytes);
                }
            }
            // ' and " advance to the next line before showing their string.
            "'" => {
                current.flush(&mut spans);
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    current.push_bytes(bytes);
                }
            }
            "\"" => {
                current.flush(&mut spans);
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    current.push_bytes(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(elements)) = op.operands.first() {
                    for element in elements {
                        if let Object::String(bytes, _) = element {
                            current.push_bytes(bytes);
                        }
                        // Numbers are kerning adjustments; irrelevant here.
                    }
                }
            }
            // Line/position advances end the current span.
            "Td" | "TD" | "T*" | "Tm" | "BT" | "ET" => current.flush(&mut spans),
            _ => {}
        }
    }
    current.flush(&mut spans);
    spans
}

/// Accumulates text under one font selection until flushed.
struct SpanBuilder {
    font: String,
    size: f64,
    text: String,
}

impl Default for SpanBuilder {
    fn default() -> Self {
        Self {
            font: "Unknown".to_string(),
            size: 0.0,
            text: String::new(),
        }
    }
}

impl SpanBuilder {
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.text.push_str(&String::from_utf8_lossy(bytes));
    }

    fn flush(&mut self, spans: &mut Vec<TextSpan>) {
        if !self.text.is_empty() {
            spans.push(TextSpan {
                text: std::mem::take(&mut self.text),
                font: self.font.clone(),
                size: self.size,
            });
        }
    }
}

// ── Font resolution ──────────────────────────────────────────────────────

/// Map a page's font resource names (`F1`, `TT0`, …) to BaseFont strings.
fn page_font_names(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, String> {
    let mut map = HashMap::new();
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return map;
    };
    // Some PDFs hang Resources off the page tree rather than the page.
    let Some(resources) = inherited_dict(doc, page_dict, b"Resources") else {
        return map;
    };
    let Some(font_dict) = resources.get(b"Font").ok().and_then(|o| resolve_dict(doc, o))
    else {
        return map;
    };

    for (name, obj) in font_dict.iter() {
        let base = resolve_dict(doc, obj)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|b| strip_subset_prefix(&String::from_utf8_lossy(b)).to_string());
        map.insert(name.clone(), base.unwrap_or_else(|| "Unknown".to_string()));
    }
    map
}

/// Follow a reference to a dictionary, or use the dictionary in place.
fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Look up `key` on `dict`, walking up the `Parent` chain when absent.
fn inherited_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    if let Some(found) = dict.get(key).ok().and_then(|o| resolve_dict(doc, o)) {
        return Some(found);
    }
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    inherited_dict(doc, doc.get_dictionary(parent_id).ok()?, key)
}

/// Embedded subsets prefix the BaseFont with six uppercase letters and `+`
/// (`BAAAAA+TimesNewRomanPSMT`); the prefix is noise for font matching.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((prefix, rest))
            if prefix.len() == 6 && prefix.bytes().all(|b| b.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => name,
    }
}

/// Numeric operand, whichever of the two PDF number types it uses.
fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}
