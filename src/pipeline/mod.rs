//! Pipeline stages for document checking.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an adapter
//! (e.g. a different PDF backend) without touching the rules.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ input ──▶ docx / pdf ──▶ rules ─────────────▶ merged report
//! (upload)  (route)   (normalize)    └▶ features ──▶ vectorize ──▶ scorer
//! ```
//!
//! 1. [`input`]     — route on the declared extension, enforce the payload
//!    ceiling; nothing past this stage sees an unsupported file
//! 2. [`docx`]      — ZIP + XML walk into the normalized paragraph/run model
//! 3. [`pdf`]       — lopdf content-stream walk into per-page text spans
//! 4. [`rules`]     — the rubric itself; produces the violation report
//! 5. [`features`]  — descriptive statistics for the optional classifier
//! 6. [`vectorize`] — reconcile features against the trained column schema

pub mod docx;
pub mod features;
pub mod input;
pub mod pdf;
pub mod rules;
pub mod vectorize;
