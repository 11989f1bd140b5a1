//! Optional trained-classifier collaborator.
//!
//! The classifier is opaque to the rest of the crate: it receives a numeric
//! row laid out per its trained column schema and answers with a binary label
//! plus a confidence. The [`Scorer`] trait is the seam — tests inject a stub,
//! production loads a [`LinearScorer`] from artifacts on disk, and an absent
//! model simply means no [`ModelHandle`] is configured, which disables ML
//! scoring everywhere without touching the rule-based checks.
//!
//! Artifacts are two JSON blobs in a model directory:
//! * `document_classifier.json` — fitted coefficients and intercept
//! * `model_columns.json` — the ordered input column names
//!
//! Both are loaded once at process start and treated as immutable for the
//! process lifetime; the pipeline receives the handle by injection.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Artifact filename of the fitted classifier.
pub const CLASSIFIER_FILE: &str = "document_classifier.json";
/// Artifact filename of the trained input column schema.
pub const COLUMNS_FILE: &str = "model_columns.json";

/// A binary verdict with the probability of the positive ("correct") class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// `true` = the document looks correct.
    pub label: bool,
    /// Probability of the positive class, in `[0, 1]`.
    pub confidence: f64,
}

/// Errors a scorer may raise. All of them are isolated by the pipeline:
/// the document's rule-based report survives with an appended failure note.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The row length does not match the trained schema.
    #[error("schema mismatch: expected {expected} columns, got {got}")]
    SchemaMismatch { expected: usize, got: usize },

    /// Any other internal failure.
    #[error("{0}")]
    Internal(String),
}

/// The classifier contract: a pure function over a vectorized feature row.
pub trait Scorer: Send + Sync {
    fn score(&self, row: &[f64]) -> Result<Prediction, ScorerError>;
}

// ── Shipped implementation ───────────────────────────────────────────────

/// Logistic-regression scorer backed by exported coefficients.
///
/// `p = sigmoid(w · x + b)`; label is `p >= 0.5`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearScorer {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Scorer for LinearScorer {
    fn score(&self, row: &[f64]) -> Result<Prediction, ScorerError> {
        if row.len() != self.coefficients.len() {
            return Err(ScorerError::SchemaMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        let z: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());
        Ok(Prediction {
            label: p >= 0.5,
            confidence: p,
        })
    }
}

// ── Handle ───────────────────────────────────────────────────────────────

/// An immutable pairing of a scorer with its trained column schema.
#[derive(Clone)]
pub struct ModelHandle {
    scorer: Arc<dyn Scorer>,
    columns: Arc<Vec<String>>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("scorer", &"<dyn Scorer>")
            .field("columns", &self.columns.len())
            .finish()
    }
}

impl ModelHandle {
    /// Pair an arbitrary scorer with its column schema.
    pub fn new(scorer: Arc<dyn Scorer>, columns: Vec<String>) -> Self {
        Self {
            scorer,
            columns: Arc::new(columns),
        }
    }

    /// Load both artifacts from `dir`, or `None` when ML scoring should stay
    /// disabled.
    ///
    /// Mirrors the upload host's startup behaviour: missing artifacts are a
    /// normal rule-checks-only deployment (logged at debug), while artifacts
    /// that exist but fail to parse are logged as a warning. Neither case is
    /// an error for the caller.
    pub fn load(dir: impl AsRef<Path>) -> Option<Self> {
        let dir = dir.as_ref();
        let classifier_path = dir.join(CLASSIFIER_FILE);
        let columns_path = dir.join(COLUMNS_FILE);

        if !classifier_path.exists() || !columns_path.exists() {
            debug!(
                "No classifier artifacts in {} — ML scoring disabled",
                dir.display()
            );
            return None;
        }

        let scorer: LinearScorer = match read_json(&classifier_path) {
            Ok(s) => s,
            Err(e) => {
                warn!("Gagal memuat model ML: {}", e);
                return None;
            }
        };
        let columns: Vec<String> = match read_json(&columns_path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Gagal memuat model ML: {}", e);
                return None;
            }
        };

        debug!(
            "Loaded classifier: {} coefficients, {} columns",
            scorer.coefficients.len(),
            columns.len()
        );
        Some(Self::new(Arc::new(scorer), columns))
    }

    /// The trained input column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Score a vectorized row.
    pub fn score(&self, row: &[f64]) -> Result<Prediction, ScorerError> {
        self.scorer.score(row)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("{}: {}", path.display(), e))
}
