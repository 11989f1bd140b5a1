//! Configuration for document checking.
//!
//! All checking behaviour is controlled through [`CheckConfig`], built via
//! its [`CheckConfigBuilder`]. The rubric itself (fonts, sizes, spacing,
//! margins) is deliberately NOT configurable — it is a fixed institutional
//! standard, and the checker's messages quote its exact expected values.

use crate::error::MetaDocError;
use crate::model::ModelHandle;

/// Default submission ceiling: 50 MB, enforced before any parsing.
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration for a document check.
///
/// Built via [`CheckConfig::builder()`] or [`CheckConfig::default()`].
///
/// # Example
/// ```rust
/// use metadoc::CheckConfig;
///
/// let config = CheckConfig::builder()
///     .max_payload_bytes(10 * 1024 * 1024)
///     .build()
///     .unwrap();
/// assert!(config.model.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Optional trained classifier. `None` disables ML scoring everywhere;
    /// rule-based checks are unaffected.
    pub model: Option<ModelHandle>,

    /// Total submission size ceiling in bytes. A submission above this is
    /// rejected with a single synthetic report before any file is parsed.
    pub max_payload_bytes: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl CheckConfig {
    /// Create a new builder for `CheckConfig`.
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CheckConfig`].
#[derive(Debug)]
pub struct CheckConfigBuilder {
    config: CheckConfig,
}

impl CheckConfigBuilder {
    /// Inject a loaded classifier handle.
    pub fn model(mut self, model: ModelHandle) -> Self {
        self.config.model = Some(model);
        self
    }

    pub fn max_payload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_payload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CheckConfig, MetaDocError> {
        if self.config.max_payload_bytes == 0 {
            return Err(MetaDocError::InvalidConfig(
                "max_payload_bytes must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = CheckConfig::builder().build().unwrap();
        assert!(config.model.is_none());
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn zero_payload_ceiling_is_rejected() {
        let err = CheckConfig::builder().max_payload_bytes(0).build();
        assert!(err.is_err());
    }
}
