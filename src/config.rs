//! Configuration for document validation.

use crate::version::PdfVersion;
use serde::Serialize;

/// How strictly legacy spellings and early feature use are judged.
///
/// Relaxed mode lowers some minimum-version thresholds and accepts a few
/// legacy discriminator names. It never turns a violated rule into a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ValidationMode {
    /// Follow ISO 32000-1 to the letter
    #[default]
    Strict,
    /// Accept common producer deviations
    Relaxed,
}

impl ValidationMode {
    /// True for [`ValidationMode::Relaxed`].
    pub fn is_relaxed(&self) -> bool {
        matches!(self, ValidationMode::Relaxed)
    }
}

/// Pick the minimum version of a feature for the active mode.
///
/// Callers compute this before invoking an entry validator; the entry
/// validators themselves only compare against a single threshold.
///
/// # Example
///
/// ```
/// use pdf_preflight::config::{effective_min_version, ValidationMode};
/// use pdf_preflight::version::PdfVersion;
///
/// let uf = effective_min_version(PdfVersion::V1_7, PdfVersion::V1_4, ValidationMode::Relaxed);
/// assert_eq!(uf, PdfVersion::V1_4);
/// ```
pub fn effective_min_version(
    strict: PdfVersion,
    relaxed: PdfVersion,
    mode: ValidationMode,
) -> PdfVersion {
    match mode {
        ValidationMode::Strict => strict,
        ValidationMode::Relaxed => relaxed,
    }
}

/// Validation options.
///
/// The validation mode is not part of the options; it is a property of the
/// document being judged and is read from the resolver.
///
/// # Example
///
/// ```
/// use pdf_preflight::config::ValidationOptions;
///
/// let options = ValidationOptions::new().with_max_page_tree_depth(16);
/// assert_eq!(options.max_page_tree_depth, 16);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Maximum nesting of `Pages` nodes before the tree is rejected
    pub max_page_tree_depth: usize,

    /// Maximum nesting of name tree nodes
    pub max_name_tree_depth: usize,

    /// Walk the catalog's embedded files name tree
    pub validate_embedded_files: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationOptions {
    /// Default limits.
    pub fn new() -> Self {
        Self {
            max_page_tree_depth: 100,
            max_name_tree_depth: 100,
            validate_embedded_files: true,
        }
    }

    /// Set the maximum page tree depth.
    pub fn with_max_page_tree_depth(mut self, depth: usize) -> Self {
        self.max_page_tree_depth = depth;
        self
    }

    /// Set the maximum name tree depth.
    pub fn with_max_name_tree_depth(mut self, depth: usize) -> Self {
        self.max_name_tree_depth = depth;
        self
    }

    /// Enable or disable the embedded files name tree walk.
    pub fn with_embedded_files(mut self, enable: bool) -> Self {
        self.validate_embedded_files = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_min_version() {
        assert_eq!(
            effective_min_version(PdfVersion::V1_3, PdfVersion::V1_0, ValidationMode::Strict),
            PdfVersion::V1_3
        );
        assert_eq!(
            effective_min_version(PdfVersion::V1_3, PdfVersion::V1_0, ValidationMode::Relaxed),
            PdfVersion::V1_0
        );
    }

    #[test]
    fn test_default_mode_is_strict() {
        assert_eq!(ValidationMode::default(), ValidationMode::Strict);
        assert!(!ValidationMode::Strict.is_relaxed());
    }

    #[test]
    fn test_default_options() {
        let options = ValidationOptions::default();
        assert_eq!(options.max_page_tree_depth, 100);
        assert_eq!(options.max_name_tree_depth, 100);
        assert!(options.validate_embedded_files);
    }

    #[test]
    fn test_builder() {
        let options = ValidationOptions::new()
            .with_max_page_tree_depth(8)
            .with_max_name_tree_depth(4)
            .with_embedded_files(false);
        assert_eq!(options.max_page_tree_depth, 8);
        assert_eq!(options.max_name_tree_depth, 4);
        assert!(!options.validate_embedded_files);
    }
}
