//! Object graph validation.
//!
//! Validation walks the graph from the document catalog and stops at the
//! first violated rule. The error names the dictionary role, the entry and
//! the rule, so the offending object can be located without re-walking.
//!
//! ## Example
//!
//! ```
//! use pdf_preflight::object::{Dictionary, Object};
//! use pdf_preflight::resolver::ObjectStore;
//! use pdf_preflight::validation::DocumentValidator;
//! use pdf_preflight::version::PdfVersion;
//!
//! let mut store = ObjectStore::new(PdfVersion::V1_7);
//! let pages = store.reserve();
//! let page = store.add(Object::Dictionary(Dictionary::from([
//!     ("Type".to_string(), Object::Name("Page".to_string())),
//!     ("Parent".to_string(), Object::Reference(pages)),
//!     (
//!         "MediaBox".to_string(),
//!         Object::Array(vec![
//!             Object::Integer(0),
//!             Object::Integer(0),
//!             Object::Integer(612),
//!             Object::Integer(792),
//!         ]),
//!     ),
//! ])));
//! store.insert(
//!     pages,
//!     Object::Dictionary(Dictionary::from([
//!         ("Type".to_string(), Object::Name("Pages".to_string())),
//!         ("Count".to_string(), Object::Integer(1)),
//!         ("Kids".to_string(), Object::Array(vec![Object::Reference(page)])),
//!     ])),
//! );
//! let catalog = store.add(Object::Dictionary(Dictionary::from([
//!     ("Type".to_string(), Object::Name("Catalog".to_string())),
//!     ("Pages".to_string(), Object::Reference(pages)),
//! ])));
//! store.set_root(catalog);
//!
//! let report = DocumentValidator::new().validate(&mut store).unwrap();
//! assert_eq!(report.page_tree.page_count(), 1);
//! assert_eq!(store.page_count(), Some(1));
//! ```

pub mod common;
pub mod entry;
pub mod file_spec;
pub mod name_tree;
pub mod page;
pub mod page_tree;
pub mod predicates;

pub use entry::{DictValidator, OPTIONAL, REQUIRED};
pub use file_spec::{
    validate_embedded_files_name_tree, validate_file_spec_dict, validate_file_spec_entry,
    validate_file_spec_or_form_xobject, validate_file_specification, FileSpecOrForm,
    FileSpecification,
};
pub use page::validate_page_dict;
pub use page_tree::{validate_page_tree, PageSummary, PageTreeSummary, ResourceSource};

use crate::config::{ValidationMode, ValidationOptions};
use crate::error::Result;
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;
use serde::Serialize;

/// Outcome of a successful validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Document version the run was judged against
    pub version: PdfVersion,
    /// Mode the run was judged in
    pub mode: ValidationMode,
    /// Page tree traversal result
    pub page_tree: PageTreeSummary,
    /// Number of embedded file specifications checked
    pub embedded_files: usize,
}

impl ValidationReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Document validator.
///
/// Validates the page tree reachable from the catalog and, unless disabled,
/// every file specification in the catalog's `EmbeddedFiles` name tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    options: ValidationOptions,
}

impl DocumentValidator {
    /// Create a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the validation options.
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validation options in effect.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate the document behind `resolver`.
    ///
    /// Fails fast: the first violated rule is returned unchanged.
    pub fn validate<R: ObjectResolver + ?Sized>(&self, resolver: &mut R) -> Result<ValidationReport> {
        let version = resolver.version();
        let mode = resolver.mode();
        log::info!("Validating PDF {} document ({:?} mode)", version, mode);

        let catalog = resolver.catalog()?;
        let page_tree = validate_page_tree(resolver, &catalog, &self.options)?;

        let embedded_files = if self.options.validate_embedded_files {
            validate_embedded_files_name_tree(&*resolver, &catalog, &self.options)?
        } else {
            log::debug!("Skipping embedded files");
            0
        };

        Ok(ValidationReport {
            version,
            mode,
            page_tree,
            embedded_files,
        })
    }
}

/// Validate a document with default options.
pub fn validate_document<R: ObjectResolver + ?Sized>(resolver: &mut R) -> Result<ValidationReport> {
    DocumentValidator::new().validate(resolver)
}
