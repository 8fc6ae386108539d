//! Error types for document validation.
//!
//! Every failure carries enough context (dictionary role, entry name, violated
//! rule) to locate the offending object without re-walking the graph.

use crate::object::ObjectRef;
use crate::version::PdfVersion;
use serde::Serialize;

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while validating an object graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required entry is absent or resolves to null
    #[error("{dict}: missing required entry /{entry}")]
    MissingRequiredField {
        /// Role name of the dictionary being validated
        dict: String,
        /// Entry name
        entry: String,
    },

    /// The resolved value has the wrong kind
    #[error("{dict}: entry /{entry} has wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        /// Role name of the dictionary being validated
        dict: String,
        /// Entry name
        entry: String,
        /// Expected kind
        expected: String,
        /// Kind actually found
        found: String,
    },

    /// The value has the right kind but the wrong shape
    #[error("{dict}: entry /{entry} is malformed: {reason}")]
    MalformedValue {
        /// Role name of the dictionary being validated
        dict: String,
        /// Entry name
        entry: String,
        /// What is wrong with it
        reason: String,
    },

    /// The value fails a domain predicate
    #[error("{dict}: entry /{entry} has invalid value {value}")]
    ConstraintViolated {
        /// Role name of the dictionary being validated
        dict: String,
        /// Entry name
        entry: String,
        /// Rendered offending value
        value: String,
    },

    /// A feature is used below the version that introduced it
    #[error("{dict}: entry /{entry} requires PDF {required}, document is PDF {actual}")]
    VersionTooLow {
        /// Role name of the dictionary being validated
        dict: String,
        /// Entry name
        entry: String,
        /// Minimum version for the active mode
        required: PdfVersion,
        /// Version of the document
        actual: PdfVersion,
    },

    /// A cross-field or cross-dictionary rule is violated
    #[error("Structural inconsistency: {0}")]
    StructuralInconsistency(String),

    /// A recognised construct this validator deliberately rejects
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Referenced object not present in the object table
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectRef),

    /// Circular reference detected while resolving
    #[error("Circular reference detected: object {0}")]
    CircularReference(ObjectRef),

    /// Reference chain longer than the resolver allows
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// Fault reported by an external resolver implementation
    #[error("Resolver error: {0}")]
    Resolver(String),
}

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Required entry absent or null
    MissingRequiredField,
    /// Wrong value kind
    TypeMismatch,
    /// Wrong shape (arity, parity, date syntax)
    MalformedValue,
    /// Predicate failure
    ConstraintViolated,
    /// Feature newer than the document
    VersionTooLow,
    /// Cross-field rule violated
    StructuralInconsistency,
    /// Deliberately unimplemented construct
    UnsupportedFeature,
    /// Broken, cyclic or otherwise unresolvable reference
    ResolutionFailure,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::MalformedValue { .. } => ErrorKind::MalformedValue,
            Error::ConstraintViolated { .. } => ErrorKind::ConstraintViolated,
            Error::VersionTooLow { .. } => ErrorKind::VersionTooLow,
            Error::StructuralInconsistency(_) => ErrorKind::StructuralInconsistency,
            Error::UnsupportedFeature(_) => ErrorKind::UnsupportedFeature,
            Error::ObjectNotFound(_)
            | Error::CircularReference(_)
            | Error::RecursionLimitExceeded(_)
            | Error::Resolver(_) => ErrorKind::ResolutionFailure,
        }
    }

    /// True for faults raised by the resolver rather than by a validation rule.
    pub fn is_resolution_failure(&self) -> bool {
        self.kind() == ErrorKind::ResolutionFailure
    }

    pub(crate) fn missing(dict: &str, entry: &str) -> Self {
        Error::MissingRequiredField {
            dict: dict.to_string(),
            entry: entry.to_string(),
        }
    }

    pub(crate) fn type_mismatch(dict: &str, entry: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            dict: dict.to_string(),
            entry: entry.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn malformed(dict: &str, entry: &str, reason: impl Into<String>) -> Self {
        Error::MalformedValue {
            dict: dict.to_string(),
            entry: entry.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn constraint(dict: &str, entry: &str, value: impl std::fmt::Display) -> Self {
        Error::ConstraintViolated {
            dict: dict.to_string(),
            entry: entry.to_string(),
            value: value.to_string(),
        }
    }
}
