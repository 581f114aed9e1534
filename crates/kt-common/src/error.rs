//! Error types for Keytree.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::path::PathKey;

/// Result type alias for Keytree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Keytree.
#[derive(Error, Debug)]
pub enum Error {
    // Path errors (10-19)
    #[error("malformed path: {0}")]
    MalformedPath(String),

    // Schema definition errors (20-29)
    #[error("schema definition error: {0}")]
    SchemaDefinition(String),

    #[error("duplicate schema entry: {0}")]
    DuplicateEntry(String),

    // Validation errors (30-39)
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),

    // Store errors (40-49)
    #[error("cannot set {path}: segment '{segment}' holds a non-mapping value")]
    InvalidPath { path: String, segment: String },

    // Load/save errors (50-59)
    #[error("failed to load configuration from {}: {cause}", .path.display())]
    Load { path: PathBuf, cause: String },

    #[error("failed to save configuration to {}: {cause}", .path.display())]
    Save { path: PathBuf, cause: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in diagnostics output.
    pub fn code(&self) -> u32 {
        match self {
            Error::MalformedPath(_) => 10,
            Error::SchemaDefinition(_) => 20,
            Error::DuplicateEntry(_) => 21,
            Error::Validation(_) => 30,
            Error::InvalidPath { .. } => 40,
            Error::Load { .. } => 50,
            Error::Save { .. } => 51,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}

/// A single schema violation at one path.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Canonical path of the entry that failed.
    pub path: PathKey,
    /// What went wrong.
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: PathKey, kind: ViolationKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// The ways a value can fail validation against a schema entry.
#[derive(Debug, Clone)]
pub enum ViolationKind {
    /// Entry is required, has no default, and the path is absent.
    MissingRequiredField,
    /// Explicit null where the entry forbids it.
    NullNotAllowed,
    /// Value could not be coerced to the entry's type.
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
    /// Numeric value outside the inclusive [min, max] range.
    RangeViolation { min: f64, max: f64, actual: f64 },
    /// String did not fully match the entry's pattern.
    PatternViolation { pattern: String, actual: String },
    /// Predicate validator rejected the value.
    PredicateViolation { actual: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingRequiredField => write!(f, "missing required field"),
            ViolationKind::NullNotAllowed => write!(f, "null is not allowed"),
            ViolationKind::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            ViolationKind::RangeViolation { min, max, actual } => {
                write!(f, "must be between {min} and {max}, got {actual}")
            }
            ViolationKind::PatternViolation { pattern, actual } => {
                write!(f, "'{actual}' does not match pattern '{pattern}'")
            }
            ViolationKind::PredicateViolation { actual } => {
                write!(f, "value {actual} failed predicate validation")
            }
        }
    }
}

/// Aggregate of every violation found in one validation pass.
///
/// Validation never stops at the first failure; callers get the complete
/// ordered list so all problems can be reported in a single diagnostic pass.
#[derive(Debug, Clone)]
pub struct SchemaValidationError {
    violations: Vec<Violation>,
}

impl SchemaValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The violations, in schema entry insertion order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema validation failed with {} violation(s)",
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaValidationError {}
