//! Keytree shared foundations.
//!
//! This crate provides the vocabulary types shared across keytree crates:
//! - Canonical dotted-path addresses with structural equality
//! - Value type tags with inference and coercion
//! - Textual numeric intervals
//! - Common error types and the validation violation taxonomy

pub mod error;
pub mod interval;
pub mod path;
pub mod value;

pub use error::{Error, Result, SchemaValidationError, Violation, ViolationKind};
pub use interval::Interval;
pub use path::PathKey;
pub use value::{ConfigMap, ValueKind};
