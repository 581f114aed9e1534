//! Keytree configuration loading and validation.
//!
//! This crate provides:
//! - Schema entries and schema objects with defaults, type coercion, and
//!   range/pattern/predicate validators
//! - Declarative schema documents
//! - Recursive right-biased merging of configuration trees
//! - Path-addressed get/set over a loaded tree
//! - A load → validate → save façade with content snapshots

pub mod discover;
pub mod document;
pub mod entry;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use discover::find_config_file;
pub use entry::{PredicateOutcome, SchemaEntry, Validator};
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use merge::merge;
pub use schema::Schema;
pub use snapshot::ConfigSnapshot;
pub use store::ConfigStore;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
