//! Schema objects: ordered entry collections validated in one pass.

use serde_json::Value;
use tracing::debug;

use kt_common::error::{Error, Result, SchemaValidationError, Violation, ViolationKind};
use kt_common::value::ValueKind;
use kt_common::{ConfigMap, PathKey};

use crate::entry::SchemaEntry;
use crate::store::{get_in, set_in};

/// An ordered collection of schema entries, unique by canonical path.
///
/// Insertion order is preserved: violations are reported and samples are
/// generated in the order entries were added.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    /// Empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    /// Look up an entry by its canonical path.
    pub fn entry(&self, path: &PathKey) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.path() == path)
    }

    /// Mutable lookup, for late-binding a validator onto an entry.
    pub fn entry_mut(&mut self, path: &PathKey) -> Option<&mut SchemaEntry> {
        self.entries.iter_mut().find(|e| e.path() == path)
    }

    /// Add one entry. Fails if an entry with the same path is already
    /// present.
    pub fn add_entry(&mut self, entry: SchemaEntry) -> Result<()> {
        if self.entry(entry.path()).is_some() {
            return Err(Error::DuplicateEntry(entry.path().to_text()));
        }
        debug!(path = %entry.path(), kind = entry.kind().name(), "schema entry added");
        self.entries.push(entry);
        Ok(())
    }

    /// Add several entries; stops at the first duplicate.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = SchemaEntry>) -> Result<()> {
        for entry in entries {
            self.add_entry(entry)?;
        }
        Ok(())
    }

    /// Build a schema by walking an example configuration: one entry per
    /// leaf with the kind inferred from the example value, required, no
    /// default, no validator.
    ///
    /// Sequences are one `sequence` leaf, never expanded per element.
    /// Null leaves and sequences of mappings carry nothing to infer and are
    /// skipped; they pass through validation untouched.
    pub fn build_from_config(config: &ConfigMap) -> Self {
        let mut schema = Schema::new();
        collect_leaves(config, &mut Vec::new(), &mut schema.entries);
        schema
    }

    /// Validate `config` against every entry, in insertion order.
    ///
    /// Every entry is checked; validation never stops at the first
    /// failure, so one pass reports every violation. On success the
    /// returned mapping is the input with defaults filled, values coerced,
    /// and validator normalizations applied. Keys not named by any entry
    /// pass through unchanged: the schema is a floor, not a whitelist.
    pub fn validate(&self, config: &ConfigMap) -> std::result::Result<ConfigMap, SchemaValidationError> {
        let mut resolved = config.clone();
        let mut violations = Vec::new();

        for entry in &self.entries {
            match entry.validate(get_in(config, entry.path())) {
                Ok(Some(value)) => {
                    if let Err(err) = set_in(&mut resolved, entry.path(), value) {
                        let actual = match err {
                            Error::InvalidPath { segment, .. } => {
                                format!("non-mapping at '{segment}'")
                            }
                            other => other.to_string(),
                        };
                        violations.push(Violation::new(
                            entry.path().clone(),
                            ViolationKind::TypeMismatch {
                                expected: "mapping",
                                actual,
                            },
                        ));
                    }
                }
                // optional, absent, and without a default: nothing to write
                Ok(None) => {}
                Err(violation) => violations.push(violation),
            }
        }

        if violations.is_empty() {
            Ok(resolved)
        } else {
            Err(SchemaValidationError::new(violations))
        }
    }

    /// Deterministic sample configuration: entry defaults where present, a
    /// kind-appropriate placeholder otherwise, in entry insertion order.
    pub fn sample(&self) -> ConfigMap {
        let mut sample = ConfigMap::new();
        for entry in &self.entries {
            let value = entry
                .default()
                .cloned()
                .unwrap_or_else(|| placeholder(entry));
            if set_in(&mut sample, entry.path(), value).is_err() {
                debug!(path = %entry.path(), "sample skipped path shadowed by a leaf");
            }
        }
        sample
    }
}

fn collect_leaves(map: &ConfigMap, prefix: &mut Vec<String>, entries: &mut Vec<SchemaEntry>) {
    for (key, value) in map {
        if key.is_empty() || key.contains('.') {
            debug!(key = %key, "skipping key that cannot form a canonical path");
            continue;
        }
        prefix.push(key.clone());
        match value {
            Value::Object(child) => collect_leaves(child, prefix, entries),
            other if is_sequence_of_mappings(other) => {}
            other => {
                if let Some(kind) = ValueKind::infer(other) {
                    if let Ok(path) = PathKey::from_segments(prefix.iter().cloned()) {
                        entries.push(SchemaEntry::new(path, kind));
                    }
                }
            }
        }
        prefix.pop();
    }
}

fn is_sequence_of_mappings(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

fn placeholder(entry: &SchemaEntry) -> Value {
    match entry.kind() {
        ValueKind::String => Value::from(format!("sample_{}", entry.name())),
        ValueKind::Integer => Value::from(42),
        ValueKind::Float => Value::from(3.14),
        ValueKind::Boolean => Value::from(true),
        ValueKind::Path => Value::from(format!("./{}", entry.name())),
        ValueKind::Interval => Value::from("0 .. 1"),
        ValueKind::Sequence => Value::Array(Vec::new()),
    }
}
