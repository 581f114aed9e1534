//! The loaded configuration tree with path-based access.

use serde_json::Value;
use tracing::debug;

use kt_common::error::{Error, Result};
use kt_common::{ConfigMap, PathKey};

use crate::merge::merge;

/// Read the value at `path` in `map`.
///
/// Absent if any intermediate segment is missing or the walk hits a
/// non-mapping before the path is exhausted. Never errors.
pub(crate) fn get_in<'a>(map: &'a ConfigMap, path: &PathKey) -> Option<&'a Value> {
    let (last, parents) = path.split_last();
    let mut current = map;
    for segment in parents {
        current = current.get(segment)?.as_object()?;
    }
    current.get(last)
}

/// Write `value` at `path` in `map`, creating intermediate mappings.
///
/// Fails when an intermediate segment already holds a non-mapping value;
/// a leaf cannot be descended into.
pub(crate) fn set_in(map: &mut ConfigMap, path: &PathKey, value: Value) -> Result<()> {
    let (last, parents) = path.split_last();
    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(ConfigMap::new()));
        current = match slot {
            Value::Object(child) => child,
            _ => {
                return Err(Error::InvalidPath {
                    path: path.to_text(),
                    segment: segment.clone(),
                })
            }
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}

/// The working configuration: a nested mapping owned by one loader,
/// mutated only through path-based access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    root: ConfigMap,
}

impl ConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed mapping.
    pub fn from_map(root: ConfigMap) -> Self {
        Self { root }
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &ConfigMap {
        &self.root
    }

    /// Take the underlying mapping.
    pub fn into_map(self) -> ConfigMap {
        self.root
    }

    /// Replace the entire content.
    pub(crate) fn replace(&mut self, root: ConfigMap) {
        self.root = root;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Value at `path`, or `None` for any absent path. Never errors.
    pub fn get(&self, path: &PathKey) -> Option<&Value> {
        get_in(&self.root, path)
    }

    /// Value at `path`, or `default` when absent.
    pub fn get_or<'a>(&'a self, path: &PathKey, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// Assign `value` at `path`, creating intermediate mappings along the
    /// way.
    pub fn set(&mut self, path: &PathKey, value: impl Into<Value>) -> Result<()> {
        set_in(&mut self.root, path, value.into())?;
        debug!(path = %path, "configuration value set");
        Ok(())
    }

    /// Layer `overrides` over the current tree (right-biased recursive
    /// merge).
    pub fn merge_overrides(&mut self, overrides: &ConfigMap) {
        self.root = merge(&self.root, overrides);
    }
}
