//! The configuration loading façade.
//!
//! [`ConfigLoader`] ties the pieces together: parse a JSON source into a
//! [`ConfigStore`], optionally validate it against a [`Schema`]
//! (all-or-nothing), expose path-based access, and save the tree back out.
//! There is no unloaded loader: construction and loading are one step, so
//! every live loader holds a parsed tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use kt_common::error::{Error, Result};
use kt_common::value::type_name;
use kt_common::{ConfigMap, PathKey};

use crate::schema::Schema;
use crate::snapshot::ConfigSnapshot;
use crate::store::ConfigStore;

/// File name used when the source path is a directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Loads, validates, and saves one configuration tree.
///
/// Single-owner and synchronous: every operation returns or errors before
/// handing back control, and the only blocking work is the scoped file
/// read/write during load and save.
#[derive(Debug)]
pub struct ConfigLoader {
    source: PathBuf,
    store: ConfigStore,
    validated: bool,
    last_saved: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from `path`: a file, or a directory containing
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = resolve_source(path.as_ref());
        let text = fs::read_to_string(&source).map_err(|e| Error::Load {
            path: source.clone(),
            cause: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| Error::Load {
            path: source.clone(),
            cause: e.to_string(),
        })?;
        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Load {
                    path: source,
                    cause: format!("root must be a mapping, got {}", type_name(&other)),
                })
            }
        };
        info!(path = %source.display(), "configuration loaded");
        Ok(Self {
            source,
            store: ConfigStore::from_map(root),
            validated: false,
            last_saved: None,
        })
    }

    /// Load, then layer `overrides` over the parsed tree (right-biased
    /// merge).
    pub fn load_with_overrides(path: impl AsRef<Path>, overrides: &ConfigMap) -> Result<Self> {
        let mut loader = Self::load(path)?;
        loader.store.merge_overrides(overrides);
        debug!(keys = overrides.len(), "overrides merged");
        Ok(loader)
    }

    /// Validate the current tree against `schema`.
    ///
    /// All-or-nothing: on success the store content is replaced with the
    /// resolved mapping (defaults filled, values coerced and normalized);
    /// on failure the store is left untouched and the aggregate error
    /// carries every violation.
    pub fn validate(&mut self, schema: &Schema) -> Result<()> {
        let resolved = schema.validate(self.store.as_map())?;
        self.store.replace(resolved);
        self.validated = true;
        info!(entries = schema.len(), "configuration validated");
        Ok(())
    }

    /// Value at a dotted path, or `Ok(None)` when absent. A malformed path
    /// errors immediately.
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        Ok(self.get_path(&PathKey::from_text(path)?))
    }

    /// Value at an already-parsed path.
    pub fn get_path(&self, path: &PathKey) -> Option<&Value> {
        self.store.get(path)
    }

    /// Assign a value at a dotted path, creating intermediate mappings.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.set_path(&PathKey::from_text(path)?, value)
    }

    /// Assign a value at an already-parsed path.
    pub fn set_path(&mut self, path: &PathKey, value: impl Into<Value>) -> Result<()> {
        self.store.set(path, value)
    }

    /// Save to the original source location.
    pub fn save(&mut self) -> Result<()> {
        let target = self.source.clone();
        self.save_to(target)
    }

    /// Save to an explicit target, creating parent directories as needed.
    /// Does not require a prior validation pass.
    pub fn save_to(&mut self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref().to_path_buf();
        let text = serde_json::to_string_pretty(self.store.as_map()).map_err(|e| Error::Save {
            path: target.clone(),
            cause: e.to_string(),
        })?;
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::Save {
                    path: target.clone(),
                    cause: e.to_string(),
                })?;
            }
        }
        fs::write(&target, text + "\n").map_err(|e| Error::Save {
            path: target.clone(),
            cause: e.to_string(),
        })?;
        info!(path = %target.display(), "configuration saved");
        self.last_saved = Some(target);
        Ok(())
    }

    /// Fingerprint the current content.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::capture(&self.source, self.store.as_map(), self.validated)
    }

    /// The resolved source file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The underlying store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Whether a validation pass has succeeded on this loader.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Where the tree was last saved, if it has been.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

fn resolve_source(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}
