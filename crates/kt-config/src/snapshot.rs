//! Configuration snapshots: content fingerprints for diagnostics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use kt_common::ConfigMap;

use crate::CONFIG_SCHEMA_VERSION;

/// A point-in-time fingerprint of a loaded configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Schema version of the snapshot format.
    pub schema_version: String,

    /// Where the configuration was loaded from.
    pub source: PathBuf,

    /// SHA-256 hex digest of the serialized tree.
    pub fingerprint: String,

    /// ISO-8601 timestamp of snapshot creation.
    pub created_at: String,

    /// Whether a validation pass has succeeded on this loader.
    pub validated: bool,
}

impl ConfigSnapshot {
    /// Capture the current state of a configuration tree.
    pub fn capture(source: &Path, config: &ConfigMap, validated: bool) -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            source: source.to_path_buf(),
            fingerprint: fingerprint(config),
            created_at: chrono::Utc::now().to_rfc3339(),
            validated,
        }
    }
}

/// SHA-256 hex digest of the serialized tree.
pub fn fingerprint(config: &ConfigMap) -> String {
    let json = serde_json::to_string(config).expect("configuration maps always serialize");
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: serde_json::Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            other => panic!("not a mapping: {other}"),
        }
    }

    #[test]
    fn fingerprint_deterministic_for_equal_content() {
        let a = map(json!({"x": 1, "y": {"z": true}}));
        let b = map(json!({"x": 1, "y": {"z": true}}));
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64); // 256 bits = 64 hex chars
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = map(json!({"x": 1}));
        let b = map(json!({"x": 2}));
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn capture_records_source_and_state() {
        let config = map(json!({"a": 1}));
        let snap = ConfigSnapshot::capture(Path::new("/etc/app/config.json"), &config, true);
        assert_eq!(snap.schema_version, CONFIG_SCHEMA_VERSION);
        assert_eq!(snap.source, PathBuf::from("/etc/app/config.json"));
        assert!(snap.validated);
        assert_eq!(snap.fingerprint, fingerprint(&config));
        assert!(!snap.created_at.is_empty());
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snap = ConfigSnapshot::capture(Path::new("c.json"), &map(json!({"a": 1})), false);
        let json = serde_json::to_string(&snap).unwrap();
        let back: ConfigSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
