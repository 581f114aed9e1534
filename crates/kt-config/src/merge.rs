//! Recursive right-biased merge of configuration mappings.

use serde_json::Value;

use kt_common::ConfigMap;

/// Merge `overrides` over `base`, producing a new mapping.
///
/// Where both sides hold mappings the merge recurses; any other conflict is
/// won outright by the override, sequences included: a list override
/// replaces the base list wholesale and is never concatenated. Keys present
/// only in `base` are copied through unchanged. Neither input is mutated.
pub fn merge(base: &ConfigMap, overrides: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    for (key, value) in overrides {
        let resolved = match (merged.get(key), value) {
            (Some(Value::Object(base_child)), Value::Object(override_child)) => {
                Value::Object(merge(base_child, override_child))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), resolved);
    }
    merged
}
