//! Declarative schema documents.
//!
//! A schema document is itself a configuration mapping: each key is a
//! dotted path and each value an entry specification.
//!
//! ```json
//! {
//!     "app.port":  { "type": "integer", "default": 8080, "range": "1024 .. 65535" },
//!     "db.url":    { "type": "string" },
//!     "log.level": { "type": "string", "default": "info", "pattern": "debug|info|warn|error" }
//! }
//! ```
//!
//! `type` may be omitted when `default` is present (the kind is inferred
//! from the default). `range` and `pattern` are mutually exclusive; range
//! bounds are written as interval text.

use serde_json::Value;

use kt_common::error::{Error, Result};
use kt_common::value::ValueKind;
use kt_common::{ConfigMap, Interval, PathKey};

use crate::entry::{SchemaEntry, Validator};
use crate::schema::Schema;

const SPEC_KEYS: [&str; 6] = ["type", "default", "required", "nullable", "range", "pattern"];

impl Schema {
    /// Parse a declarative schema document into a schema.
    pub fn from_document(document: &ConfigMap) -> Result<Schema> {
        let mut schema = Schema::new();
        for (key, spec) in document {
            let path = PathKey::from_text(key)?;
            let spec = spec.as_object().ok_or_else(|| {
                Error::SchemaDefinition(format!("entry spec for '{key}' must be a mapping"))
            })?;
            schema.add_entry(parse_entry(path, spec)?)?;
        }
        Ok(schema)
    }
}

fn parse_entry(path: PathKey, spec: &ConfigMap) -> Result<SchemaEntry> {
    if let Some(unknown) = spec.keys().find(|k| !SPEC_KEYS.contains(&k.as_str())) {
        return Err(Error::SchemaDefinition(format!(
            "unknown key '{unknown}' in entry spec for '{path}'"
        )));
    }

    let kind = match spec.get("type") {
        Some(Value::String(name)) => ValueKind::parse(name).ok_or_else(|| {
            Error::SchemaDefinition(format!("unknown type '{name}' for '{path}'"))
        })?,
        Some(_) => {
            return Err(Error::SchemaDefinition(format!(
                "type for '{path}' must be a string"
            )))
        }
        None => match spec.get("default") {
            Some(default) => ValueKind::infer(default).ok_or_else(|| {
                Error::SchemaDefinition(format!(
                    "cannot infer a type for '{path}' from its default"
                ))
            })?,
            None => {
                return Err(Error::SchemaDefinition(format!(
                    "entry '{path}' needs a type or a default"
                )))
            }
        },
    };

    let mut entry = SchemaEntry::new(path.clone(), kind);

    if let Some(default) = spec.get("default") {
        entry = entry.with_default(default.clone())?;
    }
    if flag(spec, "required", &path)? == Some(false) {
        entry = entry.optional();
    }
    if flag(spec, "nullable", &path)? == Some(false) {
        entry = entry.non_nullable();
    }

    match (spec.get("range"), spec.get("pattern")) {
        (Some(_), Some(_)) => {
            return Err(Error::SchemaDefinition(format!(
                "entry '{path}' cannot have both a range and a pattern"
            )))
        }
        (Some(Value::String(text)), None) => {
            let interval = Interval::parse(text)?;
            entry = entry.with_validator(Validator::range(interval.min(), interval.max()));
        }
        (Some(_), None) => {
            return Err(Error::SchemaDefinition(format!(
                "range for '{path}' must be interval text like \"10 .. 20\""
            )))
        }
        (None, Some(Value::String(pattern))) => {
            entry = entry.with_validator(Validator::pattern(pattern)?);
        }
        (None, Some(_)) => {
            return Err(Error::SchemaDefinition(format!(
                "pattern for '{path}' must be a string"
            )))
        }
        (None, None) => {}
    }

    Ok(entry)
}

fn flag(spec: &ConfigMap, key: &str, path: &PathKey) -> Result<Option<bool>> {
    match spec.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(Error::SchemaDefinition(format!(
            "{key} for '{path}' must be a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kt_common::ViolationKind;
    use serde_json::json;

    fn map(value: serde_json::Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            other => panic!("not a mapping: {other}"),
        }
    }

    fn key(text: &str) -> PathKey {
        PathKey::from_text(text).unwrap()
    }

    #[test]
    fn parses_typed_entries() {
        let schema = Schema::from_document(&map(json!({
            "app.port": {"type": "integer", "default": 8080},
            "db.url": {"type": "string"}
        })))
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.entry(&key("app.port")).unwrap().kind(), ValueKind::Integer);
        assert_eq!(
            schema.entry(&key("app.port")).unwrap().default(),
            Some(&json!(8080))
        );
    }

    #[test]
    fn type_inferred_from_default() {
        let schema = Schema::from_document(&map(json!({
            "debug": {"default": false}
        })))
        .unwrap();
        assert_eq!(schema.entry(&key("debug")).unwrap().kind(), ValueKind::Boolean);
    }

    #[test]
    fn type_or_default_is_mandatory() {
        let err = Schema::from_document(&map(json!({"a": {"required": true}}))).unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn range_parsed_from_interval_text() {
        let schema = Schema::from_document(&map(json!({
            "app.port": {"type": "integer", "range": "1024 .. 65535"}
        })))
        .unwrap();
        let entry = schema.entry(&key("app.port")).unwrap();
        assert!(entry.validate(Some(&json!(80))).is_err());
        assert_eq!(entry.validate(Some(&json!(1024))).unwrap(), Some(json!(1024)));
        assert_eq!(entry.validate(Some(&json!(65535))).unwrap(), Some(json!(65535)));
    }

    #[test]
    fn pattern_parsed() {
        let schema = Schema::from_document(&map(json!({
            "log.level": {"type": "string", "pattern": "debug|info|warn|error"}
        })))
        .unwrap();
        let entry = schema.entry(&key("log.level")).unwrap();
        assert!(entry.validate(Some(&json!("info"))).is_ok());
        let violation = entry.validate(Some(&json!("loud"))).unwrap_err();
        assert!(matches!(violation.kind, ViolationKind::PatternViolation { .. }));
    }

    #[test]
    fn required_and_nullable_flags() {
        let schema = Schema::from_document(&map(json!({
            "a": {"type": "string", "required": false},
            "b": {"type": "string", "nullable": false}
        })))
        .unwrap();
        assert!(!schema.entry(&key("a")).unwrap().required());
        assert!(!schema.entry(&key("b")).unwrap().nullable());
    }

    #[test]
    fn range_and_pattern_conflict() {
        let err = Schema::from_document(&map(json!({
            "a": {"type": "integer", "range": "0 .. 1", "pattern": "x"}
        })))
        .unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn unknown_spec_key_rejected() {
        let err = Schema::from_document(&map(json!({
            "a": {"type": "string", "validate": "nope"}
        })))
        .unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn bad_path_rejected() {
        let err = Schema::from_document(&map(json!({
            "a..b": {"type": "string"}
        })))
        .unwrap_err();
        assert_eq!(err.code(), 10);
    }

    #[test]
    fn duplicate_paths_impossible_in_one_document() {
        // a JSON mapping cannot carry duplicate keys, but two spellings of
        // the same entry can collide only via repeated from_document merges;
        // a single parse therefore always succeeds on unique keys
        let schema = Schema::from_document(&map(json!({
            "a": {"type": "string"},
            "b": {"type": "string"}
        })))
        .unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn document_schema_end_to_end() {
        let schema = Schema::from_document(&map(json!({
            "app.port": {"type": "integer", "default": 8080, "range": "1024 .. 65535"},
            "db.url": {"type": "string"}
        })))
        .unwrap();
        let resolved = schema.validate(&map(json!({"db": {"url": "x"}}))).unwrap();
        assert_eq!(
            Value::Object(resolved),
            json!({"db": {"url": "x"}, "app": {"port": 8080}})
        );
    }
}
