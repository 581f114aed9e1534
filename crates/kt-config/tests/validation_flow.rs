//! End-to-end flow: load a JSON tree, validate it against a schema, mutate
//! it, save it, and reload.

use serde_json::{json, Value};
use std::fs;

use kt_common::{ConfigMap, Error, PathKey, ValueKind};
use kt_config::{ConfigLoader, Schema, SchemaEntry, Validator};

fn map(value: serde_json::Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        other => panic!("not a mapping: {other}"),
    }
}

fn service_schema() -> Schema {
    Schema::from_document(&map(json!({
        "app.port": {"type": "integer", "default": 8080, "range": "1024 .. 65535"},
        "app.workers": {"type": "integer", "default": 4, "range": "1 .. 256"},
        "db.url": {"type": "string"},
        "log.level": {"type": "string", "default": "info", "pattern": "debug|info|warn|error"},
        "log.file": {"type": "path", "required": false}
    })))
    .expect("schema document is well-formed")
}

#[test]
fn load_validate_save_reload() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    fs::write(
        &source,
        r#"{"db": {"url": "postgres://localhost/app"}, "log": {"level": "debug"}}"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::load(&source).unwrap();
    loader.validate(&service_schema()).unwrap();

    // defaults filled in, explicit values kept
    assert_eq!(loader.get("app.port").unwrap(), Some(&json!(8080)));
    assert_eq!(loader.get("app.workers").unwrap(), Some(&json!(4)));
    assert_eq!(loader.get("log.level").unwrap(), Some(&json!("debug")));
    // optional entry without a default stays absent
    assert_eq!(loader.get("log.file").unwrap(), None);

    loader.set("app.workers", 16).unwrap();
    loader.save().unwrap();

    let reloaded = ConfigLoader::load(&source).unwrap();
    assert_eq!(reloaded.get("app.workers").unwrap(), Some(&json!(16)));
    assert_eq!(
        reloaded.get("db.url").unwrap(),
        Some(&json!("postgres://localhost/app"))
    );
}

#[test]
fn every_violation_reported_in_one_pass() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    // three problems at once: port out of range, bad log level, missing db.url
    fs::write(
        &source,
        r#"{"app": {"port": 80}, "log": {"level": "loud"}}"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::load(&source).unwrap();
    let err = loader.validate(&service_schema()).unwrap_err();

    let report = match err {
        Error::Validation(report) => report,
        other => panic!("unexpected error: {other}"),
    };
    let paths: Vec<String> = report
        .violations()
        .iter()
        .map(|v| v.path.to_text())
        .collect();
    assert_eq!(paths, ["app.port", "db.url", "log.level"]);

    // the failed pass changed nothing
    assert_eq!(loader.get("app.port").unwrap(), Some(&json!(80)));
    assert_eq!(loader.get("app.workers").unwrap(), None);
    assert!(!loader.is_validated());
}

#[test]
fn coercion_survives_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    fs::write(
        &source,
        r#"{"app": {"port": "9090"}, "db": {"url": "x"}}"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::load(&source).unwrap();
    loader.validate(&service_schema()).unwrap();
    assert_eq!(loader.get("app.port").unwrap(), Some(&json!(9090)));

    loader.save().unwrap();
    let text = fs::read_to_string(&source).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed["app"]["port"], json!(9090));
}

#[test]
fn unknown_keys_survive_validation_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    fs::write(
        &source,
        r#"{"db": {"url": "x"}, "plugins": {"extra": [1, 2, 3]}}"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::load(&source).unwrap();
    loader.validate(&service_schema()).unwrap();
    assert_eq!(
        loader.get("plugins.extra").unwrap(),
        Some(&json!([1, 2, 3]))
    );

    loader.save().unwrap();
    let reloaded = ConfigLoader::load(&source).unwrap();
    assert_eq!(
        reloaded.get("plugins.extra").unwrap(),
        Some(&json!([1, 2, 3]))
    );
}

#[test]
fn overrides_layer_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    fs::write(&source, r#"{"db": {"url": "x"}, "app": {"port": 80}}"#).unwrap();

    let overrides = map(json!({"app": {"port": 9000}}));
    let mut loader = ConfigLoader::load_with_overrides(&source, &overrides).unwrap();
    loader.validate(&service_schema()).unwrap();
    assert_eq!(loader.get("app.port").unwrap(), Some(&json!(9000)));
}

#[test]
fn inferred_schema_accepts_its_own_example() {
    let example = map(json!({
        "app": {"port": 8080, "name": "svc", "debug": false},
        "limits": {"cpu": 0.5, "tags": ["a", "b"]}
    }));
    let schema = Schema::build_from_config(&example);
    let resolved = schema.validate(&example).unwrap();
    assert_eq!(Value::Object(resolved), Value::Object(example));
}

#[test]
fn snapshot_tracks_validation_state() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("service.json");
    fs::write(&source, r#"{"db": {"url": "x"}}"#).unwrap();

    let mut loader = ConfigLoader::load(&source).unwrap();
    let before = loader.snapshot();
    assert!(!before.validated);

    loader.validate(&service_schema()).unwrap();
    let after = loader.snapshot();
    assert!(after.validated);
    // defaults were filled in, so the content fingerprint moved
    assert_ne!(before.fingerprint, after.fingerprint);
}

#[test]
fn late_bound_validator_tightens_an_existing_schema() {
    let mut schema = Schema::new();
    schema
        .add_entry(SchemaEntry::new(
            PathKey::from_text("retries").unwrap(),
            ValueKind::Integer,
        ))
        .unwrap();

    let config = map(json!({"retries": 50}));
    assert!(schema.validate(&config).is_ok());

    schema
        .entry_mut(&PathKey::from_text("retries").unwrap())
        .unwrap()
        .set_validator(Validator::range(0.0, 10.0));
    assert!(schema.validate(&config).is_err());
}
