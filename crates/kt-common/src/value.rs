//! Value type tags, inference, and coercion for configuration leaves.
//!
//! Every schema entry carries a fixed [`ValueKind`] tag. Tags are assigned
//! once, explicitly at definition time or inferred from a sample value, and
//! coercion dispatches on the tag, never on the runtime shape of an
//! arbitrary value.

use serde_json::{Map, Value};

use crate::interval::Interval;

/// Nested configuration mapping: string keys to scalars, sequences, or
/// further mappings. Key insertion order is preserved.
pub type ConfigMap = Map<String, Value>;

/// The closed set of leaf types a schema entry can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Filesystem path, stored textually.
    Path,
    /// Closed numeric interval, stored textually as `MIN .. MAX`.
    Interval,
    /// A sequence of scalars, validated as a single leaf.
    Sequence,
}

impl ValueKind {
    /// Lowercase name used in diagnostics and schema documents.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Path => "path",
            ValueKind::Interval => "interval",
            ValueKind::Sequence => "sequence",
        }
    }

    /// Parse a kind name as written in schema documents. Accepts the short
    /// aliases `str`, `int`, and `bool`.
    pub fn parse(name: &str) -> Option<ValueKind> {
        match name {
            "string" | "str" => Some(ValueKind::String),
            "integer" | "int" => Some(ValueKind::Integer),
            "float" => Some(ValueKind::Float),
            "boolean" | "bool" => Some(ValueKind::Boolean),
            "path" => Some(ValueKind::Path),
            "interval" => Some(ValueKind::Interval),
            "sequence" => Some(ValueKind::Sequence),
            _ => None,
        }
    }

    /// Infer the kind tag for a leaf value.
    ///
    /// Returns `None` for nulls (nothing to infer) and mappings (not a
    /// leaf).
    pub fn infer(value: &Value) -> Option<ValueKind> {
        match value {
            Value::Bool(_) => Some(ValueKind::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(ValueKind::Integer),
            Value::Number(_) => Some(ValueKind::Float),
            Value::String(_) => Some(ValueKind::String),
            Value::Array(_) => Some(ValueKind::Sequence),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Attempt to coerce `value` to this kind, returning the resolved value.
    ///
    /// Textual representations are accepted only where the kind supports
    /// them: numbers from numeric strings, booleans from alias strings,
    /// intervals from interval text (or a two-number sequence). Everything
    /// else requires an exact type match.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            ValueKind::String => value.is_string().then(|| value.clone()),
            ValueKind::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            ValueKind::Float => match value {
                Value::Number(n) => n.as_f64().map(Value::from),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Value::from),
                _ => None,
            },
            ValueKind::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::String(s) => parse_bool_alias(s).map(Value::from),
                _ => None,
            },
            ValueKind::Path => match value {
                Value::String(s) if !s.is_empty() => Some(value.clone()),
                _ => None,
            },
            ValueKind::Interval => match value {
                Value::String(s) => Interval::parse(s)
                    .ok()
                    .map(|iv| Value::from(iv.canonical_text())),
                Value::Array(items) => match items.as_slice() {
                    [Value::Number(min), Value::Number(max)] => {
                        let iv = Interval::new(min.as_f64()?, max.as_f64()?).ok()?;
                        Some(Value::from(iv.canonical_text()))
                    }
                    _ => None,
                },
                _ => None,
            },
            ValueKind::Sequence => value.is_array().then(|| value.clone()),
        }
    }
}

/// Parse the boolean alias spellings: `true/false`, `yes/no`, `on/off`,
/// `enabled/disabled` (case-insensitive).
pub fn parse_bool_alias(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "enabled" => Some(true),
        "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Human-readable name for a JSON value's own type, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
