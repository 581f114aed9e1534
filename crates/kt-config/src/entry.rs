//! Schema entries: the validation contract for exactly one leaf path.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use kt_common::error::{Error, Result, Violation, ViolationKind};
use kt_common::value::{type_name, ValueKind};
use kt_common::PathKey;

/// What a predicate validator decided about a value.
///
/// A predicate is simultaneously a check and an optional normalizer:
/// [`PredicateOutcome::Replace`] substitutes a normalized value (for
/// example, upper-casing an enum string) for the one that was checked.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateOutcome {
    Accept,
    Reject,
    Replace(Value),
}

/// Boxed predicate/transform function.
pub type PredicateFn = Arc<dyn Fn(&Value) -> PredicateOutcome + Send + Sync>;

/// A validator attached to a schema entry.
#[derive(Clone)]
pub enum Validator {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    /// Full-match pattern. `pattern` is the text as written; `regex` is the
    /// anchored form actually applied.
    Pattern { regex: Regex, pattern: String },
    /// Arbitrary predicate/transform.
    Predicate(PredicateFn),
}

impl Validator {
    /// Inclusive `[min, max]` range validator.
    pub fn range(min: f64, max: f64) -> Self {
        Validator::Range { min, max }
    }

    /// Full-match pattern validator.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            Error::SchemaDefinition(format!("invalid pattern '{pattern}': {e}"))
        })?;
        Ok(Validator::Pattern {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Predicate/transform validator.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> PredicateOutcome + Send + Sync + 'static,
    {
        Validator::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Range { min, max } => write!(f, "Range({min} ..= {max})"),
            Validator::Pattern { pattern, .. } => write!(f, "Pattern({pattern})"),
            Validator::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Validation rules for one addressable leaf value.
///
/// Immutable after construction, with one documented exception:
/// [`SchemaEntry::set_validator`] late-binds a validator onto an
/// already-built entry.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    path: PathKey,
    name: String,
    kind: ValueKind,
    default: Option<Value>,
    required: bool,
    nullable: bool,
    validator: Option<Validator>,
}

impl SchemaEntry {
    /// New entry for `path` requiring `kind`; the name is the last path
    /// segment, the entry is required and nullable, with no default and no
    /// validator.
    pub fn new(path: PathKey, kind: ValueKind) -> Self {
        let name = path.name().to_string();
        Self {
            path,
            name,
            kind,
            default: None,
            required: true,
            nullable: true,
            validator: None,
        }
    }

    /// New entry with an explicit name, which must equal the last path
    /// segment.
    pub fn named(name: impl Into<String>, path: PathKey, kind: ValueKind) -> Result<Self> {
        let name = name.into();
        if name != path.name() {
            return Err(Error::SchemaDefinition(format!(
                "entry name '{name}' does not match last segment of '{path}'"
            )));
        }
        Ok(Self::new(path, kind))
    }

    /// Attach a default. The default must itself satisfy the entry's type.
    pub fn with_default(mut self, default: impl Into<Value>) -> Result<Self> {
        let default = default.into();
        match self.kind.coerce(&default) {
            Some(resolved) => {
                self.default = Some(resolved);
                Ok(self)
            }
            None => Err(Error::SchemaDefinition(format!(
                "default for '{}' must be {}, got {}",
                self.path,
                self.kind.name(),
                type_name(&default)
            ))),
        }
    }

    /// Mark the entry as not required: absence without a default is fine.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Forbid an explicit null value.
    pub fn non_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Attach a validator at construction time.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Late-bind a validator on an already-built entry. This is the one
    /// mutation the type supports after construction.
    pub fn set_validator(&mut self, validator: Validator) {
        self.validator = Some(validator);
    }

    pub fn path(&self) -> &PathKey {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Validate a value read from a configuration tree.
    ///
    /// `None` means the path was absent. Returns the resolved value to
    /// write back, or `Ok(None)` when the entry is optional, absent, and
    /// has no default (nothing to write).
    pub fn validate(&self, value: Option<&Value>) -> std::result::Result<Option<Value>, Violation> {
        let value = match value {
            None => {
                return if let Some(default) = &self.default {
                    Ok(Some(default.clone()))
                } else if !self.required {
                    Ok(None)
                } else {
                    Err(self.violation(ViolationKind::MissingRequiredField))
                };
            }
            Some(value) => value,
        };

        if value.is_null() {
            return if self.nullable {
                Ok(Some(Value::Null))
            } else {
                Err(self.violation(ViolationKind::NullNotAllowed))
            };
        }

        let resolved = self.kind.coerce(value).ok_or_else(|| {
            self.violation(ViolationKind::TypeMismatch {
                expected: self.kind.name(),
                actual: type_name(value).to_string(),
            })
        })?;

        let resolved = match &self.validator {
            None => resolved,
            Some(Validator::Range { min, max }) => {
                let number = resolved.as_f64().ok_or_else(|| {
                    self.violation(ViolationKind::TypeMismatch {
                        expected: "number",
                        actual: type_name(&resolved).to_string(),
                    })
                })?;
                if number < *min || number > *max {
                    return Err(self.violation(ViolationKind::RangeViolation {
                        min: *min,
                        max: *max,
                        actual: number,
                    }));
                }
                resolved
            }
            Some(Validator::Pattern { regex, pattern }) => {
                let text = resolved.as_str().ok_or_else(|| {
                    self.violation(ViolationKind::TypeMismatch {
                        expected: "string",
                        actual: type_name(&resolved).to_string(),
                    })
                })?;
                if !regex.is_match(text) {
                    return Err(self.violation(ViolationKind::PatternViolation {
                        pattern: pattern.clone(),
                        actual: text.to_string(),
                    }));
                }
                resolved
            }
            Some(Validator::Predicate(predicate)) => match predicate(&resolved) {
                PredicateOutcome::Accept => resolved,
                PredicateOutcome::Replace(replacement) => replacement,
                PredicateOutcome::Reject => {
                    return Err(self.violation(ViolationKind::PredicateViolation {
                        actual: resolved.to_string(),
                    }))
                }
            },
        };

        Ok(Some(resolved))
    }

    fn violation(&self, kind: ViolationKind) -> Violation {
        Violation::new(self.path.clone(), kind)
    }
}
