//! Textual numeric intervals.
//!
//! The interval syntax is `MIN .. MAX` with optional surrounding square
//! brackets and integer, float, or scientific-notation bounds: `1..10`,
//! `0.5 .. 2.5`, `[1e-3 .. 1e3]`. Both ends are inclusive; exclusive-bound
//! syntax is not supported and parses as malformed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Error;

const NUMBER: &str = r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?";

fn interval_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| {
        Regex::new(&format!(r"^\[?\s*({NUMBER})\s*\.\.\s*({NUMBER})\s*\]?$"))
            .expect("interval regex is valid")
    })
}

/// A closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// Construct from bounds; the bounds must be finite and ordered.
    pub fn new(min: f64, max: f64) -> Result<Self, Error> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::SchemaDefinition(format!(
                "interval bounds must be finite, got {min} .. {max}"
            )));
        }
        if min > max {
            return Err(Error::SchemaDefinition(format!(
                "interval bounds reversed: {min} > {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Parse interval text like `"10 .. 20"` or `"[0.5..2.5]"`.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let captures = interval_rx().captures(text.trim()).ok_or_else(|| {
            Error::SchemaDefinition(format!("not an interval: '{text}'"))
        })?;
        let min: f64 = captures[1]
            .parse()
            .map_err(|_| Error::SchemaDefinition(format!("bad interval minimum in '{text}'")))?;
        let max: f64 = captures[2]
            .parse()
            .map_err(|_| Error::SchemaDefinition(format!("bad interval maximum in '{text}'")))?;
        Self::new(min, max)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// The canonical rendering: bare `MIN .. MAX`, integral bounds without
    /// a decimal point.
    pub fn canonical_text(&self) -> String {
        format!("{} .. {}", format_number(self.min), format_number(self.max))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_text())
    }
}

/// Whether `text` parses as interval syntax.
pub fn is_interval_text(text: &str) -> bool {
    Interval::parse(text).is_ok()
}

/// Render a finite number, dropping the fractional part when integral.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
