//! Canonical dotted-path addresses for nested configuration mappings.
//!
//! A [`PathKey`] is an ordered, non-empty sequence of non-empty string
//! segments. It is the one way configuration locations are addressed; ad hoc
//! string splitting never appears at call sites.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Delimiter between segments in the textual form.
pub const PATH_DELIMITER: char = '.';

/// A normalized nested-mapping address.
///
/// Two keys are equal iff their segment sequences are equal element-wise;
/// equality and hashing are structural so a `PathKey` can be used as a
/// mapping key. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    segments: Vec<String>,
}

impl PathKey {
    /// Parse a dotted path like `"app.server.port"`.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        if text.is_empty() {
            return Err(Error::MalformedPath("path is empty".to_string()));
        }
        let segments: Vec<String> = text.split(PATH_DELIMITER).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::MalformedPath(format!(
                "empty segment in '{text}'"
            )));
        }
        Ok(Self { segments })
    }

    /// Build a key from an explicit segment sequence.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::MalformedPath(
                "segment sequence is empty".to_string(),
            ));
        }
        if segments.iter().any(String::is_empty) {
            return Err(Error::MalformedPath(format!(
                "empty segment in {segments:?}"
            )));
        }
        // A segment containing the delimiter would not survive the textual
        // round-trip.
        if let Some(bad) = segments.iter().find(|s| s.contains(PATH_DELIMITER)) {
            return Err(Error::MalformedPath(format!(
                "segment '{bad}' contains the delimiter"
            )));
        }
        Ok(Self { segments })
    }

    /// The ordered segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, conventionally the entry name.
    pub fn name(&self) -> &str {
        self.segments.last().expect("PathKey is never empty")
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment plus everything before it, for walk-then-assign loops.
    pub fn split_last(&self) -> (&String, &[String]) {
        self.segments.split_last().expect("PathKey is never empty")
    }

    /// The dotted textual form. Round-trips with [`PathKey::from_text`].
    pub fn to_text(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for PathKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for PathKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(&text).map_err(de::Error::custom)
    }
}
