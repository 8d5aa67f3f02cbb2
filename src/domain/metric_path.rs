//! Dotted metric paths and their resolution against JSON stats documents.
//!
//! A [`MetricPath`] is both a traversal key sequence into a stats document
//! and the literal suffix of the emitted metric name.

use crate::domain::errors::PathError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Non-empty sequence of non-empty key segments, e.g. `pipeline.events.in`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricPath {
    dotted: String,
    segments: Vec<String>,
}

impl MetricPath {
    /// Parse a dot-delimited identifier.
    ///
    /// Rejects the empty string and empty segments (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(dotted: &str) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: dotted.to_string(),
            });
        }

        Ok(Self {
            dotted: dotted.to_string(),
            segments,
        })
    }

    /// Parse a static list of identifiers, failing on the first bad one.
    pub fn parse_all(dotted: &[&str]) -> Result<Vec<Self>, PathError> {
        dotted.iter().map(|p| Self::parse(p)).collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    /// Metric name for this path under `namespace`.
    pub fn qualified(&self, namespace: &str) -> String {
        format!("{}.{}", namespace, self.dotted)
    }

    /// Resolve this path against a stats document.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Resolution<'a> {
        resolve(&self.segments, doc)
    }
}

impl fmt::Display for MetricPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

impl FromStr for MetricPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Result of looking up a [`MetricPath`] in a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a Value),
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolution::Found(v) => Some(v),
            Resolution::NotFound => None,
        }
    }
}

/// Walk `segments` down through nested objects of `doc`.
///
/// Every step descends one object level. A key spelled with literal dots
/// (`"events.out"`) matches the corresponding run of segments; the plain
/// nested key is always tried first. Hitting a non-object while segments
/// remain is a miss, not an error.
fn resolve<'a>(segments: &[String], doc: &'a Value) -> Resolution<'a> {
    let Some(map) = doc.as_object() else {
        return Resolution::NotFound;
    };

    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push('.');
        }
        key.push_str(segment);

        if let Some(child) = map.get(&key) {
            let rest = &segments[i + 1..];
            if rest.is_empty() {
                return Resolution::Found(child);
            }
            if let found @ Resolution::Found(_) = resolve(rest, child) {
                return found;
            }
        }
    }

    Resolution::NotFound
}
