//! Path types for addressing nested attributes.
//!
//! A path is an ordered sequence of [`Segment`]s describing a location in the
//! attribute tree. The string grammar is public and fixed: segments are
//! separated by `.`, list indices are written `[n]`, and `[]` means "append
//! to the list" (internally normalized to the append sentinel `[-1]`).
//!
//! # Usage
//!
//! ```
//! use nidus::path::{Path, Segment};
//!
//! // Parse from the string grammar (never fails; empty input yields an
//! // empty path, which is rejected later when used for an assignment).
//! let path = Path::from("users[2].name");
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.to_string(), "users[2].name");
//!
//! // Build incrementally
//! let path = Path::new().key("users").index(2).key("name");
//! assert_eq!(path.segments()[1], Segment::Index(2));
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error type for attribute path failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The input resolved to zero segments, so there is nothing to address.
    #[error("no valid attribute path: \"{input}\"")]
    NoSegments { input: String },
}

/// A single segment of an attribute path.
///
/// Tokenization is purely lexical: a segment that consists only of decimal
/// digits is an index, everything else is a key. The append marker `[]` has
/// no position of its own; it resolves to the target list's length at merge
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key access: `name`
    Key(String),
    /// List index access: `[2]`
    Index(usize),
    /// List append: `[]`
    Append,
}

impl Segment {
    /// Create a key segment.
    pub fn key(k: impl Into<String>) -> Self {
        Segment::Key(k.into())
    }

    /// Create an index segment.
    pub fn index(i: usize) -> Self {
        Segment::Index(i)
    }

    /// Returns true if this is a key segment.
    pub fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }

    /// Returns true if this is an index segment.
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Returns true if this is the append marker.
    pub fn is_append(&self) -> bool {
        matches!(self, Segment::Append)
    }

    /// Get the key if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Get the index if this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Key(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Segment::Key(s)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

/// An owned attribute path.
///
/// `Path` converts freely from the string grammar and back: parsing is total
/// (any string yields a path, possibly empty) and [`Path::to_string`] is the
/// exact inverse for canonical inputs. The append sentinel never appears in
/// an already-merged path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a path from a vector of segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Appends a key segment and returns self (builder pattern).
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(k.into()));
        self
    }

    /// Appends an index segment and returns self (builder pattern).
    pub fn index(mut self, i: usize) -> Self {
        self.segments.push(Segment::Index(i));
        self
    }

    /// Pushes a segment onto the path.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Removes and returns the last segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: impl Into<Path>) -> Self {
        self.segments.extend(other.into().segments);
        self
    }

    /// Returns the path segments as a slice.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the last segment, or `None` if the path is empty.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Returns the parent path, or `None` if there is at most one segment.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Parses a path from the string grammar.
    ///
    /// Every literal `[]` is first rewritten to the internal append sentinel
    /// `[-1]`; the input is then split on `.`, `[` and `]`, and each token
    /// becomes an [`Segment::Index`] if it is all decimal digits, the append
    /// marker if it is `-1`, and a [`Segment::Key`] otherwise. No value
    /// inspection happens here.
    pub fn parse(input: &str) -> Self {
        let rewritten = input.replace("[]", "[-1]");
        let segments = rewritten
            .split(['.', '[', ']'])
            .filter(|token| !token.is_empty())
            .map(|token| {
                if token == "-1" {
                    Segment::Append
                } else if token.bytes().all(|b| b.is_ascii_digit()) {
                    match token.parse::<usize>() {
                        Ok(i) => Segment::Index(i),
                        Err(_) => Segment::Key(token.to_string()),
                    }
                } else {
                    Segment::Key(token.to_string())
                }
            })
            .collect();
        Self { segments }
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::parse(&s)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path::from_segments(segments)
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) if i == 0 => write!(f, "{n}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
                Segment::Append => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;
        let s = String::deserialize(deserializer)?;
        Ok(Path::parse(&s))
    }
}
