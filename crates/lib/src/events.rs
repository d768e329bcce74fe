//! Change notifications emitted by merges.
//!
//! Every mutation of the tree below the top level is described by
//! [`ChangeEvent`]s: a `Changed` record for each touched sub-path of depth
//! greater than one, and an `Added`/`Removed` record for list element
//! presence transitions. Events are delivered synchronously through the
//! injected [`ObservableStore`](crate::ObservableStore) and never stored by
//! the core.

use crate::path::Path;
use crate::value::Value;

/// The kind of change a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChangeKind {
    /// A sub-path's value changed (wire prefix `change:`).
    Changed,
    /// A list element transitioned from absent/falsy to present
    /// (wire prefix `add:`).
    Added,
    /// A list element transitioned from present to absent/falsy
    /// (wire prefix `remove:`).
    Removed,
}

impl ChangeKind {
    /// The event-name prefix for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Changed => "change",
            ChangeKind::Added => "add",
            ChangeKind::Removed => "remove",
        }
    }
}

/// A single change notification.
///
/// `value` is the new value for `Changed` and `Added` records, and the old
/// value for `Removed` records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: Path,
    pub value: Value,
}

impl ChangeEvent {
    /// Creates a `Changed` record.
    pub fn changed(path: Path, value: Value) -> Self {
        Self {
            kind: ChangeKind::Changed,
            path,
            value,
        }
    }

    /// Creates an `Added` record.
    pub fn added(path: Path, value: Value) -> Self {
        Self {
            kind: ChangeKind::Added,
            path,
            value,
        }
    }

    /// Creates a `Removed` record carrying the old value.
    pub fn removed(path: Path, old_value: Value) -> Self {
        Self {
            kind: ChangeKind::Removed,
            path,
            value: old_value,
        }
    }

    /// The wire event name, e.g. `"change:a.b[2]"`.
    pub fn name(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.path)
    }
}
