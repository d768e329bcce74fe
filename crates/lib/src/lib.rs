//!
//! Nidus: a nested attribute store.
//!
//! Nidus keeps a tree of attributes addressable by dotted/bracketed path
//! strings such as `"a.b[2].c"`, generalizing flat key-value model storage to
//! arbitrary depth, including nested lists. Writes deep-merge into the
//! existing tree and emit change notifications scoped to the exact sub-path
//! that changed.
//!
//! ## Core Concepts
//!
//! * **Paths (`path::Path`)**: ordered segment sequences parsed from the
//!   public grammar: `.` separates keys, `[n]` indexes a list, `[]` appends.
//! * **Values (`value::Value`)**: the attribute tree's tagged data union of
//!   scalars, mappings and lists, cloned deeply and serialized as plain JSON.
//! * **Fragments (`fragment::Fragment`)**: the minimal nested structure a
//!   single `(path, value)` assignment denotes, consumed by the merger.
//! * **The model (`store::NestedModel`)**: public get/has/set/unset/
//!   remove_and_compact/to_snapshot operations over a constructor-injected
//!   observable store (`store::ObservableStore`), which owns top-level
//!   storage and delivers notifications.
//!
//! ## Usage
//!
//! ```
//! use nidus::{NestedModel, SetOptions, Value};
//!
//! let mut model = NestedModel::in_memory();
//! model.set([("user.name", "Alice")], SetOptions::default())?;
//! model.set([("user.tags[]", "admin")], SetOptions::default())?;
//!
//! assert_eq!(model.get("user.name"), Some(&Value::from("Alice")));
//! assert!(model.has("user.tags[0]"));
//! # Ok::<(), nidus::Error>(())
//! ```

pub mod events;
pub mod fragment;
mod merge;
pub mod path;
pub mod store;
pub mod value;

pub use events::{ChangeEvent, ChangeKind};
pub use path::{Path, PathError, Segment};
pub use store::{InMemoryStore, NestedModel, ObservableStore, SetOptions};
pub use value::{Map, Value};

/// Result type used throughout the nidus library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the nidus library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured path errors from the path and fragment modules
    #[error(transparent)]
    Path(#[from] path::PathError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is an invalid attribute path.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
