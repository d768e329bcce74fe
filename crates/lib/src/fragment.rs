//! Single-assignment fragments.
//!
//! A fragment is the minimal nested structure a single `(path, value)`
//! assignment denotes in isolation: a chain of one-entry levels ending in
//! the leaf value. Each level is tagged with the container kind its path
//! segment implies, so the merger dispatches by pattern matching instead of
//! inspecting keys at runtime. Fragments are built fresh per `set` key,
//! consumed immediately by the merger, and discarded.

use crate::path::{Path, PathError, Segment};
use crate::value::{Map, Value};

/// One level of a single-assignment chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// The assigned value itself.
    Leaf(Value),
    /// A single mapping entry.
    Entry { key: String, child: Box<Fragment> },
    /// A single list slot. `index` is `None` for the append marker, which
    /// resolves against the target list's length at merge time.
    Slot {
        index: Option<usize>,
        child: Box<Fragment>,
    },
}

impl Fragment {
    /// Builds the fragment for assigning `value` at `path`.
    ///
    /// The container kind of each level is chosen by that level's segment
    /// kind: an index or append segment implies a list, a key segment a
    /// mapping.
    ///
    /// # Errors
    /// Returns [`PathError::NoSegments`] for an empty path. Nothing has been
    /// mutated when this fails; callers reject the whole operation.
    pub fn build(path: &Path, value: Value) -> Result<Self, PathError> {
        match path.segments().split_first() {
            None => Err(PathError::NoSegments {
                input: path.to_string(),
            }),
            Some((first, rest)) => Ok(Self::wrap(first, rest, value)),
        }
    }

    fn wrap(segment: &Segment, rest: &[Segment], value: Value) -> Self {
        let child = match rest.split_first() {
            None => Fragment::Leaf(value),
            Some((next, tail)) => Self::wrap(next, tail, value),
        };
        match segment {
            Segment::Key(k) => Fragment::Entry {
                key: k.clone(),
                child: Box::new(child),
            },
            Segment::Index(i) => Fragment::Slot {
                index: Some(*i),
                child: Box::new(child),
            },
            Segment::Append => Fragment::Slot {
                index: None,
                child: Box::new(child),
            },
        }
    }

    /// Whether this fragment denotes a container at its own level.
    ///
    /// Entries and slots are containers by construction; a leaf counts when
    /// the assigned value itself is a mapping or list, which is what lets a
    /// container value deep-merge into existing data instead of replacing it.
    pub(crate) fn is_container(&self) -> bool {
        match self {
            Fragment::Entry { .. } | Fragment::Slot { .. } => true,
            Fragment::Leaf(value) => value.is_container(),
        }
    }

    /// Materializes this fragment as plain data, for wholesale installation
    /// where no existing value is merged into.
    ///
    /// A slot at index `i` pads the positions before it with `Null`; an
    /// append slot lands at index 0 of the fresh list (the current length of
    /// a new list).
    pub fn to_value(&self) -> Value {
        match self {
            Fragment::Leaf(value) => value.clone(),
            Fragment::Entry { key, child } => {
                let mut map = Map::new();
                map.set(key.clone(), child.to_value());
                Value::Map(map)
            }
            Fragment::Slot { index, child } => {
                let mut items = vec![Value::Null; index.unwrap_or(0)];
                items.push(child.to_value());
                Value::List(items)
            }
        }
    }
}
