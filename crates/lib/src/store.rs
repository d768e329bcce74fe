//! The nested attribute model and its observable storage seam.
//!
//! [`NestedModel`] is the public entry point. It extends an injected
//! [`ObservableStore`], the flat top-level key-value storage that owns the
//! attribute tree and delivers notifications, with path-addressed reads and
//! deep-merging writes. Every mutation works on a private deep copy of the
//! tree and installs it atomically at the end, so a failing call leaves the
//! prior state completely untouched.

use crate::Result;
use crate::events::ChangeEvent;
use crate::fragment::Fragment;
use crate::merge;
use crate::path::{Path, Segment};
use crate::value::{Map, Value};

/// Options accepted by the mutating operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Suppress all notifications for this call, both the fine-grained
    /// path-level records and the store's own top-level ones.
    pub silent: bool,
}

impl SetOptions {
    /// Options with `silent` set.
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// The flat observable key-value storage a [`NestedModel`] extends.
///
/// Implementations own the top-level attribute mapping and the delivery of
/// notifications. The model only ever reads top-level values, installs a
/// fully merged replacement mapping, and hands over the change records its
/// merges produce.
pub trait ObservableStore {
    /// The full top-level attribute mapping.
    fn attributes(&self) -> &Map;

    /// Replaces the top-level attributes wholesale. Unless `silent`, fires a
    /// `Changed` notification for every top-level key whose value differs
    /// from the previous mapping.
    fn replace(&mut self, attrs: Map, silent: bool);

    /// Delivers one notification.
    fn trigger(&mut self, event: ChangeEvent);

    /// Primitive top-level read.
    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }
}

/// An in-process [`ObservableStore`] that records delivered notifications.
///
/// The event log stands in for an external event bus: embedders and tests
/// read delivery order from [`events`](InMemoryStore::events) instead of
/// subscribing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    attrs: Map,
    events: Vec<ChangeEvent>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given attributes.
    pub fn with_attributes(attrs: Map) -> Self {
        Self {
            attrs,
            events: Vec::new(),
        }
    }

    /// All notifications delivered so far, in order.
    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    /// Drains and returns the delivered notifications.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clears the notification log.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ObservableStore for InMemoryStore {
    fn attributes(&self) -> &Map {
        &self.attrs
    }

    fn replace(&mut self, attrs: Map, silent: bool) {
        if !silent {
            // Keys dropped by the replacement read back as Null
            for (key, _) in self.attrs.iter() {
                if !attrs.contains_key(key) {
                    self.events
                        .push(ChangeEvent::changed(Path::new().key(key), Value::Null));
                }
            }
            for (key, value) in attrs.iter() {
                if self.attrs.get(key) != Some(value) {
                    self.events
                        .push(ChangeEvent::changed(Path::new().key(key), value.clone()));
                }
            }
        }
        self.attrs = attrs;
    }

    fn trigger(&mut self, event: ChangeEvent) {
        self.events.push(event);
    }
}

/// A nested attribute model over an injected observable store.
///
/// All operations are synchronous; notifications are delivered within the
/// mutating call, keys in input order, and within one key parent paths
/// before child paths.
#[derive(Debug)]
pub struct NestedModel<S: ObservableStore> {
    store: S,
}

impl NestedModel<InMemoryStore> {
    /// Creates a model backed by a fresh [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl Default for NestedModel<InMemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: ObservableStore> NestedModel<S> {
    /// Creates a model over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The injected store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the injected store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the model, returning the injected store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads the value at `path`.
    ///
    /// The first segment resolves through the store's primitive getter; the
    /// rest walk the tree. Any missing intermediate, shape mismatch or
    /// unresolved append marker short-circuits to `None`: a deep read of a
    /// nonexistent path is a normal "not found", never an error. Reads never
    /// notify.
    pub fn get(&self, path: impl Into<Path>) -> Option<&Value> {
        let path = path.into();
        let mut segments = path.segments().iter();
        let mut current = match segments.next()? {
            Segment::Key(k) => self.store.get(k)?,
            Segment::Index(i) => self.store.get(&i.to_string())?,
            Segment::Append => return None,
        };
        for segment in segments {
            current = match (current, segment) {
                (Value::Map(map), Segment::Key(k)) => map.get(k)?,
                (Value::Map(map), Segment::Index(i)) => map.get(&i.to_string())?,
                (Value::List(list), Segment::Index(i)) => list.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns true if `path` holds a value that is neither absent nor null.
    pub fn has(&self, path: impl Into<Path>) -> bool {
        self.get(path).is_some_and(|value| !value.is_null())
    }

    /// Assigns every `(path, value)` pair in `attrs`, deep-merging into the
    /// current tree.
    ///
    /// All fragments are built up front: any invalid path rejects the whole
    /// call before any mutation or notification (all-or-nothing). The merge
    /// then runs on a single deep copy of the tree, key by key in input
    /// order, delivering each key's change records immediately; the merged
    /// copy is installed through the store's primitive setter at the end,
    /// which fires the coarse top-level notifications.
    pub fn set<I, P, V>(&mut self, attrs: I, opts: SetOptions) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<Path>,
        V: Into<Value>,
    {
        let mut staged = Vec::new();
        for (path, value) in attrs {
            let path: Path = path.into();
            staged.push(Fragment::build(&path, value.into())?);
        }
        tracing::trace!(keys = staged.len(), silent = opts.silent, "applying nested set");

        let mut tree = Value::Map(self.store.attributes().clone());
        for fragment in &staged {
            let mut changes = Vec::new();
            merge::merge(&mut tree, fragment, opts.silent, &mut Path::new(), &mut changes);
            for event in changes {
                self.store.trigger(event);
            }
        }
        if let Value::Map(tree) = tree {
            self.store.replace(tree, opts.silent);
        }
        Ok(self)
    }

    /// Clears the value at `path` by assigning `Null`.
    pub fn unset(&mut self, path: impl Into<Path>, opts: SetOptions) -> Result<&mut Self> {
        self.set([(path.into(), Value::Null)], opts)
    }

    /// Clears the value at `path`, then, if the final segment is a list
    /// index, compacts the parent list: every falsy element is dropped and
    /// the gap closes.
    ///
    /// Compaction reindexes all trailing elements, which is why this is a
    /// separately named operation; any outstanding index-based path into the
    /// list is stale after it returns. The compacted list installs silently.
    pub fn remove_and_compact(
        &mut self,
        path: impl Into<Path>,
        opts: SetOptions,
    ) -> Result<&mut Self> {
        let path = path.into();
        self.unset(path.clone(), opts)?;

        let Some(Segment::Index(_)) = path.last() else {
            return Ok(self);
        };
        let Some(parent) = path.parent() else {
            return Ok(self);
        };
        let compacted = match self.get(&parent) {
            Some(Value::List(items)) => {
                let kept: Vec<Value> = items.iter().filter(|v| v.is_truthy()).cloned().collect();
                tracing::debug!(
                    path = %parent,
                    dropped = items.len() - kept.len(),
                    "compacting list after removal"
                );
                Some(kept)
            }
            _ => None,
        };
        if let Some(compacted) = compacted {
            self.overwrite(&parent, Value::List(compacted));
        }
        Ok(self)
    }

    /// Returns a deep copy of the full attribute tree. Mutating the returned
    /// mapping never affects the model.
    pub fn to_snapshot(&self) -> Map {
        self.store.attributes().clone()
    }

    /// Serializes the full attribute tree as a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        self.store.attributes().to_json_string()
    }

    /// Overwrites the value at an existing `path` wholesale, silently.
    ///
    /// Merge semantics would resurrect trailing list elements when a shorter
    /// list replaces a longer one, so compaction bypasses the merger.
    fn overwrite(&mut self, path: &Path, value: Value) {
        let mut tree = Value::Map(self.store.attributes().clone());
        if overwrite_at(&mut tree, path.segments(), value) {
            if let Value::Map(attrs) = tree {
                self.store.replace(attrs, true);
            }
        }
    }
}

/// Replaces the value at `segments` inside `dest`, returning whether the
/// position existed.
fn overwrite_at(dest: &mut Value, segments: &[Segment], value: Value) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let target = match (dest, first) {
        (Value::Map(map), Segment::Key(k)) => map.get_mut(k),
        (Value::Map(map), Segment::Index(i)) => map.get_mut(&i.to_string()),
        (Value::List(list), Segment::Index(i)) => list.get_mut(*i),
        _ => None,
    };
    let Some(target) = target else {
        return false;
    };
    if rest.is_empty() {
        *target = value;
        true
    } else {
        overwrite_at(target, rest, value)
    }
}
