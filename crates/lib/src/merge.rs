//! Structural merge of fragments into the attribute tree.
//!
//! The merger reconciles a [`Fragment`] into a mutable deep copy of the
//! current tree, in place. Dispatch is by pattern matching over the fragment
//! and destination tags. Alongside the mutation it collects the change
//! records the operation implies:
//!
//! * a `Changed` record for every touched sub-path of depth > 1 (top-level
//!   keys are the injected store's responsibility), ordered top of path to
//!   leaf;
//! * an `Added`/`Removed` record when a list element transitions between
//!   falsy and truthy, placed before the `Changed` record for the same
//!   position.
//!
//! When a fragment bottoms out in a container value and the destination at
//! that position is also a container, merging continues element-wise through
//! the plain value tree, so assigning a mapping deep-merges into existing
//! data rather than replacing it.
//!
//! Shape mismatches the path grammar cannot express (a string key applied
//! to a list, an append marker applied to a mapping) are skipped, logged at
//! debug level, and otherwise not guarded.

use crate::events::ChangeEvent;
use crate::fragment::Fragment;
use crate::path::{Path, Segment};
use crate::value::{Map, Value};

/// Merges `fragment` into `dest` in place, appending change records to
/// `changes`. `prefix` is the path of `dest` itself and is restored before
/// returning.
pub(crate) fn merge(
    dest: &mut Value,
    fragment: &Fragment,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    match fragment {
        Fragment::Entry { key, child } => merge_key(dest, key, child, silent, prefix, changes),
        Fragment::Slot { index, child } => merge_slot(dest, *index, child, silent, prefix, changes),
        // A bare leaf has no position of its own; `Fragment::build` never
        // yields one at the top of a chain.
        Fragment::Leaf(_) => {}
    }
}

/// Applies a single mapping entry to `dest`.
fn merge_key(
    dest: &mut Value,
    key: &str,
    child: &Fragment,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    let Value::Map(map) = dest else {
        tracing::debug!(
            key,
            container = dest.type_name(),
            "string key applied to a non-mapping container, skipping"
        );
        return;
    };

    // An entry whose child is list-shaped turns the destination into a list
    // before merging; intermediate levels may have been built as mappings.
    if is_list_shaped(child) && !matches!(map.get(key), Some(Value::List(_))) {
        map.set(key.to_string(), Value::List(Vec::new()));
    }

    let recurse = child.is_container() && matches!(map.get(key), Some(v) if v.is_container());

    prefix.push(Segment::Key(key.to_string()));
    if recurse {
        if let Some(existing) = map.get_mut(key) {
            let mark = changes.len();
            descend(existing, child, silent, prefix, changes);
            if !silent && prefix.len() > 1 {
                changes.insert(mark, ChangeEvent::changed(prefix.clone(), existing.clone()));
            }
        }
    } else {
        let value = child.to_value();
        map.set(key.to_string(), value.clone());
        if !silent && prefix.len() > 1 {
            changes.push(ChangeEvent::changed(prefix.clone(), value));
        }
    }
    prefix.pop();
}

/// Applies a single list slot to `dest`.
fn merge_slot(
    dest: &mut Value,
    index: Option<usize>,
    child: &Fragment,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    if matches!(dest, Value::Map(_)) {
        // Numeric segments address string-keyed storage by their decimal
        // form; an append marker has no meaning there.
        match index {
            Some(i) => merge_key(dest, &i.to_string(), child, silent, prefix, changes),
            None => tracing::debug!("append marker applied to a mapping, skipping"),
        }
        return;
    }
    let Value::List(list) = dest else {
        tracing::debug!(
            container = dest.type_name(),
            "index applied to a scalar, skipping"
        );
        return;
    };

    // Appends resolve against the list length at merge time; the resolved
    // index, never the sentinel, appears in notification paths.
    let idx = index.unwrap_or(list.len());

    if is_list_shaped(child) && !matches!(list.get(idx), Some(Value::List(_))) {
        pad_to(list, idx);
        list[idx] = Value::List(Vec::new());
    }

    let recurse = child.is_container() && matches!(list.get(idx), Some(v) if v.is_container());

    prefix.push(Segment::Index(idx));
    if recurse {
        if let Some(existing) = list.get_mut(idx) {
            let mark = changes.len();
            descend(existing, child, silent, prefix, changes);
            if !silent && prefix.len() > 1 {
                changes.insert(mark, ChangeEvent::changed(prefix.clone(), existing.clone()));
            }
        }
    } else {
        let old = list.get(idx).cloned().unwrap_or(Value::Null);
        let value = child.to_value();
        pad_to(list, idx);
        list[idx] = value.clone();
        if !silent {
            if !old.is_truthy() && value.is_truthy() {
                changes.push(ChangeEvent::added(prefix.clone(), value.clone()));
            } else if old.is_truthy() && !value.is_truthy() {
                changes.push(ChangeEvent::removed(prefix.clone(), old));
            }
            if prefix.len() > 1 {
                changes.push(ChangeEvent::changed(prefix.clone(), value));
            }
        }
    }
    prefix.pop();
}

/// Continues below a fragment level: chain levels keep merging as fragments,
/// a container leaf merges as a plain value tree.
fn descend(
    dest: &mut Value,
    child: &Fragment,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    match child {
        Fragment::Leaf(value) => merge_tree(dest, value, silent, prefix, changes),
        _ => merge(dest, child, silent, prefix, changes),
    }
}

/// Element-wise merge of a plain value tree into `dest`. Both sides are
/// containers when called.
fn merge_tree(
    dest: &mut Value,
    source: &Value,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    match (dest, source) {
        (Value::Map(map), Value::Map(entries)) => {
            for (key, value) in entries.iter() {
                tree_key(map, key, value, silent, prefix, changes);
            }
        }
        (Value::List(list), Value::List(items)) => {
            for (idx, value) in items.iter().enumerate() {
                tree_index(list, idx, value, silent, prefix, changes);
            }
        }
        (Value::Map(map), Value::List(items)) => {
            // List content addressed into string-keyed storage lands under
            // decimal keys.
            for (idx, value) in items.iter().enumerate() {
                tree_key(map, &idx.to_string(), value, silent, prefix, changes);
            }
        }
        (Value::List(_), Value::Map(entries)) => {
            for key in entries.keys() {
                tracing::debug!(key, "string key applied to a list, skipping");
            }
        }
        _ => {}
    }
}

/// Applies one key of a plain mapping tree to `map`.
fn tree_key(
    map: &mut Map,
    key: &str,
    source: &Value,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    if is_list_value(source) && !matches!(map.get(key), Some(Value::List(_))) {
        map.set(key.to_string(), Value::List(Vec::new()));
    }

    let recurse = source.is_container() && matches!(map.get(key), Some(v) if v.is_container());

    prefix.push(Segment::Key(key.to_string()));
    if recurse {
        if let Some(existing) = map.get_mut(key) {
            let mark = changes.len();
            merge_tree(existing, source, silent, prefix, changes);
            if !silent && prefix.len() > 1 {
                changes.insert(mark, ChangeEvent::changed(prefix.clone(), existing.clone()));
            }
        }
    } else {
        map.set(key.to_string(), source.clone());
        if !silent && prefix.len() > 1 {
            changes.push(ChangeEvent::changed(prefix.clone(), source.clone()));
        }
    }
    prefix.pop();
}

/// Applies one position of a plain list tree to `list`.
fn tree_index(
    list: &mut Vec<Value>,
    idx: usize,
    source: &Value,
    silent: bool,
    prefix: &mut Path,
    changes: &mut Vec<ChangeEvent>,
) {
    if is_list_value(source) && !matches!(list.get(idx), Some(Value::List(_))) {
        pad_to(list, idx);
        list[idx] = Value::List(Vec::new());
    }

    let recurse = source.is_container() && matches!(list.get(idx), Some(v) if v.is_container());

    prefix.push(Segment::Index(idx));
    if recurse {
        if let Some(existing) = list.get_mut(idx) {
            let mark = changes.len();
            merge_tree(existing, source, silent, prefix, changes);
            if !silent && prefix.len() > 1 {
                changes.insert(mark, ChangeEvent::changed(prefix.clone(), existing.clone()));
            }
        }
    } else {
        let old = list.get(idx).cloned().unwrap_or(Value::Null);
        pad_to(list, idx);
        list[idx] = source.clone();
        if !silent {
            if !old.is_truthy() && source.is_truthy() {
                changes.push(ChangeEvent::added(prefix.clone(), source.clone()));
            } else if old.is_truthy() && !source.is_truthy() {
                changes.push(ChangeEvent::removed(prefix.clone(), old));
            }
            if prefix.len() > 1 {
                changes.push(ChangeEvent::changed(prefix.clone(), source.clone()));
            }
        }
    }
    prefix.pop();
}

/// Whether a fragment announces list content at its own level: a slot, or a
/// leaf holding a list with at least one element. An empty list announces no
/// positions and so never converts an existing container.
fn is_list_shaped(fragment: &Fragment) -> bool {
    match fragment {
        Fragment::Slot { .. } => true,
        Fragment::Leaf(value) => is_list_value(value),
        Fragment::Entry { .. } => false,
    }
}

/// The value-tree side of [`is_list_shaped`].
fn is_list_value(value: &Value) -> bool {
    matches!(value, Value::List(items) if !items.is_empty())
}

/// Grows `list` with `Null` so that `idx` is a valid position. Padding is
/// silent; only explicitly targeted positions notify.
fn pad_to(list: &mut Vec<Value>, idx: usize) {
    while list.len() <= idx {
        list.push(Value::Null);
    }
}
