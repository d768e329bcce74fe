//! Deep-merge semantics through the public set operation
//!
//! Assignments reconcile into the existing tree: independent paths keep
//! their siblings, scalars replace whole subtrees, and list-shaped levels
//! are inferred from the path grammar.

use crate::helpers::*;
use nidus::{Map, SetOptions, Value};

// ===== MAPPING MERGES =====

#[test]
fn test_independent_paths_preserve_siblings() {
    let mut model = model();
    model.set([("a.b", Value::from(1))], SetOptions::default()).unwrap();
    model.set([("a.c", Value::from(2))], SetOptions::default()).unwrap();

    let expected = Value::Map(Map::new().with("b", 1).with("c", 2));
    assert_eq!(model.get("a"), Some(&expected));
}

#[test]
fn test_scalar_replaces_whole_subtree() {
    let mut model = model_with(&[("a.b.c", Value::from(1))]);

    model.set([("a.b", Value::from(5))], SetOptions::default()).unwrap();

    assert_eq!(model.get("a.b"), Some(&Value::from(5)));
    assert_eq!(model.get("a.b.c"), None);
}

#[test]
fn test_deeper_write_through_scalar() {
    let mut model = model_with(&[("a.b", Value::from(5))]);

    model.set([("a.b.c", Value::from(1))], SetOptions::default()).unwrap();

    let expected = Value::Map(Map::new().with("c", 1));
    assert_eq!(model.get("a.b"), Some(&expected));
}

#[test]
fn test_assigned_mapping_merges_into_existing() {
    let mut model = model_with(&[("user.name", Value::from("Alice"))]);

    model
        .set(
            [("user", Value::Map(Map::new().with("age", 30)))],
            SetOptions::default(),
        )
        .unwrap();

    // The mapping value merged rather than replacing
    assert_eq!(model.get("user.name"), Some(&Value::from("Alice")));
    assert_eq!(model.get("user.age"), Some(&Value::from(30)));
}

// ===== LIST MERGES =====

#[test]
fn test_append_targets_current_length() {
    let mut model = model_with(&[("list", list(["x", "y"]))]);

    model.set([("list[]", Value::from("z"))], SetOptions::default()).unwrap();

    assert_eq!(model.get("list"), Some(&list(["x", "y", "z"])));
}

#[test]
fn test_append_into_fresh_subtree() {
    let mut model = model();
    model.set([("a.b[]", Value::from("first"))], SetOptions::default()).unwrap();

    assert_eq!(model.get("a.b"), Some(&list(["first"])));
    assert_eq!(model.get("a.b[0]"), Some(&Value::from("first")));
}

#[test]
fn test_index_write_pads_with_null() {
    let mut model = model_with(&[("list", list(["x"]))]);

    model.set([("list[3]", Value::from("w"))], SetOptions::default()).unwrap();

    let expected = Value::List(vec![
        Value::from("x"),
        Value::Null,
        Value::Null,
        Value::from("w"),
    ]);
    assert_eq!(model.get("list"), Some(&expected));
    assert!(!model.has("list[1]"));
}

#[test]
fn test_mapping_level_becomes_list() {
    // "a.b" was built as a mapping; an indexed write turns it into a list
    let mut model = model_with(&[("a.b", Value::Map(Map::new().with("k", 1)))]);

    model.set([("a.b[0]", Value::from("x"))], SetOptions::default()).unwrap();

    assert_eq!(model.get("a.b"), Some(&list(["x"])));
}

#[test]
fn test_nested_lists() {
    let mut model = model();
    model.set([("grid[0][1]", Value::from(9))], SetOptions::default()).unwrap();
    model.set([("grid[0][0]", Value::from(3))], SetOptions::default()).unwrap();
    model.set([("grid[1][0]", Value::from(7))], SetOptions::default()).unwrap();

    let expected = Value::List(vec![
        Value::List(vec![Value::from(3), Value::from(9)]),
        Value::List(vec![Value::from(7)]),
    ]);
    assert_eq!(model.get("grid"), Some(&expected));
}

#[test]
fn test_list_element_subtree_merge() {
    let mut model = model();
    model.set([("rows[0].id", Value::from(1))], SetOptions::default()).unwrap();
    model.set([("rows[0].label", Value::from("one"))], SetOptions::default()).unwrap();

    let expected = Value::Map(Map::new().with("id", 1).with("label", "one"));
    assert_eq!(model.get("rows[0]"), Some(&expected));
}

#[test]
fn test_assigned_list_converts_mapping_level() {
    let mut model = model_with(&[("a.b", Value::Map(Map::new().with("k", 1)))]);

    model.set([("a.b", list([1, 2]))], SetOptions::default()).unwrap();

    assert_eq!(model.get("a.b"), Some(&list([1, 2])));
    assert_eq!(model.get("a.b.k"), None);
}

#[test]
fn test_assigned_empty_list_into_container_is_inert() {
    // An empty list announces no positions, so it neither converts nor
    // clears an existing container
    let mut model = model_with(&[("a.b", Value::Map(Map::new().with("k", 1)))]);

    model.set([("a.b", Value::List(Vec::new()))], SetOptions::default()).unwrap();
    assert_eq!(model.get("a.b.k"), Some(&Value::from(1)));

    // Under an absent key it still installs wholesale
    model.set([("fresh", Value::List(Vec::new()))], SetOptions::default()).unwrap();
    assert_eq!(model.get("fresh"), Some(&Value::List(Vec::new())));
}

#[test]
fn test_assigned_list_merges_positionally() {
    let mut model = model_with(&[("tags", list(["a", "b"]))]);

    model
        .set([("tags", list(["z"]))], SetOptions::default())
        .unwrap();

    // Positional merge: index 0 replaced, the tail survives
    assert_eq!(model.get("tags"), Some(&list(["z", "b"])));
}

// ===== MULTI-KEY CALLS =====

#[test]
fn test_keys_merge_into_one_copy() {
    let mut model = model();
    model
        .set(
            [
                ("user.tags[]", Value::from("a")),
                ("user.tags[]", Value::from("b")),
            ],
            SetOptions::default(),
        )
        .unwrap();

    // Both appends resolved against the same running copy
    assert_eq!(model.get("user.tags"), Some(&list(["a", "b"])));
}
