//! Snapshot and JSON serialization tests
//!
//! Snapshots are plain nested data: they serialize as ordinary JSON and
//! round-trip back through the path codec and merger when fed in piecewise.

use crate::helpers::*;
use nidus::{Map, Path, SetOptions, Value};

#[test]
fn test_values_serialize_as_plain_json() {
    let mut model = model();
    model
        .set(
            [
                ("user.name", Value::from("Alice")),
                ("user.active", Value::from(true)),
                ("user.logins", Value::from(3)),
                ("user.tags[]", Value::from("admin")),
                ("user.nickname", Value::Null),
            ],
            SetOptions::default(),
        )
        .unwrap();

    assert_eq!(
        model.to_json_string().unwrap(),
        r#"{"user":{"active":true,"logins":3,"name":"Alice","nickname":null,"tags":["admin"]}}"#
    );
}

#[test]
fn test_map_round_trips_through_serde() {
    let snapshot = model_with(&[
        ("a.b[0]", Value::from(1)),
        ("a.b[1]", Value::from("two")),
        ("a.c", Value::from(false)),
    ])
    .to_snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: Map = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_snapshot_feeds_back_piecewise() {
    let source = model_with(&[
        ("config.depth", Value::from(3)),
        ("config.flags[0]", Value::from(true)),
        ("items[0].id", Value::from(1)),
        ("items[1].id", Value::from(2)),
    ]);
    let snapshot = source.to_snapshot();

    // Reassemble a fresh model one top-level pair at a time
    let mut rebuilt = model();
    for (key, value) in snapshot.iter() {
        rebuilt
            .set([(key.as_str(), value.clone())], SetOptions::default())
            .unwrap();
    }

    assert_eq!(rebuilt.to_snapshot(), snapshot);
}

#[test]
fn test_null_padding_serializes_as_json_null() {
    let mut model = model();
    model.set([("list[2]", Value::from("x"))], SetOptions::default()).unwrap();

    assert_eq!(
        model.to_json_string().unwrap(),
        r#"{"list":[null,null,"x"]}"#
    );
}

#[test]
fn test_paths_serialize_as_strings() {
    let path = Path::from("a.b[2].c");
    assert_eq!(serde_json::to_string(&path).unwrap(), "\"a.b[2].c\"");

    let back: Path = serde_json::from_str("\"a.b[2].c\"").unwrap();
    assert_eq!(back, path);
}

#[test]
fn test_events_serialize() {
    let mut model = model_with(&[("list", list(["x", "y"]))]);
    model.set([("list[]", Value::from("z"))], SetOptions::default()).unwrap();

    let json = serde_json::to_string(model.store().events()).unwrap();
    assert!(json.contains("\"list[2]\""));
}
