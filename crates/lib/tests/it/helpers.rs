use nidus::{InMemoryStore, NestedModel, SetOptions, Value};

/// Create an empty in-memory model
pub fn model() -> NestedModel<InMemoryStore> {
    NestedModel::in_memory()
}

/// Create a model seeded with the given path assignments, with the
/// notification log cleared afterwards
pub fn model_with(entries: &[(&str, Value)]) -> NestedModel<InMemoryStore> {
    let mut model = model();
    for (path, value) in entries {
        model
            .set([(*path, value.clone())], SetOptions::default())
            .expect("seed set failed");
    }
    model.store_mut().clear_events();
    model
}

/// The wire names of all notifications delivered so far, in order
pub fn event_names(model: &NestedModel<InMemoryStore>) -> Vec<String> {
    model.store().events().iter().map(|e| e.name()).collect()
}

/// Build a list value from anything convertible
pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
    Value::List(items.into_iter().map(Into::into).collect())
}
