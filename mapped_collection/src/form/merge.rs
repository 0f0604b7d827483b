//! JSON overlay used when submitted input merges into element data.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging an object into a non-object target, target is initialised
///   to `{}` first.
/// - Objects are merged recursively (keys are added or overwritten, and nested
///   objects are overlaid).
/// - Arrays and scalars replace `target` wholesale.
///
/// # Examples
///
/// ```rust
/// use mapped_collection::form::merge_value;
/// use serde_json::json;
///
/// let mut element = json!({"type": "bar", "data": {"title": "A", "tags": ["x"]}});
/// merge_value(&mut element, json!({"data": {"title": "C", "tags": ["y"]}}));
/// assert_eq!(element, json!({"type": "bar", "data": {"title": "C", "tags": ["y"]}}));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}
