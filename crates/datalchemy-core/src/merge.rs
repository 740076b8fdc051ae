//! Post-construction deep overriding of generated values.

use crate::value::{Object, Value};

/// Wraps a generated value so it can be overridden after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Overridable {
    instance: Value,
}

impl Overridable {
    pub fn new(instance: Value) -> Self {
        Self { instance }
    }

    /// Deep-merges the patch produced by `patch` into the wrapped instance and
    /// returns that same instance.
    pub fn override_with<F>(mut self, patch: F) -> Value
    where
        F: FnOnce(&Value) -> Value,
    {
        override_in_place(&mut self.instance, patch);
        self.instance
    }

    pub fn instance(&self) -> &Value {
        &self.instance
    }

    pub fn into_inner(self) -> Value {
        self.instance
    }
}

/// Borrowing variant of [`Overridable::override_with`].
pub fn override_in_place<F>(instance: &mut Value, patch: F)
where
    F: FnOnce(&Value) -> Value,
{
    let patch = patch(instance);
    deep_merge(instance, &patch);
}

/// Merges `patch` into `target`.
///
/// Dates replace wholesale, lists merge index by index, objects merge
/// recursively and everything else (including `Null`) replaces. A falsy patch
/// is a no-op.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    if !patch.is_truthy() {
        return;
    }
    match (target, patch) {
        (Value::Object(object), Value::Object(patch)) => merge_object(object, patch),
        (Value::List(items), Value::List(patch)) => merge_list(items, patch),
        _ => {}
    }
}

fn merge_object(object: &mut Object, patch: &Object) {
    for (key, value) in patch.iter() {
        let slot = object.entry(key);
        merge_slot(slot, value);
    }
}

fn merge_slot(slot: &mut Value, value: &Value) {
    match value {
        Value::List(patch) => match *slot {
            Value::List(ref mut items) => merge_list(items, patch),
            _ => *slot = value.clone(),
        },
        Value::Object(patch) => match *slot {
            Value::Object(ref mut object) => merge_object(object, patch),
            _ => *slot = value.clone(),
        },
        _ => *slot = value.clone(),
    }
}

fn merge_list(items: &mut Vec<Value>, patch: &[Value]) {
    if items.len() < patch.len() {
        items.resize(patch.len(), Value::Null);
    }
    for (index, value) in patch.iter().enumerate() {
        let slot = &mut items[index];
        match value {
            Value::Date(_) => *slot = value.clone(),
            Value::Object(_) | Value::List(_) if slot.is_structured() => merge_slot(slot, value),
            _ => *slot = value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn overrides_simple_properties() {
        let result = Overridable::new(value(json!({"foo": "bar", "num": 1})))
            .override_with(|_| value(json!({"foo": "baz", "num": 2})));

        assert_eq!(result, value(json!({"foo": "baz", "num": 2})));
    }

    #[test]
    fn keeps_unspecified_siblings() {
        let result = Overridable::new(value(json!({"a": {"b": 1, "c": 3}})))
            .override_with(|_| value(json!({"a": {"b": 2}})));

        assert_eq!(result, value(json!({"a": {"b": 2, "c": 3}})));
    }

    #[test]
    fn merges_array_elements_index_wise() {
        let result = Overridable::new(value(json!({
            "items": [{"id": 1, "name": "Item 1"}, {"id": 2, "name": "Item 2"}]
        })))
        .override_with(|_| value(json!({"items": [{"name": "Updated Item 1"}]})));

        assert_eq!(
            result,
            value(json!({
                "items": [{"id": 1, "name": "Updated Item 1"}, {"id": 2, "name": "Item 2"}]
            }))
        );
    }

    #[test]
    fn primitive_arrays_keep_trailing_values() {
        let result = Overridable::new(value(json!({"numbers": [1, 2, 3]})))
            .override_with(|_| value(json!({"numbers": [4, 5]})));

        assert_eq!(result, value(json!({"numbers": [4, 5, 3]})));
    }

    #[test]
    fn null_replaces_values() {
        let result = Overridable::new(value(json!({"foo": "bar", "nested": {"value": "t"}})))
            .override_with(|_| value(json!({"foo": null, "nested": null})));

        assert_eq!(result, value(json!({"foo": null, "nested": null})));
    }

    #[test]
    fn dates_replace_atomically() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let result = Overridable::new(value(json!({"foo": null, "when": {"x": 1}})))
            .override_with(|_| {
                Value::object([("foo", Value::Date(date)), ("when", Value::Date(date))])
            });

        assert_eq!(result.get("foo"), Some(&Value::Date(date)));
        assert_eq!(result.get("when"), Some(&Value::Date(date)));
    }

    #[test]
    fn writes_past_the_end_of_arrays() {
        let result = Overridable::new(value(json!({"tags": ["a"]})))
            .override_with(|_| value(json!({"tags": [null, null, "c"]})));

        assert_eq!(result, value(json!({"tags": [null, null, "c"]})));

        let result = Overridable::new(value(json!({"items": []})))
            .override_with(|_| value(json!({"items": [{"id": 5}]})));
        assert_eq!(result, value(json!({"items": [{"id": 5}]})));
    }

    #[test]
    fn missing_patch_is_a_no_op() {
        let original = value(json!({"id": 1}));
        let result = Overridable::new(original.clone()).override_with(|_| Value::Null);
        assert_eq!(result, original);
    }

    #[test]
    fn patch_sees_the_current_instance() {
        let result = Overridable::new(value(json!({"id": 41})))
            .override_with(|current| {
                let next = current.get("id").and_then(Value::as_i64).unwrap_or_default() + 1;
                Value::object([("id", Value::Int(next))])
            });
        assert_eq!(result.get("id"), Some(&Value::Int(42)));
    }

    #[test]
    fn preserves_instance_tags() {
        let user = crate::EntityType::new("User");
        let mut object = Object::instance(user);
        object.insert("name", Value::from("before"));
        let result = Overridable::new(Value::Object(object))
            .override_with(|_| value(json!({"name": "after"})));

        assert!(result.is_instance_of(user));
        assert_eq!(result.get("name"), Some(&Value::from("after")));
    }
}
