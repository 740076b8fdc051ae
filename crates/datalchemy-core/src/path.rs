//! Dotted property paths over generated values.

use crate::value::{Object, Value};

/// Joins a property onto a path prefix (`""` is the root).
pub fn join_path(prefix: &str, property: &str) -> String {
    if prefix.is_empty() {
        property.to_string()
    } else {
        format!("{prefix}.{property}")
    }
}

/// Parent of a dotted path, or `None` for a root-level path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(parent, _)| parent)
}

/// Resolves `path` against `root`.
///
/// Lists are traversed transparently: a segment applied to a list is applied
/// to every element and the defined results are collected. When no element
/// yields a value the whole resolution is `None`.
pub fn resolve_path(root: &Value, path: &str) -> Option<Value> {
    if path.is_empty() || !root.is_truthy() {
        return None;
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = step(root, first)?;
    for segment in segments {
        current = step(&current, segment)?;
    }
    Some(current)
}

/// [`resolve_path`] starting from an object that is still being built.
pub fn resolve_object_path(root: &Object, path: &str) -> Option<Value> {
    if path.is_empty() {
        return None;
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get(first)?.clone();
    for segment in segments {
        current = step(&current, segment)?;
    }
    Some(current)
}

fn step(current: &Value, segment: &str) -> Option<Value> {
    match current {
        Value::List(items) => {
            let collected: Vec<Value> = items
                .iter()
                .filter(|item| item.is_truthy())
                .filter_map(|item| item.get(segment).cloned())
                .collect();
            if collected.is_empty() {
                None
            } else {
                Some(Value::List(collected))
            }
        }
        other => other.get(segment).cloned(),
    }
}

/// Writes `value` at `path` inside `target`.
///
/// Missing intermediate properties become plain objects. Returns `false`
/// without writing when `target`, or an existing intermediate, is not an
/// object.
pub fn assign_path(target: &mut Value, path: &str, value: Value) -> bool {
    let Some(object) = target.as_object_mut() else {
        return false;
    };
    assign_in_object(object, path, value)
}

fn assign_in_object(object: &mut Object, path: &str, value: Value) -> bool {
    match path.split_once('.') {
        None => {
            object.insert(path, value);
            true
        }
        Some((head, rest)) => {
            if !object.contains(head) {
                object.insert(head, Value::Object(Object::plain()));
            }
            match object.get_mut(head).and_then(Value::as_object_mut) {
                Some(child) => assign_in_object(child, rest, value),
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn resolves_nested_properties() {
        let root = value(json!({"user": {"profile": {"id": 3}}}));
        assert_eq!(resolve_path(&root, "user.profile.id"), Some(Value::Int(3)));
        assert_eq!(resolve_path(&root, "user.missing.id"), None);
    }

    #[test]
    fn maps_segments_over_lists() {
        let root = value(json!({
            "photos": [{"id": 1}, {"id": 2}, {"url": "x"}, null]
        }));
        assert_eq!(
            resolve_path(&root, "photos.id"),
            Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
        assert_eq!(resolve_path(&root, "photos.nothing"), None);
    }

    #[test]
    fn reads_through_nested_lists() {
        let root = value(json!({
            "albums": [
                {"photos": [{"id": 1}, {"id": 2}]},
                {"photos": [{"id": 3}]}
            ]
        }));
        let resolved = resolve_path(&root, "albums.photos").unwrap();
        assert_eq!(resolved.as_list().map(<[Value]>::len), Some(2));
        // list elements that are themselves lists have no properties
        assert_eq!(resolve_path(&root, "albums.photos.id"), None);
    }

    #[test]
    fn empty_inputs_resolve_to_none() {
        let root = value(json!({"id": 1}));
        assert_eq!(resolve_path(&root, ""), None);
        assert_eq!(resolve_path(&Value::Null, "id"), None);
        assert_eq!(resolve_path(&value(json!({"id": 1})), "id.deeper"), None);
    }

    #[test]
    fn resolves_from_objects_under_construction() {
        let root = value(json!({"id": 4, "photos": [{"id": 1}]}));
        let object = root.as_object().unwrap();
        assert_eq!(resolve_object_path(object, "id"), Some(Value::Int(4)));
        assert_eq!(
            resolve_object_path(object, "photos.id"),
            Some(Value::List(vec![Value::Int(1)]))
        );
        assert_eq!(resolve_object_path(object, ""), None);
    }

    #[test]
    fn assigns_nested_paths() {
        let mut target = value(json!({"meta": {}}));
        assert!(assign_path(&mut target, "meta.owner.id", Value::Int(9)));
        assert_eq!(resolve_path(&target, "meta.owner.id"), Some(Value::Int(9)));

        let mut scalar = Value::Int(1);
        assert!(!assign_path(&mut scalar, "id", Value::Int(2)));
    }

    #[test]
    fn joins_and_splits_paths() {
        assert_eq!(join_path("", "id"), "id");
        assert_eq!(join_path("photo.upload", "id"), "photo.upload.id");
        assert_eq!(parent_path("photo.upload.id"), Some("photo.upload"));
        assert_eq!(parent_path("id"), None);
    }
}
