use chrono::{TimeZone, Utc};
use datalchemy_core::{EntityType, Object, Overridable, Value, resolve_path};
use serde_json::json;
use uuid::Uuid;

const USER: EntityType = EntityType::new("User");

fn user() -> Value {
    let mut object = Object::instance(USER);
    object.insert("id", Value::Int(7));
    object.insert("name", Value::from("Ana"));
    object.insert("token", Value::Uuid(Uuid::nil()));
    object.insert(
        "joinedAt",
        Value::Date(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
    );
    object.insert(
        "photos",
        Value::from(json!([{"id": 1, "userId": 7}, {"id": 2, "userId": 7}])),
    );
    Value::Object(object)
}

#[test]
fn serializes_values_deterministically() {
    let json = serde_json::to_string_pretty(&user()).expect("serialize value");
    let expected = r#"{
  "id": 7,
  "joinedAt": "2024-05-01T12:00:00+00:00",
  "name": "Ana",
  "photos": [
    {
      "id": 1,
      "userId": 7
    },
    {
      "id": 2,
      "userId": 7
    }
  ],
  "token": "00000000-0000-0000-0000-000000000000"
}"#;
    assert_eq!(json, expected);
}

#[test]
fn resolves_bound_keys_through_lists() {
    let user = user();
    assert_eq!(
        resolve_path(&user, "photos.userId"),
        Some(Value::List(vec![Value::Int(7), Value::Int(7)]))
    );
    assert_eq!(resolve_path(&user, "photos.missing"), None);
}

#[test]
fn overrides_keep_identity_dates_and_untouched_elements() {
    let replacement = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let result = Overridable::new(user()).override_with(|current| {
        assert_eq!(current.get("id"), Some(&Value::Int(7)));
        let mut patch = Object::plain();
        patch.insert("joinedAt", Value::Date(replacement));
        patch.insert("photos", Value::from(json!([{"url": "x"}])));
        Value::Object(patch)
    });

    assert!(result.is_instance_of(USER));
    assert_eq!(result.get("joinedAt"), Some(&Value::Date(replacement)));
    let photos = result.get("photos").and_then(Value::as_list).expect("photos");
    assert_eq!(photos[0], Value::from(json!({"id": 1, "userId": 7, "url": "x"})));
    assert_eq!(photos[1], Value::from(json!({"id": 2, "userId": 7})));
}
