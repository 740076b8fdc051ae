use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Registration token identifying an entity type.
///
/// Two tokens with the same name denote the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityType(&'static str);

impl EntityType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Generated value in a fixture graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    /// Atomic timestamp; never merged into.
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Object(Object),
}

/// Property map of an entity instance or a plain structure.
///
/// An instance carries the entity type it was built as; a plain structure
/// carries none. A property that is not present is unset, which is distinct
/// from a property holding [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entity: Option<EntityType>,
    props: BTreeMap<String, Value>,
}

impl Object {
    /// Empty plain structure.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Empty instance of `entity`.
    pub fn instance(entity: EntityType) -> Self {
        Self {
            entity: Some(entity),
            props: BTreeMap::new(),
        }
    }

    pub fn entity(&self) -> Option<EntityType> {
        self.entity
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.props.get(property)
    }

    pub fn get_mut(&mut self, property: &str) -> Option<&mut Value> {
        self.props.get_mut(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.props.contains_key(property)
    }

    pub fn insert(&mut self, property: impl Into<String>, value: Value) -> Option<Value> {
        self.props.insert(property.into(), value)
    }

    pub fn remove(&mut self, property: &str) -> Option<Value> {
        self.props.remove(property)
    }

    /// Returns the slot for `property`, inserting `Null` when unset.
    pub fn entry(&mut self, property: &str) -> &mut Value {
        self.props.entry(property.to_string()).or_insert(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.props.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.props.keys()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entity: None,
            props: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Value {
    /// Builds a plain object value from `(property, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// Objects and lists; everything else is atomic.
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::Object(_) | Value::List(_))
    }

    /// Mirrors JavaScript truthiness: null, false, zero and empty text are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0 && !value.is_nan(),
            Value::Text(value) => !value.is_empty(),
            _ => true,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Property lookup on an object value.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(property))
    }

    /// True when this value is an instance tagged with `entity`.
    pub fn is_instance_of(&self, entity: EntityType) -> bool {
        self.as_object()
            .and_then(Object::entity)
            .is_some_and(|tag| tag == entity)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Converts the graph into a typed value through its serde representation.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let json = self.to_json()?;
        serde_json::from_value(json).map_err(Error::from)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::Text(value) => serializer.serialize_str(value),
            Value::Uuid(value) => serializer.collect_str(value),
            Value::Date(value) => serializer.serialize_str(&value.to_rfc3339()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Value::Int(value),
                None => Value::Float(number.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(value) => Value::Text(value),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn instances_keep_their_tag_and_plain_objects_do_not() {
        let user = EntityType::new("User");
        let instance = Value::Object(Object::instance(user));
        let plain = Value::Object(Object::plain());

        assert!(instance.is_instance_of(user));
        assert!(!plain.is_instance_of(user));
        assert!(!instance.is_instance_of(EntityType::new("Photo")));
    }

    #[test]
    fn serializes_dates_and_uuids_as_strings() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let id = Uuid::nil();
        let value = Value::object([
            ("created", Value::Date(created)),
            ("id", Value::Uuid(id)),
            ("tags", Value::from(vec!["a", "b"])),
        ]);

        let json = value.to_json().unwrap();
        assert_eq!(
            json,
            json!({
                "created": "2025-01-01T00:00:00+00:00",
                "id": "00000000-0000-0000-0000-000000000000",
                "tags": ["a", "b"],
            })
        );
    }

    #[test]
    fn converts_into_typed_structs() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Photo {
            id: i64,
            url: String,
        }

        let value = Value::object([
            ("id", Value::Int(7)),
            ("url", Value::from("https://example.com/7.png")),
        ]);
        let photo: Photo = value.deserialize_into().unwrap();
        assert_eq!(
            photo,
            Photo {
                id: 7,
                url: "https://example.com/7.png".to_string()
            }
        );
    }

    #[test]
    fn converts_from_json() {
        let value = Value::from(json!({"a": {"b": 2}, "c": [1, 2.5, null]}));
        assert_eq!(value.get("a").and_then(|a| a.get("b")), Some(&Value::Int(2)));
        let list = value.get("c").and_then(Value::as_list).unwrap();
        assert_eq!(list, &[Value::Int(1), Value::Float(2.5), Value::Null]);
    }

    #[test]
    fn truthiness_follows_falsy_scalars() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::List(Vec::new()).is_truthy());
        assert!(Value::Object(Object::plain()).is_truthy());
    }
}
