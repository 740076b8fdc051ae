//! Explicit registry of per-entity field and relation descriptors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use datalchemy_core::{EntityType, Value};

use crate::builtins::BuiltIn;
use crate::faker_rs::Faker;

/// Leaf generator for a field.
pub type ValueFn = Arc<dyn Fn(&mut Faker) -> Value + Send + Sync>;

/// Deferred relation target; evaluated at build time so entity types may
/// reference each other in any registration order.
pub type TargetFn = Arc<dyn Fn() -> Target + Send + Sync>;

/// What a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Entity(EntityType),
    BuiltIn(BuiltIn),
}

impl TypeRef {
    pub fn is_builtin(self) -> bool {
        matches!(self, TypeRef::BuiltIn(_))
    }
}

impl From<EntityType> for TypeRef {
    fn from(value: EntityType) -> Self {
        TypeRef::Entity(value)
    }
}

impl From<BuiltIn> for TypeRef {
    fn from(value: BuiltIn) -> Self {
        TypeRef::BuiltIn(value)
    }
}

/// Resolved relation target: a single type, or an array of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub ty: TypeRef,
    pub many: bool,
}

impl Target {
    pub fn one(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            many: false,
        }
    }

    pub fn many(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            many: true,
        }
    }
}

/// Copies `parent.key` into `child.inverse_key` after the child is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: String,
    pub inverse_key: String,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>, inverse_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            inverse_key: inverse_key.into(),
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub property: String,
    pub is_array: bool,
    generate: ValueFn,
}

impl FieldDescriptor {
    pub fn generate(&self, faker: &mut Faker) -> Value {
        (self.generate)(faker)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("property", &self.property)
            .field("is_array", &self.is_array)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct RelationDescriptor {
    pub property: String,
    pub key_binding: Option<KeyBinding>,
    resolve: TargetFn,
}

impl RelationDescriptor {
    pub fn target(&self) -> Target {
        (self.resolve)()
    }
}

impl fmt::Debug for RelationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationDescriptor")
            .field("property", &self.property)
            .field("key_binding", &self.key_binding)
            .finish_non_exhaustive()
    }
}

/// Read access to entity metadata.
pub trait MetadataSource {
    /// Field descriptors in declaration order; empty for unknown types.
    fn fields(&self, entity: EntityType) -> &[FieldDescriptor];
    /// Relation descriptors in declaration order; empty for unknown types.
    fn relations(&self, entity: EntityType) -> &[RelationDescriptor];
}

#[derive(Debug, Clone, Default)]
struct EntityMeta {
    fields: Vec<FieldDescriptor>,
    relations: Vec<RelationDescriptor>,
}

/// Metadata for every registered entity type.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<EntityType, EntityMeta>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `entity` for registration. Descriptors append to any already
    /// registered for the same type.
    pub fn entity(&mut self, entity: EntityType) -> EntityRegistration<'_> {
        EntityRegistration {
            meta: self.entities.entry(entity).or_default(),
        }
    }

    pub fn contains(&self, entity: EntityType) -> bool {
        self.entities.contains_key(&entity)
    }
}

impl MetadataSource for Registry {
    fn fields(&self, entity: EntityType) -> &[FieldDescriptor] {
        self.entities
            .get(&entity)
            .map(|meta| meta.fields.as_slice())
            .unwrap_or_default()
    }

    fn relations(&self, entity: EntityType) -> &[RelationDescriptor] {
        self.entities
            .get(&entity)
            .map(|meta| meta.relations.as_slice())
            .unwrap_or_default()
    }
}

/// Chained registration of descriptors for a single entity type.
pub struct EntityRegistration<'a> {
    meta: &'a mut EntityMeta,
}

impl EntityRegistration<'_> {
    pub fn field<F>(self, property: impl Into<String>, generate: F) -> Self
    where
        F: Fn(&mut Faker) -> Value + Send + Sync + 'static,
    {
        self.push_field(property.into(), Arc::new(generate), false)
    }

    /// Field holding a homogeneous list; one element unless a count is requested.
    pub fn array_field<F>(self, property: impl Into<String>, generate: F) -> Self
    where
        F: Fn(&mut Faker) -> Value + Send + Sync + 'static,
    {
        self.push_field(property.into(), Arc::new(generate), true)
    }

    pub fn relation<F>(self, property: impl Into<String>, resolve: F) -> Self
    where
        F: Fn() -> Target + Send + Sync + 'static,
    {
        self.push_relation(property.into(), Arc::new(resolve), None)
    }

    /// Relation whose children receive `child[binding.inverse_key] = parent[binding.key]`.
    pub fn bound_relation<F>(
        self,
        property: impl Into<String>,
        resolve: F,
        binding: KeyBinding,
    ) -> Self
    where
        F: Fn() -> Target + Send + Sync + 'static,
    {
        self.push_relation(property.into(), Arc::new(resolve), Some(binding))
    }

    fn push_field(self, property: String, generate: ValueFn, is_array: bool) -> Self {
        self.meta.fields.push(FieldDescriptor {
            property,
            is_array,
            generate,
        });
        self
    }

    fn push_relation(
        self,
        property: String,
        resolve: TargetFn,
        key_binding: Option<KeyBinding>,
    ) -> Self {
        self.meta.relations.push(RelationDescriptor {
            property,
            key_binding,
            resolve,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: EntityType = EntityType::new("User");
    const PHOTO: EntityType = EntityType::new("Photo");

    #[test]
    fn unknown_types_have_no_descriptors() {
        let registry = Registry::new();
        assert!(registry.fields(USER).is_empty());
        assert!(registry.relations(USER).is_empty());
        assert!(!registry.contains(USER));
    }

    #[test]
    fn registrations_append_in_declaration_order() {
        let mut registry = Registry::new();
        registry
            .entity(USER)
            .field("id", |f| Value::Int(f.int(1, 10)))
            .field("name", |f| Value::Text(f.full_name()));
        registry
            .entity(USER)
            .array_field("tags", |f| Value::Text(f.word()))
            .relation("photo", || Target::one(PHOTO));

        let fields: Vec<&str> = registry
            .fields(USER)
            .iter()
            .map(|field| field.property.as_str())
            .collect();
        assert_eq!(fields, ["id", "name", "tags"]);
        assert!(registry.fields(USER)[2].is_array);
        assert_eq!(registry.relations(USER).len(), 1);
    }

    #[test]
    fn relation_targets_resolve_lazily() {
        let mut registry = Registry::new();
        registry.entity(USER).bound_relation(
            "photos",
            || Target::many(PHOTO),
            KeyBinding::new("id", "userId"),
        );
        // PHOTO is registered after USER references it
        registry.entity(PHOTO).relation("owner", || Target::one(USER));

        let relation = &registry.relations(USER)[0];
        assert_eq!(relation.target(), Target::many(PHOTO));
        assert_eq!(
            relation.key_binding,
            Some(KeyBinding::new("id", "userId"))
        );
        assert!(!relation.target().ty.is_builtin());
        assert!(Target::one(BuiltIn::Uuid).ty.is_builtin());
    }
}
