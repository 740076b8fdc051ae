//! Entry points for building fixtures.

use std::sync::Arc;

use datalchemy_core::{EntityType, Overridable, Value};
use tracing::debug;

use crate::builder::{EntityBuilder, Many, One};
use crate::errors::{GenerationError, Result};
use crate::faker_rs::Faker;
use crate::metadata::Registry;
use crate::model::FactoryOptions;
use crate::population::{BuildConfig, Session, build_root};
use crate::selection::{Selection, SelectionPopulation};
use crate::sequence::SequenceCounters;

/// Produces fixtures for the entity types of a registry.
///
/// `one` and `many` hand out path-configured builders. The remaining methods
/// populate directly from a selection mask.
pub struct Factory {
    registry: Arc<Registry>,
    faker: Faker,
    counters: SequenceCounters,
}

impl Factory {
    pub fn new(registry: Registry, faker: Faker) -> Self {
        Self::from_shared(Arc::new(registry), faker)
    }

    pub fn from_shared(registry: Arc<Registry>, faker: Faker) -> Self {
        Self {
            registry,
            faker,
            counters: SequenceCounters::new(),
        }
    }

    pub fn with_options(registry: Registry, options: &FactoryOptions) -> Result<Self> {
        Ok(Self::new(registry, options.faker()?))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn faker_mut(&mut self) -> &mut Faker {
        &mut self.faker
    }

    /// Builder for a single instance of `entity`.
    pub fn one(&mut self, entity: EntityType) -> EntityBuilder<One> {
        EntityBuilder::new(Arc::clone(&self.registry), self.faker.fork(), entity)
    }

    /// Builder for lists of `entity`.
    pub fn many(&mut self, entity: EntityType) -> EntityBuilder<Many> {
        EntityBuilder::new(Arc::clone(&self.registry), self.faker.fork(), entity)
    }

    /// Instance with every field generated, except those deselected, and the
    /// relations selected in `selection`.
    pub fn new_entity(
        &mut self,
        entity: EntityType,
        selection: Option<&Selection>,
    ) -> Result<Value> {
        let rules = BuildConfig::default();
        let population = SelectionPopulation::full(selection, &rules);
        let mut session =
            Session::new(self.registry.as_ref(), &mut self.faker, &mut self.counters);
        build_root(&population, &mut session, entity, false)
    }

    pub fn new_list(
        &mut self,
        entity: EntityType,
        amount: i64,
        selection: Option<&Selection>,
    ) -> Result<Vec<Value>> {
        if amount < 0 {
            return Err(GenerationError::NegativeAmount {
                call: ".new_list()",
                amount,
            });
        }
        debug!(entity = %entity, amount, "building fixture list");
        (0..amount)
            .map(|_| self.new_entity(entity, selection))
            .collect()
    }

    /// Instance with only the fields and relations selected in `selection`.
    pub fn partial(&mut self, entity: EntityType, selection: &Selection) -> Result<Value> {
        let rules = BuildConfig::default();
        let population = SelectionPopulation::partial(Some(selection), &rules);
        let mut session =
            Session::new(self.registry.as_ref(), &mut self.faker, &mut self.counters);
        build_root(&population, &mut session, entity, false)
    }

    /// [`Factory::new_entity`] wrapped for post-hoc overriding.
    pub fn create(
        &mut self,
        entity: EntityType,
        selection: Option<&Selection>,
    ) -> Result<Overridable> {
        self.new_entity(entity, selection).map(Overridable::new)
    }

    /// [`Factory::new_list`] wrapped as one list for post-hoc overriding.
    pub fn create_list(
        &mut self,
        entity: EntityType,
        amount: i64,
        selection: Option<&Selection>,
    ) -> Result<Overridable> {
        self.new_list(entity, amount, selection)
            .map(|items| Overridable::new(Value::List(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Target;

    const USER: EntityType = EntityType::new("User");
    const PHOTO: EntityType = EntityType::new("Photo");

    fn factory() -> Factory {
        let mut registry = Registry::new();
        registry
            .entity(USER)
            .field("id", |f| Value::Int(f.int(1, 1000)))
            .relation("photo", || Target::one(PHOTO));
        registry.entity(PHOTO).field("url", |f| Value::Text(f.url()));
        Factory::new(registry, Faker::seeded(8))
    }

    #[test]
    fn builders_are_independent_of_each_other() {
        let mut factory = factory();
        let mut first = factory.one(USER);
        let mut second = factory.one(USER).with("photo");

        let a = first.make().unwrap();
        let b = second.make().unwrap();
        assert!(a.get("photo").is_none());
        assert!(b.get("photo").is_some());
    }

    #[test]
    fn same_seed_produces_same_fixtures() {
        let a = factory().one(USER).with("photo").make().unwrap();
        let b = factory().one(USER).with("photo").make().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn new_list_rejects_negative_amounts() {
        let err = factory().new_list(USER, -2, None).unwrap_err();
        assert!(err.to_string().contains("-2"));
        assert!(factory().new_list(USER, 0, None).unwrap().is_empty());
    }
}
