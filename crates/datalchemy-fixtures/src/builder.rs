//! Path-configured entity graph builder.

use std::marker::PhantomData;
use std::sync::Arc;

use datalchemy_core::{EntityType, Object, Overridable, Value, join_path, parent_path};
use tracing::{debug, trace};

use crate::errors::{GenerationError, Result};
use crate::faker_rs::Faker;
use crate::metadata::Registry;
use crate::population::{
    BuildConfig, Population, Session, bind_keys, build_root, reject_sequential_array,
};
use crate::selection::{Selection, SelectionPopulation};
use crate::sequence::SequenceCounters;

/// Builder mode producing a single root.
#[derive(Debug, Clone, Copy)]
pub struct One;

/// Builder mode producing a list of roots.
#[derive(Debug, Clone, Copy)]
pub struct Many;

const DEFAULT_ROOT_AMOUNT: i64 = 1;

/// Configures and produces instances of one entity type.
///
/// Configuration calls only record intent; generation happens in `make` and
/// `plain`. Configuration and root-level sequential counters persist across
/// repeated generation calls.
pub struct EntityBuilder<M = One> {
    registry: Arc<Registry>,
    faker: Faker,
    entity: EntityType,
    config: BuildConfig,
    counters: SequenceCounters,
    selection: Option<Selection>,
    mode: PhantomData<M>,
}

impl<M> EntityBuilder<M> {
    pub(crate) fn new(registry: Arc<Registry>, faker: Faker, entity: EntityType) -> Self {
        Self {
            registry,
            faker,
            entity,
            config: BuildConfig::default(),
            counters: SequenceCounters::new(),
            selection: None,
            mode: PhantomData,
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// Requests the relation at `path` (and every relation on the way to it)
    /// as a single instance, or one element for array relations.
    pub fn with(mut self, path: impl Into<String>) -> Self {
        self.config.include(path.into(), None);
        self
    }

    /// Requests `amount` elements for the array relation or field at `path`.
    pub fn with_amount(mut self, amount: i64, path: impl Into<String>) -> Result<Self> {
        if amount < 0 {
            return Err(GenerationError::NegativeAmount {
                call: ".with()",
                amount,
            });
        }
        self.config.include(path.into(), Some(amount));
        Ok(self)
    }

    /// Omits the field or relation at `path`, whatever else is configured.
    pub fn without(mut self, path: impl Into<String>) -> Self {
        self.config.exclude(path.into());
        self
    }

    /// Assigns `value` at `path` instead of generating it.
    ///
    /// Nested paths require their parent relation to have been requested.
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = parent_path(&path)
            && !self.config.has_relation(parent)
        {
            return Err(GenerationError::MissingRelation {
                parent: parent.to_string(),
                path,
            });
        }
        self.config.set_override(path, value.into());
        Ok(self)
    }

    /// Switches to partial mode: only properties selected by `selection` are
    /// populated. Requested relations are ignored in this mode; exclusions and
    /// overrides still apply.
    pub fn partial(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    fn spawn_root(&mut self, plain: bool) -> Result<Value> {
        let mut session = Session::new(
            self.registry.as_ref(),
            &mut self.faker,
            &mut self.counters,
        );
        match &self.selection {
            Some(selection) => {
                let population = SelectionPopulation::partial(Some(selection), &self.config);
                build_root(&population, &mut session, self.entity, plain)
            }
            None => {
                let population = PathPopulation {
                    config: &self.config,
                };
                build_root(&population, &mut session, self.entity, plain)
            }
        }
    }

    fn spawn_roots(&mut self, amount: i64, plain: bool) -> Result<Vec<Value>> {
        if amount < 0 {
            return Err(GenerationError::NegativeAmount {
                call: ".make()",
                amount,
            });
        }
        debug!(entity = %self.entity, amount, plain, "building fixtures");
        (0..amount).map(|_| self.spawn_root(plain)).collect()
    }
}

impl EntityBuilder<One> {
    /// Builds one instance.
    pub fn make(&mut self) -> Result<Value> {
        debug!(entity = %self.entity, plain = false, "building fixture");
        self.spawn_root(false)
    }

    /// Builds one instance whose root is a plain structure.
    pub fn plain(&mut self) -> Result<Value> {
        debug!(entity = %self.entity, plain = true, "building fixture");
        self.spawn_root(true)
    }

    /// Builds one instance wrapped for post-hoc overriding.
    pub fn create(&mut self) -> Result<Overridable> {
        self.make().map(Overridable::new)
    }
}

impl EntityBuilder<Many> {
    /// Builds `amount` instances (one when `None`).
    pub fn make(&mut self, amount: Option<i64>) -> Result<Vec<Value>> {
        self.spawn_roots(amount.unwrap_or(DEFAULT_ROOT_AMOUNT), false)
    }

    /// Builds `amount` instances with plain roots.
    pub fn plain(&mut self, amount: Option<i64>) -> Result<Vec<Value>> {
        self.spawn_roots(amount.unwrap_or(DEFAULT_ROOT_AMOUNT), true)
    }

    /// Builds `amount` instances wrapped as one list for post-hoc overriding;
    /// list patches apply index by index.
    pub fn create(&mut self, amount: Option<i64>) -> Result<Overridable> {
        self.make(amount).map(|roots| Overridable::new(Value::List(roots)))
    }
}

/// Population driven by requested paths, exclusions and overrides.
struct PathPopulation<'c> {
    config: &'c BuildConfig,
}

impl Population for PathPopulation<'_> {
    fn populate(
        &self,
        session: &mut Session<'_>,
        target: &mut Object,
        entity: EntityType,
        prefix: &str,
    ) -> Result<()> {
        let metadata = session.metadata;

        for field in metadata.fields(entity) {
            let full = join_path(prefix, &field.property);
            if self.config.is_excluded(&full) {
                continue;
            }
            if let Some(value) = self.config.override_for(&full) {
                target.insert(field.property.clone(), value.clone());
                continue;
            }

            let value = match self.config.amount(&full) {
                Some(amount) => Value::List(
                    (0..amount)
                        .map(|_| field.generate(session.faker))
                        .collect(),
                ),
                None if field.is_array => Value::List(vec![field.generate(session.faker)]),
                None => field.generate(session.faker),
            };
            target.insert(field.property.clone(), value);
        }

        for relation in metadata.relations(entity) {
            let full = join_path(prefix, &relation.property);
            if self.config.is_excluded(&full) {
                trace!(path = %full, "relation excluded");
                continue;
            }
            if let Some(value) = self.config.override_for(&full) {
                target.insert(relation.property.clone(), value.clone());
                continue;
            }

            let resolved = relation.target();
            if !resolved.ty.is_builtin() && !self.config.has_relation(&full) {
                trace!(path = %full, "relation not requested");
                continue;
            }
            reject_sequential_array(resolved.ty, resolved.many, &full)?;

            let binding = relation.key_binding.as_ref();
            if resolved.many {
                let count = self.config.amount(&full).unwrap_or(1);
                let mut children = Vec::new();
                for _ in 0..count {
                    let mut child = self.spawn(session, resolved.ty, &full)?;
                    bind_keys(target, &mut child, binding);
                    children.push(child);
                }
                target.insert(relation.property.clone(), Value::List(children));
            } else {
                let mut child = self.spawn(session, resolved.ty, &full)?;
                bind_keys(target, &mut child, binding);
                target.insert(relation.property.clone(), child);
            }
        }

        Ok(())
    }
}
