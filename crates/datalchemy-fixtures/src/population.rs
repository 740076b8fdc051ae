//! Entity population shared by the path-configured builder and the
//! selection-driven factory methods.

use std::collections::{BTreeMap, BTreeSet};

use datalchemy_core::{EntityType, Object, Value, assign_path, resolve_object_path};
use tracing::trace;

use crate::builtins::BuiltIn;
use crate::errors::{GenerationError, Result};
use crate::faker_rs::Faker;
use crate::metadata::{KeyBinding, MetadataSource, TypeRef};
use crate::sequence::{BuildContext, SequenceCounters};

/// Path-keyed build configuration.
///
/// Every rule is keyed by the full dotted path from the root, so the same
/// configuration applies unchanged at every recursion depth.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    relations: BTreeMap<String, Option<i64>>,
    exclusions: BTreeSet<String>,
    overrides: BTreeMap<String, Value>,
}

impl BuildConfig {
    pub fn include(&mut self, path: String, amount: Option<i64>) {
        self.relations.insert(path, amount);
    }

    pub fn exclude(&mut self, path: String) {
        self.exclusions.insert(path);
    }

    pub fn set_override(&mut self, path: String, value: Value) {
        self.overrides.insert(path, value);
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.contains(path)
    }

    pub fn override_for(&self, path: &str) -> Option<&Value> {
        self.overrides.get(path)
    }

    /// Requested cardinality for `path`, if one was given.
    pub fn amount(&self, path: &str) -> Option<i64> {
        self.relations.get(path).copied().flatten()
    }

    /// True when `path` or any path below it was requested.
    pub fn has_relation(&self, path: &str) -> bool {
        self.relations.keys().any(|key| {
            key == path
                || key
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

/// Mutable state threaded through the construction of one root.
pub struct Session<'a> {
    pub metadata: &'a dyn MetadataSource,
    pub faker: &'a mut Faker,
    counters: &'a mut SequenceCounters,
    ctx: BuildContext,
}

impl<'a> Session<'a> {
    pub fn new(
        metadata: &'a dyn MetadataSource,
        faker: &'a mut Faker,
        counters: &'a mut SequenceCounters,
    ) -> Self {
        Self {
            metadata,
            faker,
            counters,
            ctx: BuildContext::new(),
        }
    }

    /// Value for a built-in target at `path`.
    pub fn builtin(&mut self, builtin: BuiltIn, path: &str) -> Value {
        match builtin {
            BuiltIn::AutoIncrement => Value::Int(self.counters.next(path, &mut self.ctx)),
            other => other.generate(self.faker),
        }
    }
}

/// One way of filling an entity's properties.
pub trait Population {
    /// Populates `target`, an instance of `entity` located at `prefix`.
    fn populate(
        &self,
        session: &mut Session<'_>,
        target: &mut Object,
        entity: EntityType,
        prefix: &str,
    ) -> Result<()>;

    /// Materializes a relation child of type `ty` at `path`.
    fn spawn(&self, session: &mut Session<'_>, ty: TypeRef, path: &str) -> Result<Value> {
        match ty {
            TypeRef::BuiltIn(builtin) => Ok(session.builtin(builtin, path)),
            TypeRef::Entity(entity) => {
                let mut child = Object::instance(entity);
                self.populate(session, &mut child, entity, path)?;
                Ok(Value::Object(child))
            }
        }
    }
}

/// Builds and populates a root; plain roots carry no entity tag.
pub fn build_root<P: Population + ?Sized>(
    population: &P,
    session: &mut Session<'_>,
    entity: EntityType,
    plain: bool,
) -> Result<Value> {
    let mut root = if plain {
        Object::plain()
    } else {
        Object::instance(entity)
    };
    population.populate(session, &mut root, entity, "")?;
    Ok(Value::Object(root))
}

/// Fails for array relations of sequential ids, which have no meaningful values.
pub fn reject_sequential_array(ty: TypeRef, many: bool, path: &str) -> Result<()> {
    if many && ty == TypeRef::BuiltIn(BuiltIn::AutoIncrement) {
        return Err(GenerationError::SequentialArray {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Applies `binding` to `child` using values read from `parent`.
///
/// Unresolvable keys and non-object children are left untouched.
pub fn bind_keys(parent: &Object, child: &mut Value, binding: Option<&KeyBinding>) {
    let Some(binding) = binding else {
        return;
    };
    let Some(value) = resolve_object_path(parent, &binding.key) else {
        trace!(key = %binding.key, "binding key unresolved; skipping");
        return;
    };
    assign_path(child, &binding.inverse_key, value);
}
