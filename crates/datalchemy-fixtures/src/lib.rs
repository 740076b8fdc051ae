//! Declarative fixture generation for Datalchemy.
//!
//! Entity types are described in a [`Registry`] of field and relation
//! descriptors. A [`Factory`] turns those descriptions into populated object
//! graphs: builders obtained from [`Factory::one`] and [`Factory::many`] are
//! configured by dotted paths (`with`, `without`, `set`), while the
//! selection-driven methods populate from a [`Selection`] mask.

pub mod builder;
pub mod builtins;
pub mod errors;
pub mod factory;
pub mod faker_rs;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod population;
pub mod selection;
pub mod sequence;

pub use builder::{EntityBuilder, Many, One};
pub use builtins::BuiltIn;
pub use datalchemy_core::{EntityType, Object, Overridable, Value};
pub use errors::{GenerationError, Result};
pub use factory::Factory;
pub use faker_rs::{Faker, LocaleKey};
pub use logging::init_tracing;
pub use metadata::{
    FieldDescriptor, KeyBinding, MetadataSource, Registry, RelationDescriptor, Target, TypeRef,
};
pub use model::FactoryOptions;
pub use selection::{Select, Selection};
