//! Core contracts and helpers for Datalchemy fixtures.
//!
//! This crate defines the dynamic value model that generated object graphs
//! are made of, dotted-path resolution over those graphs, and the deep-merge
//! engine used to override generated values after construction.

pub mod error;
pub mod merge;
pub mod path;
pub mod value;

pub use error::{Error, Result};
pub use merge::{Overridable, deep_merge, override_in_place};
pub use path::{assign_path, join_path, parent_path, resolve_object_path, resolve_path};
pub use value::{EntityType, Object, Value};
