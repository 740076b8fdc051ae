//! Selection-mask driven population.
//!
//! An alternative to path configuration: a mask mirroring the entity shape
//! says which properties to generate. In full mode every field is generated
//! unless deselected; in partial mode only fields selected with `true` are.
//! Entity relations are only built when selected in either mode, while
//! relations to built-in scalars follow the field rule.

use std::collections::BTreeMap;

use datalchemy_core::{EntityType, Object, Value, join_path};

use crate::errors::{GenerationError, Result};
use crate::metadata::MetadataSource;
use crate::population::{BuildConfig, Population, Session, bind_keys, reject_sequential_array};

/// Mask entry for one property.
#[derive(Debug, Clone, PartialEq)]
pub enum Select {
    Include(bool),
    Nested(Selection),
    /// Element count for array properties, with an optional mask per element.
    Many(i64, Option<Selection>),
}

impl Select {
    fn is_selected(&self) -> bool {
        !matches!(self, Select::Include(false))
    }
}

/// Property mask for an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    entries: BTreeMap<String, Select>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, property: impl Into<String>, include: bool) -> Self {
        self.entries.insert(property.into(), Select::Include(include));
        self
    }

    pub fn nested(mut self, property: impl Into<String>, selection: Selection) -> Self {
        self.entries.insert(property.into(), Select::Nested(selection));
        self
    }

    pub fn many(
        mut self,
        property: impl Into<String>,
        count: i64,
        selection: Option<Selection>,
    ) -> Self {
        self.entries.insert(property.into(), Select::Many(count, selection));
        self
    }

    pub fn get(&self, property: &str) -> Option<&Select> {
        self.entries.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a JSON mask: `true`/`false`, a nested object, or `[count, mask?]`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        parse_selection(value, "")
    }
}

fn parse_selection(value: &serde_json::Value, path: &str) -> Result<Selection> {
    let serde_json::Value::Object(map) = value else {
        return Err(invalid(path, "expected an object"));
    };
    let mut selection = Selection::new();
    for (property, entry) in map {
        let full = join_path(path, property);
        let select = match entry {
            serde_json::Value::Bool(include) => Select::Include(*include),
            serde_json::Value::Object(_) => Select::Nested(parse_selection(entry, &full)?),
            serde_json::Value::Array(items) => parse_tuple(items, &full)?,
            _ => return Err(invalid(&full, "expected a boolean, object or [count, mask]")),
        };
        selection.entries.insert(property.clone(), select);
    }
    Ok(selection)
}

fn parse_tuple(items: &[serde_json::Value], path: &str) -> Result<Select> {
    let count = items
        .first()
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| invalid(path, "tuple must start with an integer count"))?;
    if count < 0 {
        return Err(invalid(path, &format!("count must be zero or positive, got {count}")));
    }
    let nested = match items.get(1) {
        None | Some(serde_json::Value::Null) => None,
        Some(mask) => Some(parse_selection(mask, path)?),
    };
    if items.len() > 2 {
        return Err(invalid(path, "tuple has more than two elements"));
    }
    Ok(Select::Many(count, nested))
}

fn invalid(path: &str, message: &str) -> GenerationError {
    GenerationError::InvalidSelection {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// Walks an entity using a selection mask.
pub struct SelectionPopulation<'s> {
    selection: Option<&'s Selection>,
    partial: bool,
    rules: &'s BuildConfig,
}

impl<'s> SelectionPopulation<'s> {
    pub fn full(selection: Option<&'s Selection>, rules: &'s BuildConfig) -> Self {
        Self {
            selection,
            partial: false,
            rules,
        }
    }

    pub fn partial(selection: Option<&'s Selection>, rules: &'s BuildConfig) -> Self {
        Self {
            selection,
            partial: true,
            rules,
        }
    }

    fn entry(&self, property: &str) -> Option<&'s Select> {
        self.selection.and_then(|selection| selection.get(property))
    }

    fn includes_field(&self, entry: Option<&Select>) -> bool {
        if self.partial {
            matches!(entry, Some(Select::Include(true) | Select::Many(..)))
        } else {
            !matches!(entry, Some(Select::Include(false)))
        }
    }

    /// Walker for children of a selected relation, plus how many to build.
    ///
    /// `true` and a bare count always generate children in full; nested
    /// masks keep the current mode.
    fn child(&self, entry: &'s Select) -> (i64, SelectionPopulation<'s>) {
        match entry {
            Select::Include(_) => (1, Self::full(None, self.rules)),
            Select::Nested(selection) => (1, self.same_mode(Some(selection))),
            Select::Many(count, None) => (*count, Self::full(None, self.rules)),
            Select::Many(count, Some(selection)) if self.partial => {
                (*count, Self::partial(Some(selection), self.rules))
            }
            Select::Many(count, Some(selection)) => {
                (*count, Self::full(Some(selection), self.rules))
            }
        }
    }

    fn same_mode(&self, selection: Option<&'s Selection>) -> Self {
        Self {
            selection,
            partial: self.partial,
            rules: self.rules,
        }
    }
}

impl Population for SelectionPopulation<'_> {
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
            if self.rules.is_excluded(&full) {
                continue;
            }
            if let Some(value) = self.rules.override_for(&full) {
                target.insert(field.property.clone(), value.clone());
                continue;
            }

            let entry = self.entry(&field.property);
            if !self.includes_field(entry) {
                continue;
            }
            let value = match entry {
                Some(Select::Many(count, _)) if *count < 0 => {
                    return Err(negative_selection(*count));
                }
                Some(Select::Many(count, _)) => Value::List(
                    (0..*count)
                        .map(|_| field.generate(session.faker))
                        .collect(),
                ),
                _ if field.is_array => Value::List(vec![field.generate(session.faker)]),
                _ => field.generate(session.faker),
            };
            target.insert(field.property.clone(), value);
        }

        for relation in metadata.relations(entity) {
            let full = join_path(prefix, &relation.property);
            if self.rules.is_excluded(&full) {
                continue;
            }
            if let Some(value) = self.rules.override_for(&full) {
                target.insert(relation.property.clone(), value.clone());
                continue;
            }

            let resolved = relation.target();
            let (count, walker) = match self.entry(&relation.property) {
                Some(entry) if entry.is_selected() => self.child(entry),
                None if !self.partial && resolved.ty.is_builtin() => {
                    (1, Self::full(None, self.rules))
                }
                _ => continue,
            };
            reject_sequential_array(resolved.ty, resolved.many, &full)?;
            let binding = relation.key_binding.as_ref();

            if resolved.many {
                if count < 0 {
                    return Err(negative_selection(count));
                }
                let mut children = Vec::new();
                for _ in 0..count {
                    let mut child = walker.spawn(session, resolved.ty, &full)?;
                    bind_keys(target, &mut child, binding);
                    if !walker.partial {
                        rebind_nested(metadata, &mut child);
                    }
                    children.push(child);
                }
                target.insert(relation.property.clone(), Value::List(children));
            } else {
                let mut child = walker.spawn(session, resolved.ty, &full)?;
                bind_keys(target, &mut child, binding);
                if !walker.partial {
                    rebind_nested(metadata, &mut child);
                }
                target.insert(relation.property.clone(), child);
            }
        }

        Ok(())
    }
}

fn negative_selection(amount: i64) -> GenerationError {
    GenerationError::NegativeAmount {
        call: "a selection",
        amount,
    }
}

/// Re-applies the key bindings of `child`'s own relations against `child`.
fn rebind_nested(metadata: &dyn MetadataSource, child: &mut Value) {
    let Some(object) = child.as_object_mut() else {
        return;
    };
    let Some(entity) = object.entity() else {
        return;
    };
    for relation in metadata.relations(entity) {
        let binding = relation.key_binding.as_ref();
        if binding.is_none() {
            continue;
        }
        let Some(mut nested) = object.remove(&relation.property) else {
            continue;
        };
        if let Value::List(items) = &mut nested {
            for item in items.iter_mut() {
                bind_keys(object, item, binding);
            }
        } else {
            bind_keys(object, &mut nested, binding);
        }
        object.insert(relation.property.clone(), nested);
    }
}
