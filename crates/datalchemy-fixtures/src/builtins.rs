//! Built-in scalar sentinels usable as relation targets.

use std::fmt;

use datalchemy_core::Value;

use crate::faker_rs::Faker;

const WORD_MIN: usize = 6;
const WORD_MAX: usize = 12;
const NUMBER_MIN: i64 = 1;
const NUMBER_MAX: i64 = 10_000;

/// Marker types that generate a scalar instead of a nested entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltIn {
    String,
    Number,
    Boolean,
    Date,
    Uuid,
    /// Sequential integer drawn from the builder's counters.
    AutoIncrement,
}

impl BuiltIn {
    pub const ALL: [BuiltIn; 6] = [
        BuiltIn::String,
        BuiltIn::Number,
        BuiltIn::Boolean,
        BuiltIn::Date,
        BuiltIn::Uuid,
        BuiltIn::AutoIncrement,
    ];

    /// Draws a value for this sentinel.
    ///
    /// `AutoIncrement` has no meaning outside a build and yields `0`; builders
    /// intercept it before reaching this registry.
    pub fn generate(self, faker: &mut Faker) -> Value {
        match self {
            BuiltIn::String => Value::Text(faker.word_between(WORD_MIN, WORD_MAX)),
            BuiltIn::Number => Value::Int(faker.int(NUMBER_MIN, NUMBER_MAX)),
            BuiltIn::Boolean => Value::Bool(faker.boolean()),
            BuiltIn::Date => Value::Date(faker.past_datetime()),
            BuiltIn::Uuid => Value::Uuid(faker.uuid()),
            BuiltIn::AutoIncrement => Value::Int(0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltIn::String => "String",
            BuiltIn::Number => "Number",
            BuiltIn::Boolean => "Boolean",
            BuiltIn::Date => "Date",
            BuiltIn::Uuid => "UUID",
            BuiltIn::AutoIncrement => "AutoIncrement",
        }
    }
}

impl fmt::Display for BuiltIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
