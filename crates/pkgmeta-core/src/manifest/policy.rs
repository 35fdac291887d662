//! Per-field load and generation policy.
//!
//! Every manifest key the package model understands has one row in
//! [`FIELDS`]: how the raw value becomes a typed value, how the typed value is
//! written back, and what the field defaults to when absent.

use super::bugs::BugInfo;
use super::person::Person;
use crate::collections::OrderedMap;
use serde_json::{Map, Value};

/// A manifest field recognized by the package model.
///
/// Variants are declared in the same order as the rows of [`FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Version,
    Type,
    Private,
    Description,
    Author,
    Maintainers,
    Contributors,
    License,
    Keywords,
    Engines,
    Os,
    Cpu,
    Exports,
    Imports,
    Main,
    Types,
    Browser,
    Bin,
    Man,
    Files,
    Directories,
    Homepage,
    Repository,
    Bugs,
    Config,
    PublishConfig,
    Scripts,
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
    BundledDependencies,
}

/// How a raw manifest value is turned into a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Not loaded field by field (dependency sections).
    None,
    /// Taken as is.
    Plain,
    /// Object wrapped as an [`OrderedMap`] of its own keys.
    Dictionary,
    /// Single [`Person`].
    Person,
    /// Array of [`Person`].
    PersonList,
    /// [`BugInfo`] from a url or an object.
    BugInfo,
}

/// When a field is written by `Package::to_record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Always written.
    Always,
    /// Written unless null, or an empty object or array.
    NonEmpty,
    /// Written unless null.
    NonNull,
}

/// Value a field takes when the manifest does not set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Null,
    EmptyObject,
    EmptyArray,
}

impl DefaultValue {
    #[must_use]
    pub fn value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::EmptyObject => Value::Object(Map::new()),
            Self::EmptyArray => Value::Array(Vec::new()),
        }
    }
}

/// A loaded field value, shaped by its [`LoadStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Plain(Value),
    Dictionary(OrderedMap<String, Value>),
    Person(Person),
    PersonList(Vec<Person>),
    BugInfo(BugInfo),
}

impl FieldValue {
    /// Manifest value of this field value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Plain(value) => value,
            Self::Dictionary(map) => Value::Object(map.to_record()),
            Self::Person(person) => person.to_value(),
            Self::PersonList(people) => Value::Array(people.iter().map(Person::to_value).collect()),
            Self::BugInfo(bugs) => bugs.to_value(),
        }
    }
}

/// A person read from text or an object. Non-blank text in which no part is
/// recognized does not load.
fn load_person(raw: &Value) -> Option<Person> {
    let person = Person::from_value(raw)?;
    let blank_text = raw.as_str().map_or(true, |text| text.trim().is_empty());
    (blank_text || !person.is_empty()).then_some(person)
}

impl LoadStrategy {
    /// Apply this strategy to a raw value.
    ///
    /// A value the strategy cannot shape is handed back as `Err`.
    pub fn load(self, raw: Value) -> Result<FieldValue, Value> {
        if raw.is_null() {
            return match self {
                Self::None => Err(raw),
                Self::Plain => Ok(FieldValue::Plain(raw)),
                Self::Dictionary => Ok(FieldValue::Dictionary(OrderedMap::new())),
                Self::Person => Ok(FieldValue::Person(Person::default())),
                Self::PersonList => Ok(FieldValue::PersonList(Vec::new())),
                Self::BugInfo => Ok(FieldValue::BugInfo(BugInfo::default())),
            };
        }

        match self {
            Self::None => Err(raw),
            Self::Plain => Ok(FieldValue::Plain(raw)),
            Self::Dictionary => match raw {
                Value::Object(obj) => Ok(FieldValue::Dictionary(OrderedMap::from_record(&obj))),
                other => Err(other),
            },
            Self::Person => load_person(&raw).map(FieldValue::Person).ok_or(raw),
            Self::PersonList => {
                let people = raw
                    .as_array()
                    .and_then(|items| items.iter().map(load_person).collect());
                people.map(FieldValue::PersonList).ok_or(raw)
            }
            Self::BugInfo => BugInfo::from_value(&raw)
                .map(FieldValue::BugInfo)
                .ok_or(raw),
        }
    }
}

impl GenerationStrategy {
    /// Whether a field holding `value` is written.
    #[must_use]
    pub fn includes(self, value: &Value) -> bool {
        match self {
            Self::Always => true,
            Self::NonNull => !value.is_null(),
            Self::NonEmpty => match value {
                Value::Null => false,
                Value::Object(obj) => !obj.is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            },
        }
    }
}

/// One row of the field policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub key: &'static str,
    pub load: LoadStrategy,
    pub generation: GenerationStrategy,
    pub default: DefaultValue,
}

const fn row(
    field: Field,
    key: &'static str,
    load: LoadStrategy,
    generation: GenerationStrategy,
    default: DefaultValue,
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        load,
        generation,
        default,
    }
}

use DefaultValue::{EmptyArray, EmptyObject, Null};
use GenerationStrategy::{Always, NonEmpty, NonNull};

/// Field policy table, in manifest output order.
pub static FIELDS: [FieldSpec; 33] = [
    row(Field::Name, "name", LoadStrategy::Plain, NonNull, Null),
    row(Field::Version, "version", LoadStrategy::Plain, NonNull, Null),
    row(Field::Type, "type", LoadStrategy::Plain, NonNull, Null),
    row(Field::Private, "private", LoadStrategy::Plain, NonNull, Null),
    row(Field::Description, "description", LoadStrategy::Plain, NonNull, Null),
    row(Field::Author, "author", LoadStrategy::Person, NonNull, EmptyObject),
    row(Field::Maintainers, "maintainers", LoadStrategy::PersonList, NonEmpty, EmptyArray),
    row(Field::Contributors, "contributors", LoadStrategy::PersonList, NonEmpty, EmptyArray),
    row(Field::License, "license", LoadStrategy::Plain, NonNull, Null),
    row(Field::Keywords, "keywords", LoadStrategy::Plain, NonEmpty, EmptyArray),
    row(Field::Engines, "engines", LoadStrategy::Dictionary, NonEmpty, EmptyObject),
    row(Field::Os, "os", LoadStrategy::Plain, NonNull, Null),
    row(Field::Cpu, "cpu", LoadStrategy::Plain, NonNull, Null),
    row(Field::Exports, "exports", LoadStrategy::Plain, NonNull, Null),
    row(Field::Imports, "imports", LoadStrategy::Plain, NonNull, Null),
    row(Field::Main, "main", LoadStrategy::Plain, NonNull, Null),
    row(Field::Types, "types", LoadStrategy::Plain, NonNull, Null),
    row(Field::Browser, "browser", LoadStrategy::Plain, NonEmpty, EmptyObject),
    row(Field::Bin, "bin", LoadStrategy::Plain, NonEmpty, EmptyObject),
    row(Field::Man, "man", LoadStrategy::Plain, NonEmpty, EmptyArray),
    row(Field::Files, "files", LoadStrategy::Plain, NonNull, Null),
    row(Field::Directories, "directories", LoadStrategy::Plain, NonEmpty, EmptyObject),
    row(Field::Homepage, "homepage", LoadStrategy::Plain, NonNull, Null),
    row(Field::Repository, "repository", LoadStrategy::Plain, NonNull, Null),
    row(Field::Bugs, "bugs", LoadStrategy::BugInfo, NonNull, Null),
    row(Field::Config, "config", LoadStrategy::Plain, NonEmpty, EmptyObject),
    row(Field::PublishConfig, "publishConfig", LoadStrategy::Plain, NonEmpty, EmptyObject),
    row(Field::Scripts, "scripts", LoadStrategy::Dictionary, Always, EmptyObject),
    row(Field::Dependencies, "dependencies", LoadStrategy::None, Always, EmptyObject),
    row(Field::DevDependencies, "devDependencies", LoadStrategy::None, Always, EmptyObject),
    row(Field::PeerDependencies, "peerDependencies", LoadStrategy::None, NonEmpty, EmptyObject),
    row(Field::OptionalDependencies, "optionalDependencies", LoadStrategy::None, NonEmpty, EmptyObject),
    row(Field::BundledDependencies, "bundledDependencies", LoadStrategy::None, NonEmpty, EmptyArray),
];

impl Field {
    /// The policy row of this field.
    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }

    /// Manifest key of this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Look up the field recognized under a manifest key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        FIELDS.iter().find(|spec| spec.key == key).map(|spec| spec.field)
    }

    /// All recognized fields, in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        FIELDS.iter().map(|spec| spec.field)
    }
}
