//! The structured package and its mapping to and from a manifest record.
//!
//! Loading walks [`FIELDS`]: each recognized key is resolved against its
//! default, shaped by its load strategy and stored in a typed slot. Keys the
//! table does not know are kept in `additional_properties`. A recognized key
//! whose value does not fit its typed slot keeps its raw value next to the
//! slot, and the raw value is written back until the slot is changed.
//!
//! Generating walks the same table, asks each field's generation strategy
//! whether to write it, then applies `additional_properties` last.

use super::bugs::BugInfo;
use super::deps::{DependencyCollection, DependencyKind};
use super::person::Person;
use super::policy::{Field, FieldValue, GenerationStrategy, LoadStrategy, FIELDS};
use crate::collections::OrderedMap;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A package manifest as typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub(crate) file_name: Option<PathBuf>,

    pub name: Option<String>,
    pub version: Option<String>,
    /// The `type` field (`module` or `commonjs`).
    pub package_type: Option<String>,
    pub private: Option<bool>,
    pub description: Option<String>,
    pub author: Person,
    pub maintainers: Vec<Person>,
    pub contributors: Vec<Person>,
    pub license: Option<String>,
    pub keywords: Vec<String>,
    pub engines: OrderedMap<String, Value>,
    pub os: Option<Vec<String>>,
    pub cpu: Option<Vec<String>>,
    pub exports: Value,
    pub imports: Value,
    pub main: Option<String>,
    pub types: Option<String>,
    pub browser: Value,
    pub bin: Value,
    pub man: Value,
    pub files: Option<Vec<String>>,
    pub directories: Value,
    pub homepage: Option<String>,
    pub repository: Value,
    pub bugs: BugInfo,
    pub config: Value,
    pub publish_config: Value,
    pub scripts: OrderedMap<String, Value>,
    pub dependencies: DependencyCollection,

    /// Manifest fields not mapped to a typed slot, in manifest order.
    pub additional_properties: OrderedMap<String, Value>,

    /// Per-package generation strategies, taking precedence over [`FIELDS`].
    pub generation_overrides: HashMap<Field, GenerationStrategy>,

    unfitted: HashMap<Field, Unfitted>,
}

/// Raw value of a recognized field that its typed slot could not hold.
#[derive(Debug, Clone, PartialEq)]
struct Unfitted {
    raw: Value,
    /// What the slot generated right after loading. Once the slot generates
    /// anything else it has been edited and the raw value no longer applies.
    loaded: Value,
}

/// Read a plain value into a typed slot; `null` reads as `None`.
fn typed<T: DeserializeOwned>(raw: Value) -> Result<Option<T>, Value> {
    if raw.is_null() {
        return Ok(None);
    }
    let parsed = T::deserialize(&raw);
    parsed.map(Some).map_err(|_| raw)
}

/// Whether a dependency section has the shape the collection reads.
fn dependency_shape_fits(field: Field, raw: &Value) -> bool {
    match field {
        Field::BundledDependencies => raw.is_array(),
        _ => raw.is_object(),
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

impl Package {
    /// A package with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::from_record(&Map::new())
    }

    /// Package with no values at all, before defaults are applied.
    fn blank() -> Self {
        Self {
            file_name: None,
            name: None,
            version: None,
            package_type: None,
            private: None,
            description: None,
            author: Person::default(),
            maintainers: Vec::new(),
            contributors: Vec::new(),
            license: None,
            keywords: Vec::new(),
            engines: OrderedMap::new(),
            os: None,
            cpu: None,
            exports: Value::Null,
            imports: Value::Null,
            main: None,
            types: None,
            browser: Value::Null,
            bin: Value::Null,
            man: Value::Null,
            files: None,
            directories: Value::Null,
            homepage: None,
            repository: Value::Null,
            bugs: BugInfo::default(),
            config: Value::Null,
            publish_config: Value::Null,
            scripts: OrderedMap::new(),
            dependencies: DependencyCollection::new(),
            additional_properties: OrderedMap::new(),
            generation_overrides: HashMap::new(),
            unfitted: HashMap::new(),
        }
    }

    /// Load a package from a manifest record.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let mut package = Self::blank();
        package.load(record);
        package
    }

    fn load(&mut self, record: &Map<String, Value>) {
        self.dependencies = DependencyCollection::from_record(record);

        for spec in &FIELDS {
            let raw = record
                .get(spec.key)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| spec.default.value());

            let kept = if spec.load == LoadStrategy::None {
                // Read above; anything the collection cannot reproduce is kept raw.
                if dependency_shape_fits(spec.field, &raw)
                    && self.field_value(spec.field) == raw
                {
                    Ok(())
                } else {
                    Err(raw)
                }
            } else {
                spec.load
                    .load(raw)
                    .and_then(|value| self.assign(spec.field, value))
            };

            if let Err(raw) = kept {
                let loaded = self.field_value(spec.field);
                self.unfitted.insert(spec.field, Unfitted { raw, loaded });
            }
        }

        for (key, value) in record {
            if Field::from_key(key).is_none() {
                self.additional_properties
                    .add_if_absent(key.clone(), value.clone());
            }
        }
    }

    /// Store a loaded value in the slot of `field`.
    ///
    /// Hands the raw value back when it does not fit the slot.
    fn assign(&mut self, field: Field, value: FieldValue) -> Result<(), Value> {
        match (field, value) {
            (Field::Name, FieldValue::Plain(v)) => self.name = typed(v)?,
            (Field::Version, FieldValue::Plain(v)) => self.version = typed(v)?,
            (Field::Type, FieldValue::Plain(v)) => self.package_type = typed(v)?,
            (Field::Private, FieldValue::Plain(v)) => self.private = typed(v)?,
            (Field::Description, FieldValue::Plain(v)) => self.description = typed(v)?,
            (Field::License, FieldValue::Plain(v)) => self.license = typed(v)?,
            (Field::Keywords, FieldValue::Plain(v)) => {
                self.keywords = typed(v)?.unwrap_or_default();
            }
            (Field::Os, FieldValue::Plain(v)) => self.os = typed(v)?,
            (Field::Cpu, FieldValue::Plain(v)) => self.cpu = typed(v)?,
            (Field::Main, FieldValue::Plain(v)) => self.main = typed(v)?,
            (Field::Types, FieldValue::Plain(v)) => self.types = typed(v)?,
            (Field::Files, FieldValue::Plain(v)) => self.files = typed(v)?,
            (Field::Homepage, FieldValue::Plain(v)) => self.homepage = typed(v)?,
            (Field::Exports, FieldValue::Plain(v)) => self.exports = v,
            (Field::Imports, FieldValue::Plain(v)) => self.imports = v,
            (Field::Browser, FieldValue::Plain(v)) => self.browser = v,
            (Field::Bin, FieldValue::Plain(v)) => self.bin = v,
            (Field::Man, FieldValue::Plain(v)) => self.man = v,
            (Field::Directories, FieldValue::Plain(v)) => self.directories = v,
            (Field::Repository, FieldValue::Plain(v)) => self.repository = v,
            (Field::Config, FieldValue::Plain(v)) => self.config = v,
            (Field::PublishConfig, FieldValue::Plain(v)) => self.publish_config = v,
            (Field::Author, FieldValue::Person(p)) => self.author = p,
            (Field::Maintainers, FieldValue::PersonList(p)) => self.maintainers = p,
            (Field::Contributors, FieldValue::PersonList(p)) => self.contributors = p,
            (Field::Engines, FieldValue::Dictionary(m)) => self.engines = m,
            (Field::Scripts, FieldValue::Dictionary(m)) => self.scripts = m,
            (Field::Bugs, FieldValue::BugInfo(b)) => self.bugs = b,
            (_, other) => return Err(other.into_value()),
        }
        Ok(())
    }

    /// Current manifest value of a recognized field, before its generation
    /// strategy is applied.
    #[must_use]
    pub fn field_value(&self, field: Field) -> Value {
        match field {
            Field::Name => Value::from(self.name.clone()),
            Field::Version => Value::from(self.version.clone()),
            Field::Type => Value::from(self.package_type.clone()),
            Field::Private => Value::from(self.private),
            Field::Description => Value::from(self.description.clone()),
            Field::Author => self.author.to_value(),
            Field::Maintainers => Value::Array(self.maintainers.iter().map(Person::to_value).collect()),
            Field::Contributors => {
                Value::Array(self.contributors.iter().map(Person::to_value).collect())
            }
            Field::License => Value::from(self.license.clone()),
            Field::Keywords => Value::from(self.keywords.clone()),
            Field::Engines => Value::Object(self.engines.to_record()),
            Field::Os => Value::from(self.os.clone()),
            Field::Cpu => Value::from(self.cpu.clone()),
            Field::Exports => self.exports.clone(),
            Field::Imports => self.imports.clone(),
            Field::Main => Value::from(self.main.clone()),
            Field::Types => Value::from(self.types.clone()),
            Field::Browser => self.browser.clone(),
            Field::Bin => self.bin.clone(),
            Field::Man => self.man.clone(),
            Field::Files => Value::from(self.files.clone()),
            Field::Directories => self.directories.clone(),
            Field::Homepage => Value::from(self.homepage.clone()),
            Field::Repository => self.repository.clone(),
            Field::Bugs => self.bugs.to_value(),
            Field::Config => self.config.clone(),
            Field::PublishConfig => self.publish_config.clone(),
            Field::Scripts => Value::Object(self.scripts.to_record()),
            Field::Dependencies => self.dependencies.facet_value(DependencyKind::Runtime),
            Field::DevDependencies => self.dependencies.facet_value(DependencyKind::Development),
            Field::PeerDependencies => self.dependencies.facet_value(DependencyKind::Peer),
            Field::OptionalDependencies => {
                self.dependencies.facet_value(DependencyKind::Optional)
            }
            Field::BundledDependencies => self.dependencies.bundled_value(),
        }
    }

    /// Raw value of `field` that did not fit its typed slot, while the slot
    /// is unchanged since loading.
    #[must_use]
    pub fn unfitted_value(&self, field: Field) -> Option<&Value> {
        self.unfitted
            .get(&field)
            .filter(|unfitted| unfitted.loaded == self.field_value(field))
            .map(|unfitted| &unfitted.raw)
    }

    /// Effective generation strategy of a field for this package.
    #[must_use]
    pub fn generation_strategy(&self, field: Field) -> GenerationStrategy {
        self.generation_overrides
            .get(&field)
            .copied()
            .unwrap_or(field.spec().generation)
    }

    pub fn set_generation_strategy(&mut self, field: Field, strategy: GenerationStrategy) {
        self.generation_overrides.insert(field, strategy);
    }

    /// Serialize to a manifest record.
    #[must_use]
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();

        for spec in &FIELDS {
            if let Some(raw) = self.unfitted_value(spec.field) {
                record.insert(spec.key.to_string(), raw.clone());
                continue;
            }
            let value = self.field_value(spec.field);
            if self.generation_strategy(spec.field).includes(&value) {
                record.insert(spec.key.to_string(), value);
            }
        }

        for (key, value) in self.additional_properties.iter() {
            record.insert(key.clone(), value.clone());
        }

        record
    }

    /// The manifest file this package was loaded from or is bound to.
    #[must_use]
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) {
        self.file_name = Some(path.into());
    }

    /// Merge dependencies into this package. See [`DependencyCollection::register`].
    pub fn register(&mut self, other: &DependencyCollection, overwrite: Option<bool>) -> Result<()> {
        self.dependencies.register(other, overwrite)
    }

    /// Drop dependencies from this package. See [`DependencyCollection::unregister`].
    pub fn unregister(&mut self, other: &DependencyCollection) {
        self.dependencies.unregister(other);
    }
}
