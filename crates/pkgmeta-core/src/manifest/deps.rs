//! The dependency sections of a manifest.
//!
//! Four keyed facets (`dependencies`, `devDependencies`, `peerDependencies`,
//! `optionalDependencies`) plus the `bundledDependencies` name list are held
//! together so they can be merged and queried as one unit.

use crate::collections::{OrderedList, OrderedMap};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Manifest key of the bundled dependency list.
pub const BUNDLED_KEY: &str = "bundledDependencies";

/// One keyed dependency facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Runtime,
    Development,
    Peer,
    Optional,
}

impl DependencyKind {
    pub const ALL: [Self; 4] = [
        Self::Runtime,
        Self::Development,
        Self::Peer,
        Self::Optional,
    ];

    /// Lookup order for [`DependencyCollection::all_dependencies`]; the first
    /// facet holding a name decides its version.
    pub const PRECEDENCE: [Self; 4] = [
        Self::Runtime,
        Self::Development,
        Self::Optional,
        Self::Peer,
    ];

    /// Manifest key of this facet.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Development => "devDependencies",
            Self::Peer => "peerDependencies",
            Self::Optional => "optionalDependencies",
        }
    }
}

/// Dependency version as written in a manifest.
///
/// Numbers and booleans read as their text; other shapes carry no version.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The five dependency facets of a package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyCollection {
    pub dependencies: OrderedMap<String, String>,
    pub dev_dependencies: OrderedMap<String, String>,
    pub peer_dependencies: OrderedMap<String, String>,
    pub optional_dependencies: OrderedMap<String, String>,
    pub bundled_dependencies: OrderedList<String>,

    /// Entries whose version was not a string, as read. A number or boolean
    /// is written back in its own shape while its facet still holds the same
    /// text; `null`, array and object versions are written back as long as
    /// the facet has no entry of that name.
    raw_versions: HashMap<DependencyKind, OrderedMap<String, Value>>,
}

impl DependencyCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the dependency sections of a manifest record.
    ///
    /// Sections with the wrong shape are treated as empty.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let mut collection = Self::new();

        for kind in DependencyKind::ALL {
            let Some(section) = record.get(kind.key()).and_then(Value::as_object) else {
                continue;
            };
            for (name, version) in section {
                if let Some(text) = version_text(version) {
                    collection.facet_mut(kind).add_if_absent(name.clone(), text);
                }
                if !version.is_string() {
                    collection
                        .raw_versions
                        .entry(kind)
                        .or_default()
                        .add_if_absent(name.clone(), version.clone());
                }
            }
        }

        if let Some(names) = record.get(BUNDLED_KEY).and_then(Value::as_array) {
            collection.bundled_dependencies.add_range(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string),
            );
        }

        collection
    }

    #[must_use]
    pub fn facet(&self, kind: DependencyKind) -> &OrderedMap<String, String> {
        match kind {
            DependencyKind::Runtime => &self.dependencies,
            DependencyKind::Development => &self.dev_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
            DependencyKind::Optional => &self.optional_dependencies,
        }
    }

    pub fn facet_mut(&mut self, kind: DependencyKind) -> &mut OrderedMap<String, String> {
        match kind {
            DependencyKind::Runtime => &mut self.dependencies,
            DependencyKind::Development => &mut self.dev_dependencies,
            DependencyKind::Peer => &mut self.peer_dependencies,
            DependencyKind::Optional => &mut self.optional_dependencies,
        }
    }

    /// Merge `other` into this collection.
    ///
    /// For a name present in the same facet of both collections:
    /// - `None`: fail with [`Error::DuplicateDependency`] before changing anything.
    /// - `Some(true)`: the incoming version replaces the existing entry.
    /// - `Some(false)`: the existing entry is kept.
    ///
    /// Bundled names are appended unless already present. `other` is never modified.
    pub fn register(&mut self, other: &Self, overwrite: Option<bool>) -> Result<()> {
        if overwrite.is_none() {
            for kind in DependencyKind::ALL {
                let existing = self.facet(kind);
                if let Some(name) = other.facet(kind).keys().into_iter().find(|n| existing.has(*n))
                {
                    return Err(Error::DuplicateDependency {
                        name: name.clone(),
                        facet: kind.key(),
                    });
                }
            }
        }

        for kind in DependencyKind::ALL {
            let target = self.facet_mut(kind);
            for (name, version) in other.facet(kind).iter() {
                if !target.has(name) {
                    target.add(name.clone(), version.clone())?;
                } else if overwrite == Some(true) {
                    target.remove(name)?;
                    target.add(name.clone(), version.clone())?;
                }
            }
        }

        for name in other.bundled_dependencies.iter() {
            if !self.bundled_dependencies.contains(name) {
                self.bundled_dependencies.add(name.clone());
            }
        }

        Ok(())
    }

    /// Remove every name listed in `other` from the matching facet of this
    /// collection, and every bundled name of `other` from the bundled list.
    /// Names this collection does not hold are ignored.
    pub fn unregister(&mut self, other: &Self) {
        for kind in DependencyKind::ALL {
            for name in other.facet(kind).keys() {
                let target = self.facet_mut(kind);
                if target.has(name) {
                    let _ = target.remove(name);
                }
                if let Some(raw) = self.raw_versions.get_mut(&kind) {
                    if raw.has(name) {
                        let _ = raw.remove(name);
                    }
                }
            }
        }

        for name in other.bundled_dependencies.iter() {
            if self.bundled_dependencies.contains(name) {
                let _ = self.bundled_dependencies.remove(name);
            }
        }
    }

    /// Union of the four keyed facets, rebuilt on every call.
    ///
    /// A name listed in several facets takes its version from the first one in
    /// [`DependencyKind::PRECEDENCE`].
    #[must_use]
    pub fn all_dependencies(&self) -> OrderedMap<String, String> {
        let mut all = OrderedMap::new();
        for kind in DependencyKind::PRECEDENCE {
            for (name, version) in self.facet(kind).iter() {
                all.add_if_absent(name.clone(), version.clone());
            }
        }
        all
    }

    /// True when every facet, bundled names included, is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        DependencyKind::ALL
            .iter()
            .all(|kind| self.facet(*kind).is_empty())
            && self.bundled_dependencies.is_empty()
    }

    pub fn clear(&mut self) {
        for kind in DependencyKind::ALL {
            self.facet_mut(kind).clear();
        }
        self.bundled_dependencies.clear();
        self.raw_versions.clear();
    }

    /// Manifest value of one facet.
    ///
    /// Versions read as numbers or booleans keep that shape while unchanged.
    /// Entries without a usable version follow the string entries.
    #[must_use]
    pub fn facet_value(&self, kind: DependencyKind) -> Value {
        let raw = self.raw_versions.get(&kind);
        let mut record = Map::new();

        for (name, version) in self.facet(kind).iter() {
            let kept = raw
                .and_then(|raw| raw.get(name.as_str()).ok())
                .filter(|value| version_text(value).as_deref() == Some(version.as_str()));
            let value = kept.cloned().unwrap_or_else(|| Value::String(version.clone()));
            record.insert(name.clone(), value);
        }

        for (name, value) in raw.into_iter().flat_map(|raw| raw.iter()) {
            if version_text(value).is_none() && !record.contains_key(name.as_str()) {
                record.insert(name.clone(), value.clone());
            }
        }

        Value::Object(record)
    }

    /// Manifest value of the bundled name list.
    #[must_use]
    pub fn bundled_value(&self) -> Value {
        Value::Array(self.bundled_dependencies.to_values())
    }
}
