#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

pub mod collections;
pub mod config;
pub mod error;
pub mod manifest;
pub mod paths;
pub mod version;

pub use collections::{KeyOrder, OrderedList, OrderedMap};
pub use config::Config;
pub use error::{Error, Result};
pub use manifest::{
    BugInfo, DependencyCollection, DependencyKind, Field, FieldValue, GenerationStrategy,
    GitLookup, HostedRepository, LoadStrategy, Package, Person, RepositoryLookup, FIELDS,
};
pub use version::VERSION;
