//! The package manifest object model.

mod bugs;
mod deps;
mod file;
mod normalize;
mod package;
mod person;
mod policy;

pub use bugs::BugInfo;
pub use deps::{DependencyCollection, DependencyKind, BUNDLED_KEY};
pub use normalize::{GitLookup, HostedRepository, RepositoryLookup};
pub use package::Package;
pub use person::Person;
pub use policy::{
    DefaultValue, Field, FieldSpec, FieldValue, GenerationStrategy, LoadStrategy, FIELDS,
};
