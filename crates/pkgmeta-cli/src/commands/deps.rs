//! `pkgmeta deps` command implementation.

use super::{fail, load_package, print_ok, write_package};
use miette::Result;
use pkgmeta_core::{Config, DependencyCollection, DependencyKind};
use serde_json::{json, Value};

/// A parsed `deps` subcommand.
#[derive(Debug)]
pub enum DepsAction {
    List,
    Add {
        name: String,
        version: String,
        kind: DependencyKind,
        /// `None` fails on an existing entry, `Some(true)` replaces it,
        /// `Some(false)` keeps it.
        overwrite: Option<bool>,
    },
    Remove {
        names: Vec<String>,
    },
}

pub fn run(config: &Config, action: DepsAction, json: bool) -> Result<()> {
    match action {
        DepsAction::List => list(config, json),
        DepsAction::Add {
            name,
            version,
            kind,
            overwrite,
        } => add(config, name, version, kind, overwrite, json),
        DepsAction::Remove { names } => remove(config, &names, json),
    }
}

fn list(config: &Config, json: bool) -> Result<()> {
    let package = load_package(config, json)?;
    let all = package.dependencies.all_dependencies();

    if json {
        print_ok(json!({ "dependencies": all.to_record() }));
    } else if all.is_empty() {
        println!("No dependencies");
    } else {
        for (name, version) in all.iter() {
            println!("{} {}", name, version);
        }
    }
    Ok(())
}

fn add(
    config: &Config,
    name: String,
    version: String,
    kind: DependencyKind,
    overwrite: Option<bool>,
    json: bool,
) -> Result<()> {
    let mut package = load_package(config, json)?;

    let mut incoming = DependencyCollection::new();
    incoming
        .facet_mut(kind)
        .add(name.clone(), version)
        .map_err(|e| fail(e, json))?;

    package
        .register(&incoming, overwrite)
        .map_err(|e| fail(e, json))?;
    tracing::debug!(name = %name, section = kind.key(), "registered dependency");

    write_package(&package, json)?;

    let section = package.dependencies.facet(kind);
    let stored = section.get(name.as_str()).map_err(|e| fail(e, json))?;
    if json {
        print_ok(json!({
            "name": name,
            "section": kind.key(),
            "version": stored
        }));
    } else {
        println!("{} {} -> {}", name, stored, kind.key());
    }
    Ok(())
}

fn remove(config: &Config, names: &[String], json: bool) -> Result<()> {
    let mut package = load_package(config, json)?;

    let mut outgoing = DependencyCollection::new();
    for name in names {
        for kind in DependencyKind::ALL {
            outgoing
                .facet_mut(kind)
                .add_if_absent(name.clone(), "*".to_string());
        }
        if !outgoing.bundled_dependencies.contains(name) {
            outgoing.bundled_dependencies.add(name.clone());
        }
    }

    let present = package.dependencies.all_dependencies();
    let removed: Vec<&String> = names.iter().filter(|n| present.has(n.as_str())).collect();

    package.unregister(&outgoing);
    tracing::debug!(count = removed.len(), "unregistered dependencies");

    write_package(&package, json)?;

    if json {
        print_ok(json!({
            "removed": removed,
            "dependencies": Value::Object(package.dependencies.all_dependencies().to_record())
        }));
    } else if removed.is_empty() {
        println!("Nothing to remove");
    } else {
        for name in removed {
            println!("- {}", name);
        }
    }
    Ok(())
}
