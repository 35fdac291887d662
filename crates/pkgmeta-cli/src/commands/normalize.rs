//! `pkgmeta normalize` command implementation.

use super::{fail, load_package, print_ok, write_package};
use miette::{IntoDiagnostic, Result};
use pkgmeta_core::{Config, GitLookup};
use serde_json::json;

/// Enrich the manifest from its README and git remote.
///
/// Prints the result; with `write` it is also saved to the manifest file.
pub fn run(config: &Config, write: bool, json: bool) -> Result<()> {
    let mut package = load_package(config, json)?;

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    runtime
        .block_on(package.normalize(&GitLookup::new()))
        .map_err(|e| fail(e, json))?;
    tracing::debug!(
        repository = !package.repository.is_null(),
        homepage = package.homepage.is_some(),
        "normalized manifest"
    );

    if write {
        write_package(&package, json)?;
    }

    if json {
        print_ok(json!({ "written": write, "manifest": package.to_record() }));
    } else {
        print!("{}", package.to_json_string());
    }
    Ok(())
}
