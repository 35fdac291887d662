//! `pkgmeta init` command implementation.
//!
//! Creates a manifest in the working directory from defaults.
//! Non-destructive: an existing manifest is left untouched.

use super::{print_ok, write_package};
use miette::{IntoDiagnostic, Result};
use pkgmeta_core::{Config, Package};
use serde_json::json;
use std::io::{self, Write};

/// Run the init command.
pub fn run(config: &Config, name: Option<String>, yes: bool, json: bool) -> Result<()> {
    let path = config.cwd.join(&config.manifest);

    if path.exists() {
        tracing::debug!(path = %path.display(), "manifest exists, skipping");
        if json {
            print_ok(json!({ "path": path.display().to_string(), "created": false }));
        } else {
            println!("Skipped (already exists): {}", path.display());
        }
        return Ok(());
    }

    let dir_name = config
        .cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my-package")
        .to_string();

    let package_name = match name {
        Some(name) => name,
        None if yes || json => dir_name,
        None => prompt(&format!("package name ({}): ", dir_name))?.unwrap_or(dir_name),
    };

    let mut package = Package::new();
    package.name = Some(package_name);
    package.version = Some("1.0.0".to_string());
    package.set_file_name(&path);
    write_package(&package, json)?;

    if json {
        print_ok(json!({
            "path": path.display().to_string(),
            "created": true,
            "manifest": package.to_record()
        }));
    } else {
        println!("Created {}", path.display());
    }
    Ok(())
}

/// Prompt the user for a line of input. Empty input reads as `None`.
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush().into_diagnostic()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).into_diagnostic()?;

    let trimmed = input.trim();
    Ok(Some(trimmed.to_string()).filter(|s| !s.is_empty()))
}
