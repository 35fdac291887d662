//! `pkgmeta show` command implementation.

use super::{load_package, print_ok};
use miette::Result;
use pkgmeta_core::Config;
use serde_json::{json, Value};

/// Print the generated manifest, or one of its top-level fields.
///
/// A field the manifest does not generate prints as `null`.
pub fn run(config: &Config, field: Option<&str>, json: bool) -> Result<()> {
    let package = load_package(config, json)?;
    let record = package.to_record();

    let Some(key) = field else {
        if json {
            print_ok(json!({ "manifest": record }));
        } else {
            print!("{}", package.to_json_string());
        }
        return Ok(());
    };

    let value = record.get(key).cloned().unwrap_or(Value::Null);
    tracing::debug!(field = key, present = !value.is_null(), "selected field");

    if json {
        print_ok(json!({ "field": key, "value": value }));
    } else {
        match &value {
            Value::String(text) => println!("{}", text),
            other => println!("{:#}", other),
        }
    }
    Ok(())
}
