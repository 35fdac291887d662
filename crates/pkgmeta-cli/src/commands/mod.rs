pub mod deps;
pub mod init;
pub mod normalize;
pub mod show;
pub mod version;

use miette::Result;
use pkgmeta_core::{Config, Error, Package};
use serde_json::{json, Value};

/// Print a successful `--json` result, merging `body` into `{"ok": true}`.
pub fn print_ok(body: Value) {
    let mut output = json!({ "ok": true });
    if let (Some(target), Value::Object(fields)) = (output.as_object_mut(), body) {
        target.extend(fields);
    }
    println!("{:#}", output);
}

/// Turn a library error into the command's failure.
///
/// With `--json` the error is printed to stdout as
/// `{"ok": false, "error": {"code", "message"}}` and the process exits with 1.
pub fn fail(err: Error, json: bool) -> miette::Report {
    if json {
        println!(
            "{:#}",
            json!({
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string()
                }
            })
        );
        std::process::exit(1);
    }
    miette::miette!("{}", err)
}

/// Load the manifest of the project containing the working directory.
pub fn load_package(config: &Config, json: bool) -> Result<Package> {
    let path = config.manifest_path();
    tracing::debug!(path = %path.display(), "loading manifest");
    Package::from_path(&path).map_err(|e| fail(e, json))
}

/// Write `package` back to its manifest file.
pub fn write_package(package: &Package, json: bool) -> Result<()> {
    let path = package.write().map_err(|e| fail(e, json))?;
    tracing::debug!(path = %path.display(), "wrote manifest");
    Ok(())
}
