use miette::Result;
use pkgmeta_core::version::version_string;
use pkgmeta_core::VERSION;

pub fn run(json: bool) -> Result<()> {
    if json {
        super::print_ok(serde_json::json!({ "version": VERSION }));
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
