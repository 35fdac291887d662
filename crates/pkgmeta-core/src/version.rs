/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    match option_env!("PKGMETA_BUILD_GIT_HASH") {
        Some(hash) => format!("pkgmeta {VERSION} ({hash})"),
        None => format!("pkgmeta {VERSION}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_contains_version() {
        let vs = version_string();
        assert!(vs.contains(VERSION));
        assert!(vs.starts_with("pkgmeta "));
    }
}
