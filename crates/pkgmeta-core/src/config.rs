use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default manifest file name.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Runtime configuration for the pkgmeta CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Manifest file name looked up in the project root.
    pub manifest: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            manifest: MANIFEST_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set the manifest file name.
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Path of the manifest inside the project containing `cwd`.
    ///
    /// Falls back to `cwd` itself when no project root is found.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        crate::paths::project_root(&self.cwd, &self.manifest)
            .unwrap_or_else(|| self.cwd.clone())
            .join(&self.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let config = Config::new(PathBuf::from("/tmp/project"))
            .with_verbosity(2)
            .with_json_logs(true)
            .with_manifest("manifest.json");

        assert_eq!(config.cwd, PathBuf::from("/tmp/project"));
        assert_eq!(config.verbosity, 2);
        assert!(config.json_logs);
        assert_eq!(config.manifest, "manifest.json");
    }

    #[test]
    fn test_manifest_path_falls_back_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf()).with_manifest("nothing-here.json");
        assert_eq!(config.manifest_path(), dir.path().join("nothing-here.json"));
    }
}
