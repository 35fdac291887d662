//! Loading packages from manifest files and writing them back.

use super::package::Package;
use crate::error::{Error, Result};
use pkgmeta_util::fs::{atomic_write, read_optional};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

impl Package {
    /// Load the manifest at `path`.
    ///
    /// A missing file yields a package with defaults, bound to `path`, so a
    /// manifest can be seeded and written later.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not UTF-8 JSON, or its
    /// root is not an object.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_optional(path).map_err(|source| Error::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut package = match content {
            None => Self::new(),
            Some(bytes) => Self::from_record(&parse_record(path, &bytes)?),
        };
        package.file_name = Some(path.to_path_buf());
        Ok(package)
    }

    /// Load a package from `record`, bound to `path`. The file is not read.
    #[must_use]
    pub fn from_path_and_record(path: impl Into<PathBuf>, record: &Map<String, Value>) -> Self {
        let mut package = Self::from_record(record);
        package.file_name = Some(path.into());
        package
    }

    /// Generated manifest as pretty JSON with a trailing newline.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        format!("{:#}\n", Value::Object(self.to_record()))
    }

    /// Write the generated manifest to `path`, replacing it atomically.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_json_string().as_bytes())?;
        Ok(())
    }

    /// Write the generated manifest back to the file it is bound to.
    pub fn write(&self) -> Result<PathBuf> {
        let path = self
            .file_name
            .clone()
            .ok_or_else(|| Error::other("package is not bound to a manifest file"))?;
        self.write_to(&path)?;
        Ok(path)
    }
}

fn parse_record(path: &Path, bytes: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| Error::MalformedManifest {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(record) => Ok(record),
        _ => Err(Error::ManifestNotObject {
            path: path.to_path_buf(),
        }),
    }
}
