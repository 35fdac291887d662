use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read a file's raw bytes.
///
/// Returns `Ok(None)` when the file does not exist. Any other failure is an error.
/// Decoding is left to the caller so invalid UTF-8 is never silently replaced.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Path of the scratch file used by [`atomic_write`] for `path`.
fn scratch_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("manifest");
    parent.join(format!(".{name}.pkgmeta-{}", std::process::id()))
}

/// Atomically replace the contents of `path` by writing a sibling scratch file
/// and renaming it over the target.
///
/// Readers see either the old contents or the new contents, never a partial write.
/// Missing parent directories are created.
///
/// # Errors
/// Returns an error if the write or rename fails.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let scratch = scratch_path(path);
    {
        let mut file = File::create(&scratch)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&scratch, path) {
        // Windows refuses to rename over an existing file.
        if cfg!(windows) {
            fs::copy(&scratch, path)?;
            let _ = fs::remove_file(&scratch);
            return Ok(());
        }
        let _ = fs::remove_file(&scratch);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempdir().unwrap();
        let content = read_optional(&dir.path().join("package.json")).unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn test_read_optional_keeps_invalid_utf8_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, [b'{', b'}', 0x80]).unwrap();

        let content = read_optional(&path).unwrap().unwrap();
        assert_eq!(content, vec![b'{', b'}', 0x80]);
    }

    #[test]
    fn test_read_optional_directory_is_error() {
        let dir = tempdir().unwrap();
        assert!(read_optional(dir.path()).is_err());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");

        atomic_write(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        atomic_write(&path, b"{\"name\":\"a\"}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"name\":\"a\"}");
    }

    #[test]
    fn test_atomic_write_creates_parent_and_leaves_no_scratch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("packages").join("a").join("package.json");

        atomic_write(&path, b"{}").unwrap();

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("package.json")]);
    }
}
