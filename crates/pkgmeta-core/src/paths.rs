use std::path::{Path, PathBuf};

/// Find the project root by walking up from `cwd` looking for `manifest` or `.git`.
///
/// Returns the first directory containing either marker, or `None` if neither is found.
#[must_use]
pub fn project_root(cwd: &Path, manifest: &str) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(manifest).exists() || current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Express `path` relative to `root` using forward slashes.
///
/// Returns `None` unless `path` lies strictly below `root`.
#[must_use]
pub fn strict_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
