//! Enriching a package from its surroundings.
//!
//! `Package::normalize` fills `description` from the README next to the
//! manifest and derives `repository`, `bugs` and `homepage` from the git
//! remote of the enclosing repository. Lookups are injected through
//! [`RepositoryLookup`]; [`GitLookup`] is the implementation backed by the
//! `git` executable.

use super::package::Package;
use crate::error::Result;
use crate::paths::strict_relative;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use url::Url;

/// Filesystem and git lookups used by `Package::normalize`.
///
/// "Not found" is `Ok(None)`; errors are reserved for I/O faults.
#[async_trait]
pub trait RepositoryLookup: Send + Sync {
    /// Root of the repository containing `dir`.
    async fn find_repo_root(&self, dir: &Path) -> io::Result<Option<PathBuf>>;

    /// Url of the repository's primary remote.
    async fn remote_url(&self, repo_root: &Path) -> io::Result<Option<String>>;

    /// File name of the README inside `dir`.
    async fn readme_file(&self, dir: &Path) -> io::Result<Option<String>>;
}

/// [`RepositoryLookup`] using the `git` executable and the local filesystem.
#[derive(Debug, Clone)]
pub struct GitLookup {
    program: PathBuf,
    remote: String,
}

impl Default for GitLookup {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            remote: "origin".to_string(),
        }
    }
}

impl GitLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Read the url of a remote other than `origin`.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Run git in `dir` and return its trimmed stdout, or `None` when git is
    /// missing, `dir` does not exist, or the command fails.
    async fn git(&self, dir: &Path, args: &[&str]) -> io::Result<Option<String>> {
        let output = match Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        if !output.status.success() {
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(stdout).filter(|s| !s.is_empty()))
    }
}

#[async_trait]
impl RepositoryLookup for GitLookup {
    async fn find_repo_root(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        Ok(self
            .git(dir, &["rev-parse", "--show-toplevel"])
            .await?
            .map(PathBuf::from))
    }

    async fn remote_url(&self, repo_root: &Path) -> io::Result<Option<String>> {
        self.git(repo_root, &["remote", "get-url", &self.remote]).await
    }

    async fn readme_file(&self, dir: &Path) -> io::Result<Option<String>> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_readme_name(name) {
                    candidates.push(name.to_string());
                }
            }
        }

        candidates.sort();
        let preferred = candidates
            .iter()
            .position(|name| name.eq_ignore_ascii_case("readme.md"))
            .unwrap_or(0);
        Ok(candidates.into_iter().nth(preferred))
    }
}

/// `README`, optionally followed by an extension, in any case.
fn is_readme_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    match lower.strip_prefix("readme") {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// A repository on a git host, addressed as `https://host/path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedRepository {
    pub host: String,
    /// Path below the host without leading slash or `.git` suffix, e.g. `owner/repo`.
    pub path: String,
}

impl HostedRepository {
    /// Parse a git remote url.
    ///
    /// Accepts scp-like remotes (`git@host:owner/repo.git`) and `https`,
    /// `git+https`, `ssh`, `git+ssh` and `git` urls. Returns `None` for local
    /// paths and anything else without a host and an `owner/repo` path.
    #[must_use]
    pub fn parse(remote: &str) -> Option<Self> {
        let remote = remote.trim();

        let (host, path) = if remote.contains("://") {
            let stripped = remote.strip_prefix("git+").unwrap_or(remote);
            let url = Url::parse(stripped).ok()?;
            (url.host_str()?.to_string(), url.path().to_string())
        } else {
            let (user_host, path) = remote.split_once(':')?;
            let host = user_host.rsplit('@').next()?;
            (host.to_string(), path.to_string())
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        if host.is_empty() || !path.contains('/') || path.contains('\\') {
            return None;
        }

        Some(Self {
            host,
            path: path.to_string(),
        })
    }

    #[must_use]
    pub fn https_url(&self) -> String {
        format!("https://{}/{}", self.host, self.path)
    }

    /// Url for the manifest's `repository.url`.
    #[must_use]
    pub fn repository_url(&self) -> String {
        format!("git+{}.git", self.https_url())
    }

    #[must_use]
    pub fn bugs_url(&self) -> String {
        format!("{}/issues", self.https_url())
    }

    #[must_use]
    pub fn homepage(&self) -> String {
        format!("{}#readme", self.https_url())
    }
}

impl Package {
    /// Absolute directory of the manifest, or of the working directory when
    /// the package is not bound to a file.
    async fn base_dir(&self) -> io::Result<PathBuf> {
        let dir = self
            .file_name
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        match tokio::fs::canonicalize(&dir).await {
            Ok(dir) => Ok(dir),
            Err(_) if dir.is_absolute() => Ok(dir),
            Err(_) => Ok(std::env::current_dir()?.join(dir)),
        }
    }

    /// Fields derived from the README and the git remote.
    async fn derived_fields<L>(&self, lookup: &L) -> Result<Map<String, Value>>
    where
        L: RepositoryLookup + ?Sized,
    {
        let dir = self.base_dir().await?;
        let mut derived = Map::new();

        if let Some(readme) = lookup.readme_file(&dir).await? {
            let contents = tokio::fs::read_to_string(dir.join(readme)).await?;
            derived.insert(
                "description".to_string(),
                Value::String(contents.trim().to_string()),
            );
        }

        let Some(root) = lookup.find_repo_root(&dir).await? else {
            return Ok(derived);
        };
        let Some(remote) = lookup.remote_url(&root).await? else {
            return Ok(derived);
        };

        let hosted = HostedRepository::parse(&remote);
        let mut repository = json!({
            "type": "git",
            "url": hosted.as_ref().map_or_else(|| remote.clone(), HostedRepository::repository_url),
        });
        if let Some(directory) = strict_relative(&root, &dir) {
            repository["directory"] = Value::String(directory);
        }
        derived.insert("repository".to_string(), repository);

        if let Some(hosted) = hosted {
            derived.insert("bugs".to_string(), Value::String(hosted.bugs_url()));
            derived.insert("homepage".to_string(), Value::String(hosted.homepage()));
        }

        Ok(derived)
    }

    /// Enrich this package from its README and git remote, then reload it so
    /// all load defaults and strategies apply to the merged record.
    ///
    /// The file binding and generation overrides are kept.
    ///
    /// # Errors
    /// Returns an error when a lookup or reading the README fails with an I/O
    /// fault. "Not found" results leave the corresponding fields untouched.
    pub async fn normalize<L>(&mut self, lookup: &L) -> Result<()>
    where
        L: RepositoryLookup + ?Sized,
    {
        let derived = self.derived_fields(lookup).await?;

        let mut record = self.to_record();
        for (key, value) in derived {
            record.insert(key, value);
        }

        let file_name = self.file_name.take();
        let overrides = std::mem::take(&mut self.generation_overrides);
        *self = Self::from_record(&record);
        self.file_name = file_name;
        self.generation_overrides = overrides;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::policy::{Field, GenerationStrategy};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Lookup answering from fixed values and recording the calls it receives.
    #[derive(Default)]
    struct FakeLookup {
        root: Option<PathBuf>,
        remote: Option<String>,
        readme: Option<String>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeLookup {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RepositoryLookup for FakeLookup {
        async fn find_repo_root(&self, _dir: &Path) -> io::Result<Option<PathBuf>> {
            self.calls.lock().unwrap().push("root");
            Ok(self.root.clone())
        }

        async fn remote_url(&self, _repo_root: &Path) -> io::Result<Option<String>> {
            self.calls.lock().unwrap().push("remote");
            Ok(self.remote.clone())
        }

        async fn readme_file(&self, _dir: &Path) -> io::Result<Option<String>> {
            self.calls.lock().unwrap().push("readme");
            Ok(self.readme.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl RepositoryLookup for FailingLookup {
        async fn find_repo_root(&self, _dir: &Path) -> io::Result<Option<PathBuf>> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "denied"))
        }

        async fn remote_url(&self, _repo_root: &Path) -> io::Result<Option<String>> {
            Ok(None)
        }

        async fn readme_file(&self, _dir: &Path) -> io::Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_hosted_repository_parse() {
        let expected = Some(HostedRepository {
            host: "github.com".to_string(),
            path: "owner/repo".to_string(),
        });

        for remote in [
            "git@github.com:owner/repo.git",
            "github.com:owner/repo",
            "https://github.com/owner/repo.git",
            "git+https://github.com/owner/repo.git",
            "ssh://git@github.com/owner/repo.git",
            "git+ssh://git@github.com/owner/repo.git",
            "git://github.com/owner/repo",
        ] {
            assert_eq!(HostedRepository::parse(remote), expected, "{remote}");
        }

        assert_eq!(HostedRepository::parse("/srv/git/repo.git"), None);
        assert_eq!(HostedRepository::parse("C:\\repos\\x"), None);
    }

    #[test]
    fn test_hosted_repository_urls() {
        let hosted = HostedRepository::parse("git@gitlab.com:group/sub/project.git").unwrap();
        assert_eq!(hosted.repository_url(), "git+https://gitlab.com/group/sub/project.git");
        assert_eq!(hosted.bugs_url(), "https://gitlab.com/group/sub/project/issues");
        assert_eq!(hosted.homepage(), "https://gitlab.com/group/sub/project#readme");
    }

    #[test]
    fn test_is_readme_name() {
        assert!(is_readme_name("README.md"));
        assert!(is_readme_name("readme"));
        assert!(is_readme_name("Readme.txt"));
        assert!(!is_readme_name("README-old"));
        assert!(!is_readme_name("docs.md"));
    }

    #[tokio::test]
    async fn test_normalize_from_readme_and_remote() {
        let repo = tempdir().unwrap();
        let root = repo.path().canonicalize().unwrap();
        let pkg_dir = root.join("packages").join("a");
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(pkg_dir.join("README.md"), "# a\n\nDoes things.\n").unwrap();

        let record = json!({"name": "a", "description": "old", "custom": 1});
        let mut pkg =
            Package::from_path_and_record(pkg_dir.join("package.json"), record.as_object().unwrap());
        pkg.set_generation_strategy(Field::Scripts, GenerationStrategy::NonEmpty);

        let lookup = FakeLookup {
            root: Some(root.clone()),
            remote: Some("git@github.com:owner/repo.git".to_string()),
            readme: Some("README.md".to_string()),
            ..Default::default()
        };
        pkg.normalize(&lookup).await.unwrap();

        assert_eq!(pkg.description.as_deref(), Some("# a\n\nDoes things."));
        assert_eq!(
            pkg.repository,
            json!({
                "type": "git",
                "url": "git+https://github.com/owner/repo.git",
                "directory": "packages/a"
            })
        );
        assert_eq!(pkg.bugs.url.as_deref(), Some("https://github.com/owner/repo/issues"));
        assert_eq!(pkg.homepage.as_deref(), Some("https://github.com/owner/repo#readme"));
        assert_eq!(pkg.additional_properties.get("custom").unwrap(), &json!(1));
        assert_eq!(pkg.file_name(), Some(pkg_dir.join("package.json").as_path()));
        assert!(!pkg.to_record().contains_key("scripts"));
    }

    #[tokio::test]
    async fn test_normalize_at_repo_root_has_no_directory() {
        let repo = tempdir().unwrap();
        let root = repo.path().canonicalize().unwrap();

        let mut pkg = Package::from_path_and_record(root.join("package.json"), &Map::new());
        let lookup = FakeLookup {
            root: Some(root.clone()),
            remote: Some("https://example.com/team/tool".to_string()),
            ..Default::default()
        };
        pkg.normalize(&lookup).await.unwrap();

        assert_eq!(
            pkg.repository,
            json!({"type": "git", "url": "git+https://example.com/team/tool.git"})
        );
    }

    #[tokio::test]
    async fn test_normalize_without_repo_root_skips_remote() {
        let dir = tempdir().unwrap();
        let record = json!({"name": "a", "homepage": "https://keep.me"});
        let mut pkg =
            Package::from_path_and_record(dir.path().join("package.json"), record.as_object().unwrap());

        let lookup = FakeLookup {
            remote: Some("git@github.com:owner/repo.git".to_string()),
            ..Default::default()
        };
        pkg.normalize(&lookup).await.unwrap();

        assert_eq!(lookup.calls(), vec!["readme", "root"]);
        assert_eq!(pkg.homepage.as_deref(), Some("https://keep.me"));
        assert_eq!(pkg.repository, Value::Null);
        assert_eq!(pkg.description, None);
    }

    #[tokio::test]
    async fn test_normalize_propagates_io_faults() {
        let dir = tempdir().unwrap();
        let mut pkg = Package::from_path_and_record(dir.path().join("package.json"), &Map::new());

        let err = pkg.normalize(&FailingLookup).await.unwrap_err();
        assert_eq!(err.code(), crate::error::codes::IO_ERROR);
    }

    #[tokio::test]
    async fn test_git_lookup_readme_prefers_markdown() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README"), "plain").unwrap();
        fs::write(dir.path().join("README.md"), "md").unwrap();
        fs::write(dir.path().join("index.js"), "").unwrap();

        let found = GitLookup::new().readme_file(dir.path()).await.unwrap();
        assert_eq!(found.as_deref(), Some("README.md"));

        let missing = GitLookup::new()
            .readme_file(&dir.path().join("nope"))
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_git_lookup_missing_program_is_not_found() {
        let dir = tempdir().unwrap();
        let lookup = GitLookup::new().with_program("pkgmeta-no-such-git-binary");

        assert_eq!(lookup.find_repo_root(dir.path()).await.unwrap(), None);
    }
}
