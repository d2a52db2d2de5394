use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Abstraction over the audited project tree.
/// Points at `--root` in production, redirectable to a temp directory for testing.
#[derive(Debug, Clone)]
pub struct SiteRoot {
    root: PathBuf,
}

impl SiteRoot {
    /// Create a SiteRoot pointing at a custom directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a path relative to this root.
    /// e.g., `path("public/robots.txt")` -> `./public/robots.txt` or `<test_root>/public/robots.txt`
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a text file, returning None if it doesn't exist or can't be read.
    /// Unreadable files are logged, not propagated: a missing unit is a finding, not a crash.
    pub fn read_optional(&self, relative: impl AsRef<Path>) -> Option<String> {
        let path = self.path(relative);
        match std::fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("unreadable file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Size in bytes of a file, None if its metadata can't be read.
    pub fn file_size(&self, relative: impl AsRef<Path>) -> Option<u64> {
        std::fs::metadata(self.path(relative)).ok().map(|m| m.len())
    }

    /// Check if a path exists relative to this root.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    /// Fail with `MissingRoot` unless `relative` is an existing directory.
    pub fn require_dir(&self, what: &str, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.path(relative);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(Error::MissingRoot {
                what: what.to_string(),
                path,
            })
        }
    }

    /// Replace a file atomically: write a sibling `.tmp` file, then rename it over the target.
    /// A failed run never leaves a truncated file behind.
    pub fn write_atomic(&self, relative: impl AsRef<Path>, contents: &[u8]) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, contents).map_err(|e| Error::Write {
            path: tmp.clone(),
            source: e,
        })?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::Write { path, source: e });
        }
        Ok(path)
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
