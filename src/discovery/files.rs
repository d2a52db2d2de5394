//! Recursive, deterministic file enumeration.

use crate::site::SiteRoot;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory walker rooted in a `SiteRoot`, skipping excluded directory names.
#[derive(Debug, Clone)]
pub struct TreeWalker<'a> {
    site: &'a SiteRoot,
    exclude: &'a [String],
}

impl<'a> TreeWalker<'a> {
    pub fn new(site: &'a SiteRoot, exclude: &'a [String]) -> Self {
        Self { site, exclude }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.exclude.iter().any(|x| x == name))
    }

    /// Files under `relative` accepted by `select`, as paths relative to the site root,
    /// in file-name order. A missing directory yields nothing.
    pub fn files(&self, relative: &str, select: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
        let base = self.site.path(relative);
        if !base.is_dir() {
            log::debug!("skipping missing directory {}", base.display());
            return Vec::new();
        }

        WalkDir::new(&base)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let excluded = self.is_excluded(e);
                if excluded {
                    log::debug!("excluded {}", e.path().display());
                }
                !excluded
            })
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("walk error under {}: {}", base.display(), err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| select(e.path()))
            .map(|e| {
                e.path()
                    .strip_prefix(self.site.root())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| e.path().to_path_buf())
            })
            .collect()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether the file's extension (case-insensitive) is one of `exts`.
pub fn has_extension(path: &Path, exts: &[&str]) -> bool {
    extension(path).is_some_and(|ext| exts.contains(&ext.as_str()))
}

pub const SOURCE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];
pub const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const AUDIT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];
pub const ALL_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif", "svg"];

/// `page.tsx`, `page.js`, ...
pub fn is_page_file(path: &Path) -> bool {
    path.file_stem().and_then(|s| s.to_str()) == Some("page")
        && has_extension(path, SOURCE_EXTENSIONS)
}

/// `sitemap.xml`, `sitemap-0.xml`, `sitemap_index.xml`, ...
pub fn is_sitemap_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("sitemap") && n.ends_with(".xml"))
}

pub fn is_html_file(path: &Path) -> bool {
    has_extension(path, &["html", "htm"])
}

/// Sibling path with the extension replaced by `.webp`.
pub fn webp_sibling(path: &Path) -> PathBuf {
    path.with_extension("webp")
}
