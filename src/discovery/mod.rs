pub mod files;
pub mod network;
pub mod routes;

use crate::config::AuditConfig;
use crate::site::SiteRoot;
use files::TreeWalker;
use std::path::{Path, PathBuf};

/// What a unit is, carrying only the data meaningful to that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Route file holding page metadata
    Page,
    /// Source file that references images
    Component,
    /// robots.txt, sitemap XML, built HTML
    Document,
    /// Binary asset; only the path and size matter
    Image { bytes: Option<u64> },
    /// Live URL; `status` is 0 when unreachable
    Endpoint { status: u16 },
}

/// One checkable artifact. Built fresh per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub identifier: String,
    pub kind: UnitKind,
    /// Absent when the file or endpoint could not be read.
    pub content: Option<String>,
}

impl Unit {
    /// Load a text unit; a read failure leaves `content` absent.
    pub fn load(site: &SiteRoot, relative: &Path, kind: UnitKind) -> Self {
        Self {
            identifier: path_id(relative),
            kind,
            content: site.read_optional(relative),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// `/`-separated identifier for a relative path.
pub fn path_id(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A page file together with its derived route.
#[derive(Debug, Clone)]
pub struct PageUnit {
    pub unit: Unit,
    pub route: String,
}

/// Every `page.*` file under the pages root.
pub fn discover_pages(site: &SiteRoot, config: &AuditConfig) -> Vec<PageUnit> {
    let walker = TreeWalker::new(site, &config.paths.exclude);
    let pages_root = Path::new(&config.paths.pages);
    walker
        .files(&config.paths.pages, files::is_page_file)
        .into_iter()
        .map(|rel| PageUnit {
            route: routes::route_for(pages_root, &rel),
            unit: Unit::load(site, &rel, UnitKind::Page),
        })
        .collect()
}

/// Component sources (`.tsx`/`.jsx`) under the components and pages roots,
/// excluding the route files themselves.
pub fn discover_components(site: &SiteRoot, config: &AuditConfig) -> Vec<Unit> {
    let walker = TreeWalker::new(site, &config.paths.exclude);
    let select = |p: &Path| {
        files::has_extension(p, files::COMPONENT_EXTENSIONS) && !files::is_page_file(p)
    };

    let mut seen: Vec<PathBuf> = Vec::new();
    for root in [&config.paths.components, &config.paths.pages] {
        for rel in walker.files(root, select) {
            if !seen.contains(&rel) {
                seen.push(rel);
            }
        }
    }

    seen.iter()
        .map(|rel| Unit::load(site, rel, UnitKind::Component))
        .collect()
}

/// Image files under the public root with one of `exts`.
pub fn discover_images(site: &SiteRoot, config: &AuditConfig, exts: &[&str]) -> Vec<Unit> {
    let walker = TreeWalker::new(site, &config.paths.exclude);
    walker
        .files(&config.paths.public, |p| files::has_extension(p, exts))
        .into_iter()
        .map(|rel| Unit {
            identifier: path_id(&rel),
            kind: UnitKind::Image {
                bytes: site.file_size(&rel),
            },
            content: None,
        })
        .collect()
}

/// Text documents under `relative` accepted by `select`.
pub fn discover_documents(
    site: &SiteRoot,
    config: &AuditConfig,
    relative: &str,
    select: impl Fn(&Path) -> bool,
) -> Vec<Unit> {
    TreeWalker::new(site, &config.paths.exclude)
        .files(relative, select)
        .into_iter()
        .map(|rel| Unit::load(site, &rel, UnitKind::Document))
        .collect()
}

/// First existing file among `candidates`; otherwise a unit for the first
/// candidate with absent content, so a missing file is still evaluated.
pub fn first_existing(site: &SiteRoot, candidates: &[PathBuf], kind: UnitKind) -> Unit {
    let found = candidates.iter().find(|c| site.exists(c));
    match found {
        Some(rel) => Unit::load(site, rel, kind),
        None => Unit {
            identifier: candidates.first().map(|c| path_id(c)).unwrap_or_default(),
            kind,
            content: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("src/app/faq")).unwrap();
        fs::create_dir_all(root.join("src/app/api/posts")).unwrap();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("public/images")).unwrap();
        fs::write(root.join("src/app/page.tsx"), "home").unwrap();
        fs::write(root.join("src/app/faq/page.tsx"), "faq").unwrap();
        fs::write(root.join("src/app/api/posts/page.tsx"), "api").unwrap();
        fs::write(root.join("src/app/layout.tsx"), "layout").unwrap();
        fs::write(root.join("src/components/Hero.tsx"), "hero").unwrap();
        fs::write(root.join("public/images/a.png"), [0u8; 16]).unwrap();
        fs::write(root.join("public/images/a.webp"), [0u8; 8]).unwrap();
        tmp
    }

    #[test]
    fn test_discover_pages_with_routes() {
        let tmp = fixture();
        let site = SiteRoot::new(tmp.path());
        let pages = discover_pages(&site, &AuditConfig::default());
        let routes: Vec<_> = pages.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(routes, vec!["/faq", "/"]);
        assert_eq!(pages[0].unit.identifier, "src/app/faq/page.tsx");
        assert_eq!(pages[0].unit.content(), Some("faq"));
    }

    #[test]
    fn test_discover_components_skips_pages() {
        let tmp = fixture();
        let site = SiteRoot::new(tmp.path());
        let units = discover_components(&site, &AuditConfig::default());
        let ids: Vec<_> = units.iter().map(|u| u.identifier.as_str()).collect();
        assert_eq!(ids, vec!["src/components/Hero.tsx", "src/app/layout.tsx"]);
    }

    #[test]
    fn test_discover_images_records_size() {
        let tmp = fixture();
        let site = SiteRoot::new(tmp.path());
        let images = discover_images(&site, &AuditConfig::default(), files::RASTER_EXTENSIONS);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].identifier, "public/images/a.png");
        assert_eq!(images[0].kind, UnitKind::Image { bytes: Some(16) });
        assert_eq!(images[0].content, None);
    }

    #[test]
    fn test_first_existing_missing_is_absent_unit() {
        let tmp = fixture();
        let site = SiteRoot::new(tmp.path());
        let unit = first_existing(
            &site,
            &[PathBuf::from("public/robots.txt"), PathBuf::from("src/app/robots.txt")],
            UnitKind::Document,
        );
        assert_eq!(unit.identifier, "public/robots.txt");
        assert_eq!(unit.content, None);
    }
}
