use super::Finding;
use crate::discovery::files::{RASTER_EXTENSIONS, has_extension, webp_sibling};
use crate::discovery::{Unit, UnitKind};
use crate::pattern::{extract_all, has_literal, has_marker};
use crate::site::SiteRoot;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RASTER_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["'(`]([^"'()`\s]+\.(?:png|jpe?g))(?:\?[^"'()`\s]*)?["')`]"#).unwrap()
});
static ANY_IMAGE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["'(`]([^"'()`\s]+\.(?:png|jpe?g|webp|avif|gif|svg))(?:\?[^"'()`\s]*)?["')`]"#)
        .unwrap()
});
static HERO_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["'(`][^"'()`\s]*hero[^"'()`\s]*\.(?:png|jpe?g|webp|avif)"#).unwrap()
});
// `priority` only counts as an attribute inside an open tag, never in text
static PRELOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<[A-Za-z][^<>]*?\spriority(?:\s*=\s*\{\s*true\s*\})?(?:\s|/|>)|rel\s*=\s*["']preload["']|fetchPriority\s*=\s*["']high["']"#,
    )
    .unwrap()
});

/// Raster image references in source content, deduplicated, in order of appearance.
pub fn raster_references(content: Option<&str>) -> Vec<&str> {
    let mut refs: Vec<&str> = Vec::new();
    for r in extract_all(content, &RASTER_REF).iter() {
        if !is_remote(r) && !refs.contains(&r) {
            refs.push(r);
        }
    }
    refs
}

/// Whether the content references any image at all.
pub fn is_image_bearing(content: Option<&str>) -> bool {
    !extract_all(content, &ANY_IMAGE_REF).is_empty()
}

pub fn has_hero_image(content: Option<&str>) -> bool {
    has_marker(content, &HERO_REF)
}

pub fn has_preload(content: Option<&str>) -> bool {
    has_marker(content, &PRELOAD)
}

/// `/img/team.jpg` -> `/img/team.webp`
fn with_webp_extension(reference: &str) -> String {
    match reference.rfind('.') {
        Some(dot) => format!("{}.webp", &reference[..dot]),
        None => format!("{}.webp", reference),
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://") || reference.starts_with("//")
}

/// WebP rules for a component that references images served from `public_root`.
pub fn check_component(unit: &Unit, site: &SiteRoot, public_root: &str) -> Vec<Finding> {
    let id = unit.identifier.as_str();
    let Some(content) = unit.content() else {
        return vec![Finding::warning(
            id,
            "unreadable-source",
            format!("Could not read {}", id),
        )];
    };

    let mut findings = Vec::new();

    for reference in raster_references(Some(content)) {
        let relative = reference.trim_start_matches('/');
        let on_disk = Path::new(public_root).join(relative);
        let sibling = webp_sibling(&on_disk);
        let original_exists = site.exists(&on_disk);
        let sibling_exists = site.exists(&sibling);

        if original_exists && !sibling_exists {
            findings.push(Finding::warning(
                id,
                "missing-webp-variant",
                format!("Image not optimized: {}", relative),
            ));
        } else if sibling_exists && !has_literal(Some(content), &with_webp_extension(reference)) {
            findings.push(Finding::info(
                id,
                "webp-not-used",
                format!("Consider using WebP: {}", with_webp_extension(relative)),
            ));
        }
    }

    if has_hero_image(Some(content)) && !has_preload(Some(content)) {
        findings.push(Finding::warning(
            id,
            "hero-not-preloaded",
            format!("Hero image in {} is not preloaded (add priority)", id),
        ));
    }

    findings
}

/// Size and format rules for one file under the public root.
pub fn check_file(unit: &Unit, site: &SiteRoot, large_bytes: u64) -> Vec<Finding> {
    let id = unit.identifier.as_str();
    let bytes = match unit.kind {
        UnitKind::Image { bytes } => bytes,
        _ => None,
    };

    let Some(bytes) = bytes else {
        return vec![Finding::warning(
            id,
            "unreadable-image",
            format!("Could not read size of {}", id),
        )];
    };

    let mut findings = Vec::new();
    if bytes > large_bytes {
        findings.push(Finding::warning(
            id,
            "oversized-image",
            format!(
                "{} is {} KB (limit {} KB)",
                id,
                bytes / 1024,
                large_bytes / 1024
            ),
        ));
    }

    let path = Path::new(id);
    if has_extension(path, RASTER_EXTENSIONS) && !site.exists(webp_sibling(path)) {
        findings.push(Finding::info(
            id,
            "no-webp-sibling",
            format!("No WebP variant for {}", id),
        ));
    }

    findings
}
