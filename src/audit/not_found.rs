use super::Finding;
use crate::discovery::files::SOURCE_EXTENSIONS;
use crate::discovery::{Unit, UnitKind, first_existing};
use crate::pattern::has_marker;
use crate::site::SiteRoot;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NOT_FOUND_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot[\s-]+found\b|\b404\b").unwrap());

/// The dedicated `not-found.*` page, or an absent unit standing in for it.
pub fn discover(site: &SiteRoot, pages_root: &str) -> Unit {
    let candidates: Vec<PathBuf> = SOURCE_EXTENSIONS
        .iter()
        .map(|ext| Path::new(pages_root).join(format!("not-found.{}", ext)))
        .collect();
    first_existing(site, &candidates, UnitKind::Page)
}

pub fn check(unit: &Unit, site: &SiteRoot) -> Vec<Finding> {
    let id = unit.identifier.as_str();
    match unit.content() {
        None if site.exists(id) => vec![Finding::critical(
            id,
            "unreadable-not-found-page",
            format!("Could not read not-found page {}", id),
        )],
        None => vec![Finding::critical(
            id,
            "missing-not-found-page",
            "No custom not-found page",
        )],
        Some(content) if !has_marker(Some(content), &NOT_FOUND_MARKER) => vec![Finding::warning(
            id,
            "not-found-marker-missing",
            "Not-found page does not say the page was not found",
        )],
        Some(_) => Vec::new(),
    }
}
