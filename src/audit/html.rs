use super::{Finding, require};
use crate::discovery::Unit;
use crate::pattern::has_marker;
use regex::Regex;
use std::sync::LazyLock;

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>\s*\S.*?</title>").unwrap());
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name\s*=\s*["']description["'][^>]*content\s*=\s*["'][^"']+"#)
        .unwrap()
});
static CANONICAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link[^>]+rel\s*=\s*["']canonical["']"#).unwrap());
static OG_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta[^>]+property\s*=\s*["']og:title["']"#).unwrap());
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h1[\s>]").unwrap());
static HTML_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<html[^>]+lang\s*=\s*["'][\w-]+["']"#).unwrap());

pub fn has_title_tag(content: Option<&str>) -> bool {
    has_marker(content, &TITLE_TAG)
}

/// Rules for one file of the static build output.
pub fn check(unit: &Unit) -> Vec<Finding> {
    let id = unit.identifier.as_str();
    let content = unit.content();
    let mut findings = Vec::new();

    require(&mut findings, has_title_tag(content), || {
        Finding::critical(id, "missing-title-tag", "No <title>")
    });
    require(&mut findings, has_marker(content, &META_DESCRIPTION), || {
        Finding::critical(id, "missing-meta-description", "No meta description")
    });
    require(&mut findings, has_marker(content, &CANONICAL_LINK), || {
        Finding::warning(id, "missing-canonical-link", "No canonical link")
    });
    require(&mut findings, has_marker(content, &OG_TITLE), || {
        Finding::warning(id, "missing-og-title", "No og:title")
    });
    require(&mut findings, has_marker(content, &H1), || {
        Finding::warning(id, "missing-h1", "No <h1>")
    });
    require(&mut findings, has_marker(content, &HTML_LANG), || {
        Finding::info(id, "missing-lang", "No lang attribute on <html>")
    });

    findings
}
