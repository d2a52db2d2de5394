use super::{Finding, require};
use crate::discovery::Unit;
use crate::pattern::has_marker;
use regex::Regex;
use std::sync::LazyLock;

static METADATA_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:const\s+metadata\b|(?:async\s+)?function\s+generateMetadata\b)")
        .unwrap()
});
static TITLE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\btitle\s*:\s*["'`]"#).unwrap());
static DESCRIPTION_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdescription\s*:\s*["'`]"#).unwrap());
static CANONICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcanonical\s*:").unwrap());
static OPEN_GRAPH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bopenGraph\s*:").unwrap());

pub fn has_metadata_block(content: Option<&str>) -> bool {
    has_marker(content, &METADATA_EXPORT)
}

pub fn has_title(content: Option<&str>) -> bool {
    has_marker(content, &TITLE_LITERAL)
}

pub fn has_description(content: Option<&str>) -> bool {
    has_marker(content, &DESCRIPTION_LITERAL)
}

pub fn has_canonical(content: Option<&str>) -> bool {
    has_marker(content, &CANONICAL)
}

pub fn has_open_graph(content: Option<&str>) -> bool {
    has_marker(content, &OPEN_GRAPH)
}

/// Metadata rules for a route file. `route` only feeds the messages.
pub fn check(unit: &Unit, route: &str) -> Vec<Finding> {
    let id = unit.identifier.as_str();
    let content = unit.content();
    let mut findings = Vec::new();

    require(&mut findings, has_metadata_block(content), || {
        Finding::critical(id, "missing-metadata", format!("{}: no metadata export", route))
    });
    require(&mut findings, has_title(content), || {
        Finding::critical(id, "missing-title", format!("{}: no title", route))
    });
    require(&mut findings, has_description(content), || {
        Finding::critical(id, "missing-description", format!("{}: no description", route))
    });
    require(&mut findings, has_canonical(content), || {
        Finding::warning(id, "missing-canonical", format!("{}: no canonical URL", route))
    });
    require(&mut findings, has_open_graph(content), || {
        Finding::warning(
            id,
            "missing-open-graph",
            format!("{}: no OpenGraph metadata", route),
        )
    });

    findings
}
