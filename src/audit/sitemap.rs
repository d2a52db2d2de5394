use super::Finding;
use crate::pattern::{count_matches, extract_all, has_literal, has_marker};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static XML_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<\?xml\s+version=").unwrap());
static URLSET_ROOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<urlset[\s>]").unwrap());
static INDEX_ROOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<sitemapindex[\s>]").unwrap());
static LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<loc>\s*([^<\s]+)\s*</loc>").unwrap());

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SitemapIssue {
    MissingXmlDeclaration,
    MissingRoot,
    MissingNamespace,
    Empty,
    ForeignDomain,
}

impl SitemapIssue {
    pub fn deduction(self) -> u32 {
        match self {
            SitemapIssue::MissingXmlDeclaration => 20,
            SitemapIssue::MissingRoot => 30,
            SitemapIssue::MissingNamespace => 10,
            SitemapIssue::Empty => 20,
            SitemapIssue::ForeignDomain => 20,
        }
    }

    pub fn to_finding(self, unit: &str) -> Finding {
        match self {
            SitemapIssue::MissingXmlDeclaration => Finding::warning(
                unit,
                "sitemap-missing-xml-declaration",
                "Sitemap has no XML declaration",
            ),
            SitemapIssue::MissingRoot => Finding::critical(
                unit,
                "sitemap-missing-root",
                "Sitemap has no <urlset> or <sitemapindex> root",
            ),
            SitemapIssue::MissingNamespace => Finding::warning(
                unit,
                "sitemap-missing-namespace",
                "Sitemap does not declare the sitemaps.org namespace",
            ),
            SitemapIssue::Empty => {
                Finding::critical(unit, "sitemap-empty", "Sitemap lists no <loc> entries")
            }
            SitemapIssue::ForeignDomain => Finding::warning(
                unit,
                "sitemap-foreign-domain",
                "Sitemap lists URLs outside the site domain",
            ),
        }
    }
}

/// Structural validation result for a sitemap or sitemap index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapCheck {
    pub valid: bool,
    pub url_count: usize,
    pub is_index: bool,
    pub quality_score: u32,
    pub issues: Vec<SitemapIssue>,
}

impl SitemapCheck {
    pub fn findings(&self, unit: &str) -> Vec<Finding> {
        self.issues.iter().map(|i| i.to_finding(unit)).collect()
    }
}

pub fn validate_sitemap(content: Option<&str>, domain: &str) -> SitemapCheck {
    let mut issues = Vec::new();

    if !has_marker(content, &XML_DECLARATION) {
        issues.push(SitemapIssue::MissingXmlDeclaration);
    }

    let is_index = has_marker(content, &INDEX_ROOT);
    if !is_index && !has_marker(content, &URLSET_ROOT) {
        issues.push(SitemapIssue::MissingRoot);
    }

    if !has_literal(content, SITEMAP_NAMESPACE) {
        issues.push(SitemapIssue::MissingNamespace);
    }

    let locs: Vec<&str> = extract_all(content, &LOC).iter().collect();
    if locs.is_empty() {
        issues.push(SitemapIssue::Empty);
    } else if locs.iter().any(|url| !url.contains(domain)) {
        issues.push(SitemapIssue::ForeignDomain);
    }

    let deducted: u32 = issues.iter().map(|i| i.deduction()).sum();
    SitemapCheck {
        valid: issues.is_empty(),
        url_count: count_matches(content, &LOC),
        is_index,
        quality_score: 100u32.saturating_sub(deducted),
        issues,
    }
}
