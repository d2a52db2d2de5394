use super::{Finding, Severity, UnitOutcome, html, robots, sitemap};
use crate::discovery::network::{EndpointCategory, Fetched};
use crate::pattern::has_marker;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NOINDEX_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name\s*=\s*["'](?:robots|googlebot)["'][^>]*content\s*=\s*["'][^"']*noindex"#)
        .unwrap()
});
static NOT_FOUND_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot[\s-]+found\b|\b404\b").unwrap());

/// Per-category validation detail. Only the fields meaningful to a category exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EndpointDetail {
    Unreachable,
    Robots(robots::RobotsCheck),
    Sitemap(sitemap::SitemapCheck),
    Verification { has_content: bool },
    Page { has_title: bool, noindex: bool },
}

/// Outcome of one endpoint as persisted in crawl reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointResult {
    pub url: String,
    pub category: EndpointCategory,
    pub critical: bool,
    /// 0 when the endpoint could not be reached
    pub status: u16,
    pub success: bool,
    pub error: Option<String>,
    pub detail: EndpointDetail,
}

/// Severity for a failure that is fatal on critical endpoints.
fn gate(critical: bool) -> Severity {
    if critical {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

fn x_robots_noindex(fetched: &Fetched) -> bool {
    fetched
        .headers
        .get("x-robots-tag")
        .is_some_and(|v| v.to_ascii_lowercase().contains("noindex"))
}

/// Apply the category's rule table to a fetched endpoint.
pub fn evaluate(fetched: &Fetched, domain: &str, required_disallow: &[String]) -> (EndpointResult, UnitOutcome) {
    let endpoint = &fetched.endpoint;
    let id = endpoint.url.as_str();
    let status = fetched.status();
    let severity = gate(endpoint.critical);
    let mut findings = Vec::new();

    let detail = if let Some(error) = &fetched.error {
        findings.push(Finding::new(
            id,
            severity,
            "endpoint-unreachable",
            format!("{} unreachable: {}", id, error),
        ));
        EndpointDetail::Unreachable
    } else {
        if !(200..300).contains(&status) {
            findings.push(Finding::new(
                id,
                severity,
                "endpoint-bad-status",
                format!("{} returned HTTP {}", id, status),
            ));
        }

        let body = fetched.unit.content();
        match endpoint.category {
            EndpointCategory::Robots => {
                let check = robots::validate_robots(body, domain, required_disallow);
                findings.extend(check.findings(id));
                EndpointDetail::Robots(check)
            }
            EndpointCategory::Sitemap => {
                let check = sitemap::validate_sitemap(body, domain);
                findings.extend(check.findings(id));
                EndpointDetail::Sitemap(check)
            }
            EndpointCategory::Verification => {
                let has_content = body.is_some_and(|b| !b.trim().is_empty())
                    && !has_marker(body, &NOT_FOUND_BODY);
                if !has_content {
                    findings.push(Finding::warning(
                        id,
                        "verification-page-invalid",
                        format!("{} does not serve verification content", id),
                    ));
                }
                EndpointDetail::Verification { has_content }
            }
            EndpointCategory::Page => {
                let has_title = html::has_title_tag(body);
                let noindex = has_marker(body, &NOINDEX_META) || x_robots_noindex(fetched);
                if !has_title {
                    findings.push(Finding::warning(
                        id,
                        "missing-title-tag",
                        format!("{} has no <title>", id),
                    ));
                }
                if noindex {
                    findings.push(Finding::new(
                        id,
                        severity,
                        "noindex",
                        format!("{} is marked noindex", id),
                    ));
                }
                EndpointDetail::Page { has_title, noindex }
            }
        }
    };

    let outcome = UnitOutcome::new(id, findings).label(format!(
        "{} [{}{}]",
        id,
        endpoint.category,
        if endpoint.critical { ", critical" } else { "" }
    ));
    let result = EndpointResult {
        url: endpoint.url.clone(),
        category: endpoint.category,
        critical: endpoint.critical,
        status,
        success: outcome.passes(),
        error: fetched.error.clone(),
        detail,
    };
    (result, outcome)
}
