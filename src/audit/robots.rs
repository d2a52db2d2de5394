use super::Finding;
use crate::pattern::{extract_all, has_marker};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static USER_AGENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*User-agent:\s*\S+").unwrap());
static SITEMAP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*Sitemap:\s*(\S+)").unwrap());
static DISALLOW_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*Disallow:[ \t]*(\S*)").unwrap());

/// One structural problem in a robots file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "path", rename_all = "kebab-case")]
pub enum RobotsIssue {
    MissingUserAgent,
    MissingSitemap,
    MissingDomain,
    MissingDisallow(String),
}

impl RobotsIssue {
    /// Points taken off the file's quality score.
    pub fn deduction(&self) -> u32 {
        match self {
            RobotsIssue::MissingUserAgent => 30,
            RobotsIssue::MissingSitemap => 30,
            RobotsIssue::MissingDomain => 20,
            RobotsIssue::MissingDisallow(_) => 10,
        }
    }

    pub fn to_finding(&self, unit: &str) -> Finding {
        match self {
            RobotsIssue::MissingUserAgent => Finding::critical(
                unit,
                "robots-missing-user-agent",
                "robots.txt has no User-agent directive",
            ),
            RobotsIssue::MissingSitemap => Finding::critical(
                unit,
                "robots-missing-sitemap",
                "robots.txt has no Sitemap directive",
            ),
            RobotsIssue::MissingDomain => Finding::warning(
                unit,
                "robots-missing-domain",
                "robots.txt does not reference the site domain",
            ),
            RobotsIssue::MissingDisallow(path) => Finding::warning(
                unit,
                "robots-missing-disallow",
                format!("robots.txt does not disallow {}", path),
            ),
        }
    }
}

/// Structural validation result for a robots file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsCheck {
    pub valid: bool,
    pub sitemap_count: usize,
    /// 0-100, local to this file
    pub quality_score: u32,
    pub issues: Vec<RobotsIssue>,
}

impl RobotsCheck {
    pub fn findings(&self, unit: &str) -> Vec<Finding> {
        self.issues.iter().map(|i| i.to_finding(unit)).collect()
    }
}

fn disallows(content: Option<&str>, required: &str) -> bool {
    extract_all(content, &DISALLOW_LINE)
        .iter()
        .any(|value| !value.is_empty() && required.starts_with(value))
}

pub fn validate_robots(
    content: Option<&str>,
    domain: &str,
    required_disallow: &[String],
) -> RobotsCheck {
    let mut issues = Vec::new();

    if !has_marker(content, &USER_AGENT) {
        issues.push(RobotsIssue::MissingUserAgent);
    }

    let sitemaps: Vec<&str> = extract_all(content, &SITEMAP_LINE).iter().collect();
    if sitemaps.is_empty() {
        issues.push(RobotsIssue::MissingSitemap);
    }

    let domain_present = content.is_some_and(|c| c.contains(domain))
        && sitemaps.iter().all(|url| url.contains(domain));
    if !domain_present {
        issues.push(RobotsIssue::MissingDomain);
    }

    for path in required_disallow {
        if !disallows(content, path) {
            issues.push(RobotsIssue::MissingDisallow(path.clone()));
        }
    }

    let deducted: u32 = issues.iter().map(RobotsIssue::deduction).sum();
    RobotsCheck {
        valid: issues.is_empty(),
        sitemap_count: sitemaps.len(),
        quality_score: 100u32.saturating_sub(deducted),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<String> {
        vec!["/api/".to_string(), "/admin/".to_string()]
    }

    const GOOD: &str = "\
User-agent: *
Allow: /
Disallow: /api/
Disallow: /admin

Sitemap: https://www.clinic.test/sitemap.xml
";

    #[test]
    fn test_valid_robots() {
        let check = validate_robots(Some(GOOD), "clinic.test", &required());
        assert!(check.valid);
        assert_eq!(check.sitemap_count, 1);
        assert_eq!(check.quality_score, 100);
        assert!(check.findings("public/robots.txt").is_empty());
    }

    #[test]
    fn test_wrong_domain_reports_one_domain_issue() {
        let content = "User-agent: *\nSitemap: https://other.test/sitemap.xml\nSitemap: https://other.test/sitemap-2.xml\n";
        let check = validate_robots(Some(content), "clinic.test", &required());
        assert!(!check.valid);
        assert_eq!(check.sitemap_count, 2);
        let findings = check.findings("robots");
        let domain: Vec<_> = findings
            .iter()
            .filter(|f| f.rule_id == "robots-missing-domain")
            .collect();
        assert_eq!(domain.len(), 1);

        let only_domain = validate_robots(Some(content), "clinic.test", &[]);
        assert_eq!(only_domain.issues, vec![RobotsIssue::MissingDomain]);
        assert_eq!(only_domain.quality_score, 80);
    }

    #[test]
    fn test_absent_robots_fails_everything() {
        let check = validate_robots(None, "clinic.test", &required());
        assert!(!check.valid);
        assert_eq!(check.sitemap_count, 0);
        assert_eq!(check.issues.len(), 5);
        assert_eq!(check.quality_score, 0);
    }

    #[test]
    fn test_disallow_prefix_and_root() {
        assert!(disallows(Some("Disallow: /api"), "/api/"));
        assert!(disallows(Some("Disallow: /"), "/portal/"));
        assert!(!disallows(Some("Disallow:"), "/api/"));
        assert!(!disallows(Some("Disallow: /blog"), "/api/"));
    }

    #[test]
    fn test_issue_serialization() {
        let json = serde_json::to_string(&RobotsIssue::MissingDisallow("/api/".into())).unwrap();
        assert_eq!(json, r#"{"issue":"missing-disallow","path":"/api/"}"#);
    }
}
