pub mod markdown;

use crate::audit::{Finding, Severity, UnitOutcome};
use crate::error::{Error, Result};
use crate::score::{self, Verdict, VerdictScale};
use crate::site::SiteRoot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which tool produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Performance,
    Crawl,
    CrawlTest,
    SeoQa,
    Images,
}

impl Tool {
    pub fn title(self) -> &'static str {
        match self {
            Tool::Performance => "Performance & SEO Audit",
            Tool::Crawl => "Crawlability Monitor",
            Tool::CrawlTest => "Crawlability Test",
            Tool::SeoQa => "SEO QA Validation",
            Tool::Images => "Image Optimization Plan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_units: usize,
    pub passing_units: usize,
    pub failing_units: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub score: u32,
    pub verdict: Verdict,
}

/// Every finding of a run, grouped by severity in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub critical: Vec<Finding>,
    pub warning: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl Details {
    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Critical => self.critical.push(finding),
            Severity::Warning => self.warning.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    pub fn get(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Warning => &self.warning,
            Severity::Info => &self.info,
        }
    }
}

/// The aggregate of one invocation. Written once, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: Tool,
    pub timestamp: String,
    pub summary: Summary,
    pub details: Details,
}

impl RunReport {
    pub fn has_critical(&self) -> bool {
        self.summary.critical > 0
    }
}

/// Accumulates unit outcomes for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    total: usize,
    passing: usize,
    details: Details,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &UnitOutcome) {
        self.total += 1;
        if outcome.passes() {
            self.passing += 1;
        }
        for finding in &outcome.findings {
            self.details.push(finding.clone());
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passing(&self) -> usize {
        self.passing
    }

    /// Share of passing units, the default run score.
    pub fn base_score(&self) -> u32 {
        score::base_score(self.passing, self.total)
    }

    /// Close the run with the pass-rate score.
    pub fn finish(self, tool: Tool, scale: &VerdictScale) -> RunReport {
        let score = self.base_score();
        self.finish_with_score(tool, score, scale)
    }

    /// Close the run with a tool-specific score.
    pub fn finish_with_score(self, tool: Tool, score: u32, scale: &VerdictScale) -> RunReport {
        let score = if self.total == 0 { 0 } else { score };
        RunReport {
            tool,
            timestamp: timestamp_now(),
            summary: Summary {
                total_units: self.total,
                passing_units: self.passing,
                failing_units: self.total - self.passing,
                critical: self.details.critical.len(),
                warning: self.details.warning.len(),
                info: self.details.info.len(),
                score,
                verdict: scale.verdict(score, self.total),
            },
            details: self.details,
        }
    }
}

pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Pretty-print a report and atomically replace `relative` with it.
pub fn save_json<T: Serialize>(site: &SiteRoot, relative: impl AsRef<Path>, report: &T) -> Result<PathBuf> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    let path = site.write_atomic(relative, json.as_bytes())?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&json)?)
}
