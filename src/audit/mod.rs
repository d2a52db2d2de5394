pub mod endpoint;
pub mod html;
pub mod image;
pub mod not_found;
pub mod page;
pub mod robots;
pub mod sitemap;

use serde::{Deserialize, Serialize};

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Whether a finding of this severity keeps its unit from passing.
    pub fn blocks_pass(self) -> bool {
        matches!(self, Severity::Critical | Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single rule violation or observation about one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Identifier of the unit this finding is about
    pub unit: String,
    pub severity: Severity,
    pub rule_id: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        unit: impl Into<String>,
        severity: Severity,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            unit: unit.into(),
            severity,
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn critical(unit: &str, rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(unit, Severity::Critical, rule_id, message)
    }

    pub fn warning(unit: &str, rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(unit, Severity::Warning, rule_id, message)
    }

    pub fn info(unit: &str, rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(unit, Severity::Info, rule_id, message)
    }
}

/// Every finding produced for one unit, in rule order.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub identifier: String,
    /// Short human label for progress lines (route, URL, file name)
    pub label: String,
    pub findings: Vec<Finding>,
}

impl UnitOutcome {
    pub fn new(identifier: impl Into<String>, findings: Vec<Finding>) -> Self {
        let identifier = identifier.into();
        Self {
            label: identifier.clone(),
            identifier,
            findings,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// A unit passes iff it has no critical and no warning findings.
    pub fn passes(&self) -> bool {
        !self.findings.iter().any(|f| f.severity.blocks_pass())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

/// Shorthand for the common "emit a finding when a marker is missing" rule shape.
pub(crate) fn require(
    findings: &mut Vec<Finding>,
    present: bool,
    finding: impl FnOnce() -> Finding,
) {
    if !present {
        findings.push(finding());
    }
}
