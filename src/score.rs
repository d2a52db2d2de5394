//! Score and verdict arithmetic.
//!
//! All percentages use integer half-up rounding so reports are reproducible
//! across platforms.

use serde::{Deserialize, Serialize};

/// Human-readable tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
    NeedsWork,
    Critical,
    /// Nothing was audited
    NoData,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Excellent => write!(f, "excellent"),
            Verdict::Good => write!(f, "good"),
            Verdict::Fair => write!(f, "fair"),
            Verdict::NeedsImprovement => write!(f, "needs improvement"),
            Verdict::NeedsWork => write!(f, "needs work"),
            Verdict::Critical => write!(f, "critical"),
            Verdict::NoData => write!(f, "no data"),
        }
    }
}

/// Score cutoffs for one tool. A score at or above a cutoff earns that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictScale {
    pub excellent: u32,
    pub good: u32,
    pub middle: u32,
    pub middle_verdict: Verdict,
    pub floor_verdict: Verdict,
}

/// performance: exits non-zero on any critical finding.
pub const PERFORMANCE_SCALE: VerdictScale = VerdictScale {
    excellent: 95,
    good: 80,
    middle: 60,
    middle_verdict: Verdict::Fair,
    floor_verdict: Verdict::NeedsWork,
};

/// crawl: exits non-zero when critical-endpoint health is below `CRAWL_PASS`.
pub const CRAWL_SCALE: VerdictScale = VerdictScale {
    excellent: 95,
    good: 80,
    middle: 60,
    middle_verdict: Verdict::NeedsImprovement,
    floor_verdict: Verdict::Critical,
};
pub const CRAWL_PASS: u32 = 80;

/// crawl-test: exits non-zero when the blended score is below `CRAWL_TEST_PASS`.
pub const CRAWL_TEST_SCALE: VerdictScale = VerdictScale {
    excellent: 95,
    good: 80,
    middle: 60,
    middle_verdict: Verdict::NeedsWork,
    floor_verdict: Verdict::Critical,
};
pub const CRAWL_TEST_PASS: u32 = 80;

/// seo-qa: exits non-zero when the composite score is below `SEO_QA_PASS`.
pub const SEO_QA_SCALE: VerdictScale = VerdictScale {
    excellent: 95,
    good: 80,
    middle: 60,
    middle_verdict: Verdict::NeedsImprovement,
    floor_verdict: Verdict::Critical,
};
pub const SEO_QA_PASS: u32 = 95;

/// Weight of local file validation in the crawl-test blend (tenths).
pub const LOCAL_WEIGHT_TENTHS: u32 = 7;

impl VerdictScale {
    /// Verdict for `score` out of `total` audited units; `total == 0` is `NoData`.
    pub fn verdict(&self, score: u32, total: usize) -> Verdict {
        if total == 0 {
            Verdict::NoData
        } else if score >= self.excellent {
            Verdict::Excellent
        } else if score >= self.good {
            Verdict::Good
        } else if score >= self.middle {
            self.middle_verdict
        } else {
            self.floor_verdict
        }
    }
}

/// `round(100 * part / whole)`, half-up; 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Share of passing units.
pub fn base_score(passing: usize, total: usize) -> u32 {
    percent(passing, total)
}

/// Health of a network run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointHealth {
    pub total: usize,
    pub successful: usize,
    pub critical_total: usize,
    pub critical_successful: usize,
    /// Share of all endpoints that succeeded
    pub overall: u32,
    /// Share of critical endpoints that succeeded; drives alerting
    pub critical: u32,
}

impl EndpointHealth {
    /// `(critical, success)` per endpoint, in any order.
    pub fn from_results(results: impl IntoIterator<Item = (bool, bool)>) -> Self {
        let (mut total, mut successful, mut critical_total, mut critical_successful) =
            (0, 0, 0, 0);
        for (critical, success) in results {
            total += 1;
            if success {
                successful += 1;
            }
            if critical {
                critical_total += 1;
                if success {
                    critical_successful += 1;
                }
            }
        }
        Self {
            total,
            successful,
            critical_total,
            critical_successful,
            overall: percent(successful, total),
            critical: percent(critical_successful, critical_total),
        }
    }
}

/// Weighted blend of the local and remote crawl-test scores.
/// With no reachable remote, the local score stands alone.
pub fn blend(local: u32, remote: Option<u32>) -> u32 {
    match remote {
        Some(remote) => {
            let weighted = LOCAL_WEIGHT_TENTHS * local + (10 - LOCAL_WEIGHT_TENTHS) * remote;
            (weighted + 5) / 10
        }
        None => local,
    }
}
