//! Per-tool orchestration: discovery, evaluation, aggregation, reporting.

pub mod crawl;
pub mod images;
pub mod performance;
pub mod seo_qa;

use crate::config::AuditConfig;
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Whether a run cleared its tool's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn from_pass(passed: bool) -> Self {
        if passed { Outcome::Pass } else { Outcome::Fail }
    }

    /// Process exit code: 0 pass, 1 threshold not met.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
        }
    }
}

/// Report file location under `paths.reports`, relative to the site root.
pub fn report_path(config: &AuditConfig, file: &str) -> PathBuf {
    PathBuf::from(&config.paths.reports).join(file)
}

/// Print the persisted document on stdout for `--json`.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
