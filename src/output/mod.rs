use crate::audit::{Finding, Severity, UnitOutcome};
use crate::report::{RunReport, Tool};
use crate::score::{EndpointHealth, Verdict};
use colored::Colorize;

/// Findings shown per severity on the console; the JSON report keeps all of them.
pub const DISPLAY_LIMIT: usize = 10;

const DIVIDER_W: usize = 64;

pub fn print_header(tool: Tool, timestamp: &str) {
    let title = tool.title();
    let fill = DIVIDER_W.saturating_sub(4 + title.len());
    println!("╭─ {} {}╮", title.bold(), "─".repeat(fill));
    let padded = format!("{:<w$}", timestamp, w = DIVIDER_W - 3);
    println!("│ {} │", padded.dimmed());
    println!("╰{}╯", "─".repeat(DIVIDER_W - 1));
}

/// One progress line per evaluated unit.
pub fn print_unit(outcome: &UnitOutcome) {
    if outcome.passes() {
        println!("  {} {}", "✓".green(), outcome.label);
        return;
    }
    let critical = outcome.count(Severity::Critical);
    let warning = outcome.count(Severity::Warning);
    let mut parts = Vec::new();
    if critical > 0 {
        parts.push(format!("{} critical", critical));
    }
    if warning > 0 {
        parts.push(format!("{} warning", warning));
    }
    let mark = if critical > 0 { "✗".red() } else { "!".yellow() };
    println!("  {} {} {}", mark, outcome.label, format!("({})", parts.join(", ")).dimmed());
}

/// Lines for one severity bucket, capped at `limit` with a trailing "...and N more".
pub fn capped_lines(findings: &[Finding], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = findings
        .iter()
        .take(limit)
        .map(|f| format!("{} ({})", f.message, f.unit))
        .collect();
    if findings.len() > limit {
        lines.push(format!("...and {} more", findings.len() - limit));
    }
    lines
}

fn label(text: &str) -> colored::ColoredString {
    format!("{:<16}", text).dimmed()
}

fn pct(part: usize, whole: usize) -> String {
    format!("{}%", crate::score::percent(part, whole))
}

/// Summary block, severity-grouped findings, and the verdict line.
pub fn print_summary(report: &RunReport) {
    let s = &report.summary;
    println!();
    let title = "Summary";
    println!("── {} {}", title.bold(), "─".repeat(DIVIDER_W.saturating_sub(4 + title.len())));
    println!("  {} {}", label("Units"), s.total_units);
    println!(
        "  {} {} ({})",
        label("Passing"),
        s.passing_units,
        pct(s.passing_units, s.total_units)
    );
    println!(
        "  {} {} ({})",
        label("Failing"),
        s.failing_units,
        pct(s.failing_units, s.total_units)
    );
    println!(
        "  {} {} critical · {} warning · {} info",
        label("Findings"),
        s.critical,
        s.warning,
        s.info
    );

    for severity in [Severity::Critical, Severity::Warning, Severity::Info] {
        let findings = report.details.get(severity);
        if findings.is_empty() {
            continue;
        }
        println!();
        let heading = match severity {
            Severity::Critical => format!("CRITICAL ({})", findings.len()).red().bold(),
            Severity::Warning => format!("WARNING ({})", findings.len()).yellow().bold(),
            Severity::Info => format!("INFO ({})", findings.len()).blue().bold(),
        };
        println!("  {}", heading);
        for line in capped_lines(findings, DISPLAY_LIMIT) {
            println!("    {}", line);
        }
    }
}

pub fn print_endpoint_health(health: &EndpointHealth) {
    println!();
    println!(
        "  {} {}/{} ({}%)",
        label("Endpoints"),
        health.successful,
        health.total,
        health.overall
    );
    println!(
        "  {} {}/{} ({}%)",
        label("Critical"),
        health.critical_successful,
        health.critical_total,
        health.critical
    );
}

pub fn print_blend(local: u32, remote: Option<u32>, blended: u32) {
    println!();
    println!("  {} {}", label("Local score"), local);
    match remote {
        Some(r) => println!("  {} {}", label("Remote score"), r),
        None => println!(
            "  {} {}",
            label("Remote score"),
            "unreachable (local only)".yellow()
        ),
    }
    println!("  {} {}", label("Blended"), blended);
}

pub fn print_verdict(score: u32, verdict: Verdict, passed: bool) {
    println!("{}", "─".repeat(DIVIDER_W));
    let line = format!("Score: {}/100 · {}", score, verdict);
    let line = match verdict {
        Verdict::Excellent | Verdict::Good => line.green().bold(),
        Verdict::Fair | Verdict::NeedsImprovement | Verdict::NeedsWork => line.yellow().bold(),
        Verdict::Critical | Verdict::NoData => line.red().bold(),
    };
    println!("  {}", line);
    if passed {
        println!("  {}", "PASS".green().bold());
    } else {
        println!("  {}", "FAIL".red().bold());
    }
}

pub fn print_report_path(path: &std::path::Path) {
    println!("  Report written to {}", path.display().to_string().cyan());
}
