//! Live crawlability monitor over the endpoint table.

use super::{Outcome, print_json, report_path};
use crate::audit::endpoint::{self, EndpointResult};
use crate::audit::UnitOutcome;
use crate::config::AuditConfig;
use crate::discovery::network::{EndpointCategory, Fetcher, fetch_endpoint};
use crate::error::Result;
use crate::output;
use crate::report::{self, Aggregator, RunReport, Tool, timestamp_now};
use crate::score::{CRAWL_PASS, CRAWL_SCALE, EndpointHealth};
use crate::site::SiteRoot;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// An endpoint that failed its checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub url: String,
    pub category: EndpointCategory,
    pub critical: bool,
    pub status: u16,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    #[serde(flatten)]
    pub run: RunReport,
    pub endpoint_health: EndpointHealth,
    pub endpoints: Vec<EndpointResult>,
    pub alerts: Vec<Alert>,
}

impl CrawlReport {
    pub fn passes(&self) -> bool {
        self.run.summary.score >= CRAWL_PASS
    }
}

/// `crawlability-report-2026-01-31.json`
pub fn report_file(date: chrono::NaiveDate) -> String {
    format!("crawlability-report-{}.json", date.format("%Y-%m-%d"))
}

/// The score alerting is based on: critical-endpoint health, or overall
/// health when the table has no critical endpoint.
pub fn alert_score(health: &EndpointHealth) -> u32 {
    if health.critical_total > 0 {
        health.critical
    } else {
        health.overall
    }
}

fn alert_for(result: &EndpointResult, outcome: &UnitOutcome) -> Alert {
    let reason = match &result.error {
        Some(error) => error.clone(),
        None => outcome
            .findings
            .iter()
            .find(|f| f.severity.blocks_pass())
            .map(|f| f.message.clone())
            .unwrap_or_default(),
    };
    Alert {
        url: result.url.clone(),
        category: result.category,
        critical: result.critical,
        status: result.status,
        reason,
    }
}

/// Fetch and evaluate every endpoint in table order.
pub fn audit(
    config: &AuditConfig,
    fetcher: &dyn Fetcher,
    mut on_unit: impl FnMut(&UnitOutcome),
) -> CrawlReport {
    let mut agg = Aggregator::new();
    let mut endpoints = Vec::new();
    let mut alerts = Vec::new();

    for ep in config.endpoint_table() {
        let fetched = fetch_endpoint(fetcher, &ep);
        let (result, outcome) = endpoint::evaluate(
            &fetched,
            &config.site.domain,
            &config.robots.required_disallow,
        );
        on_unit(&outcome);
        agg.record(&outcome);
        if !result.success {
            alerts.push(alert_for(&result, &outcome));
        }
        endpoints.push(result);
    }

    let health = EndpointHealth::from_results(endpoints.iter().map(|r| (r.critical, r.success)));
    let run = agg.finish_with_score(Tool::Crawl, alert_score(&health), &CRAWL_SCALE);
    CrawlReport {
        run,
        endpoint_health: health,
        endpoints,
        alerts,
    }
}

/// One full crawl: fetch, report, persist. Exit 1 when the alert score is below 80.
pub fn run(
    site: &SiteRoot,
    config: &AuditConfig,
    fetcher: &dyn Fetcher,
    json: bool,
) -> Result<Outcome> {
    if !json {
        output::print_header(Tool::Crawl, &timestamp_now());
    }
    let crawl = audit(config, fetcher, |o| {
        if !json {
            output::print_unit(o)
        }
    });
    let file = report_file(chrono::Utc::now().date_naive());
    let path = report::save_json(site, report_path(config, &file), &crawl)?;
    let passed = crawl.passes();

    if json {
        print_json(&crawl)?;
    } else {
        output::print_summary(&crawl.run);
        output::print_endpoint_health(&crawl.endpoint_health);
        if !crawl.alerts.is_empty() {
            println!();
            println!("  {}", format!("ALERTS ({})", crawl.alerts.len()).red().bold());
            for alert in &crawl.alerts {
                let mark = if alert.critical { "✗".red() } else { "!".yellow() };
                println!("    {} {} {}", mark, alert.url, alert.reason.dimmed());
            }
        }
        output::print_verdict(crawl.run.summary.score, crawl.run.summary.verdict, passed);
        output::print_report_path(&path);
    }
    Ok(Outcome::from_pass(passed))
}

/// Re-run the crawl every `interval` until `shutdown` is set. Each iteration
/// builds a fresh report; only a fatal error ends the loop early.
/// Floor for the monitoring interval; zero would re-crawl the live site in a tight loop.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub fn run_continuous(
    site: &SiteRoot,
    config: &AuditConfig,
    fetcher: &dyn Fetcher,
    json: bool,
    interval: Duration,
    shutdown: &AtomicBool,
) -> Result<Outcome> {
    let interval = interval.max(MIN_INTERVAL);
    if !json {
        println!(
            "{}",
            format!(
                "Monitoring every {}s. Press Ctrl+C to stop.",
                interval.as_secs()
            )
            .dimmed()
        );
    }

    while !shutdown.load(Ordering::SeqCst) {
        let outcome = run(site, config, fetcher, json)?;
        log::info!("crawl iteration finished: {:?}", outcome);

        let mut waited = Duration::ZERO;
        while waited < interval && !shutdown.load(Ordering::SeqCst) {
            let slice = (interval - waited).min(Duration::from_secs(1));
            std::thread::sleep(slice);
            waited += slice;
        }
    }

    if !json {
        println!("{}", "Monitoring stopped.".dimmed());
    }
    Ok(Outcome::Pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::network::FetchOutcome;
    use crate::discovery::network::stub::StubFetcher;
    use chrono::Utc;
    use std::cell::Cell;

    const ROBOTS: &str = "User-agent: *\nDisallow: /api/\nDisallow: /admin/\nDisallow: /portal/\nSitemap: https://www.example.com/sitemap.xml\n";
    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.example.com/</loc></url>
</urlset>"#;

    fn healthy() -> StubFetcher {
        let mut fetcher = StubFetcher::default()
            .respond("https://www.example.com/robots.txt", 200, ROBOTS)
            .respond("https://www.example.com/sitemap.xml", 200, SITEMAP);
        for path in ["/", "/pricing", "/faq", "/blog", "/locations", "/conditions"] {
            fetcher = fetcher.respond(
                &format!("https://www.example.com{}", path),
                200,
                "<html><head><title>Clinic</title></head></html>",
            );
        }
        fetcher
    }

    #[test]
    fn test_healthy_site_passes() {
        let crawl = audit(&AuditConfig::default(), &healthy(), |_| {});
        assert_eq!(crawl.endpoints.len(), 8);
        assert_eq!(crawl.endpoint_health.critical, 100);
        assert!(crawl.alerts.is_empty());
        assert!(crawl.passes());
    }

    #[test]
    fn test_critical_failure_alerts() {
        let fetcher = healthy().fail("https://www.example.com/sitemap.xml", "timed out after 10s");
        let crawl = audit(&AuditConfig::default(), &fetcher, |_| {});

        assert_eq!(crawl.endpoint_health.critical_total, 3);
        assert_eq!(crawl.endpoint_health.critical, 67);
        assert_eq!(crawl.run.summary.score, 67);
        assert!(!crawl.passes());
        assert_eq!(crawl.alerts.len(), 1);
        assert_eq!(crawl.alerts[0].status, 0);
        assert_eq!(crawl.alerts[0].reason, "timed out after 10s");
    }

    #[test]
    fn test_optional_failure_does_not_fail_run() {
        let fetcher = healthy().respond("https://www.example.com/blog", 404, "<title>Not found</title>");
        let crawl = audit(&AuditConfig::default(), &fetcher, |_| {});
        assert_eq!(crawl.endpoint_health.overall, 88);
        assert!(crawl.passes());
        assert_eq!(crawl.alerts[0].url, "https://www.example.com/blog");
    }

    #[test]
    fn test_report_flattens_run() {
        let crawl = audit(&AuditConfig::default(), &healthy(), |_| {});
        let value = serde_json::to_value(&crawl).unwrap();
        assert_eq!(value["tool"], "crawl");
        assert!(value["summary"]["score"].is_number());
        assert!(value["endpoint_health"]["critical"].is_number());
        assert_eq!(value["endpoints"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_report_file_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(report_file(date), "crawlability-report-2026-03-09.json");
    }

    #[test]
    fn test_alert_score_falls_back_to_overall() {
        let health = EndpointHealth::from_results([(false, true), (false, false)]);
        assert_eq!(alert_score(&health), 50);
    }

    #[test]
    fn test_continuous_stops_when_flag_is_set() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteRoot::new(tmp.path());
        let shutdown = AtomicBool::new(true);
        let outcome = run_continuous(
            &site,
            &AuditConfig::default(),
            &healthy(),
            true,
            Duration::from_secs(300),
            &shutdown,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Pass);
        assert!(!tmp.path().join(report_file(Utc::now().date_naive())).exists());
    }

    /// Counts fetches and raises the shutdown flag once `limit` have been served.
    struct StopAfter<'a> {
        inner: StubFetcher,
        fetches: Cell<usize>,
        limit: usize,
        shutdown: &'a AtomicBool,
    }

    impl Fetcher for StopAfter<'_> {
        fn fetch(&self, url: &str) -> FetchOutcome {
            let n = self.fetches.get() + 1;
            self.fetches.set(n);
            if n >= self.limit {
                self.shutdown.store(true, Ordering::SeqCst);
            }
            self.inner.fetch(url)
        }
    }

    #[test]
    fn test_continuous_runs_until_signalled() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteRoot::new(tmp.path());
        let config = AuditConfig::default();
        let shutdown = AtomicBool::new(false);
        let fetcher = StopAfter {
            inner: healthy(),
            fetches: Cell::new(0),
            limit: config.endpoint_table().len(),
            shutdown: &shutdown,
        };

        let outcome = run_continuous(
            &site,
            &config,
            &fetcher,
            true,
            Duration::from_millis(20),
            &shutdown,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Pass);
        // one full pass over the table, then the flag stops the loop
        assert_eq!(fetcher.fetches.get(), 8);
        let saved: CrawlReport =
            report::load_json(&tmp.path().join(report_file(Utc::now().date_naive()))).unwrap();
        assert!(saved.passes());
    }

    #[test]
    fn test_zero_interval_is_raised_to_floor() {
        let tmp = tempfile::tempdir().unwrap();
        let site = SiteRoot::new(tmp.path());
        let config = AuditConfig::default();
        let shutdown = AtomicBool::new(false);
        let fetcher = StopAfter {
            inner: healthy(),
            fetches: Cell::new(0),
            // stop during the second pass, after one full sleep
            limit: 2 * config.endpoint_table().len(),
            shutdown: &shutdown,
        };

        let start = std::time::Instant::now();
        run_continuous(&site, &config, &fetcher, true, Duration::ZERO, &shutdown).unwrap();
        assert_eq!(fetcher.fetches.get(), 16);
        assert!(start.elapsed() >= MIN_INTERVAL);
    }
}
