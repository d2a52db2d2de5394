//! Pre-deploy SEO validation of sitemaps, robots and the static build.
//! Console only; nothing is written to disk.

use super::{Outcome, print_json};
use crate::audit::{UnitOutcome, html, robots, sitemap};
use crate::config::AuditConfig;
use crate::discovery::files::{is_html_file, is_sitemap_file};
use crate::discovery::{Unit, UnitKind, discover_documents, first_existing};
use crate::error::Result;
use crate::output;
use crate::report::{Aggregator, RunReport, Tool, timestamp_now};
use crate::score::{SEO_QA_PASS, SEO_QA_SCALE};
use crate::site::SiteRoot;
use std::path::{Path, PathBuf};

/// Sitemaps from the public root and the build output, deduplicated by file name
/// with the public copy first.
fn sitemaps(site: &SiteRoot, config: &AuditConfig) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    for root in [&config.paths.public, &config.paths.build_output] {
        for unit in discover_documents(site, config, root, is_sitemap_file) {
            let name = Path::new(&unit.identifier).file_name().map(|n| n.to_os_string());
            let seen = units
                .iter()
                .any(|u| Path::new(&u.identifier).file_name().map(|n| n.to_os_string()) == name);
            if !seen {
                units.push(unit);
            }
        }
    }
    if units.is_empty() {
        let missing = Path::new(&config.paths.public).join("sitemap.xml");
        units.push(first_existing(site, &[missing], UnitKind::Document));
    }
    units
}

fn robots_unit(site: &SiteRoot, config: &AuditConfig) -> Unit {
    let candidates: Vec<PathBuf> = [&config.paths.build_output, &config.paths.public]
        .iter()
        .map(|dir| Path::new(dir.as_str()).join("robots.txt"))
        .collect();
    first_existing(site, &candidates, UnitKind::Document)
}

/// Composite run over sitemaps, robots and every built HTML file.
pub fn audit(
    site: &SiteRoot,
    config: &AuditConfig,
    mut on_unit: impl FnMut(&UnitOutcome),
) -> Result<RunReport> {
    site.require_dir("build output", &config.paths.build_output)?;

    let mut agg = Aggregator::new();
    let mut record = |outcome: UnitOutcome| {
        on_unit(&outcome);
        agg.record(&outcome);
    };

    for unit in sitemaps(site, config) {
        let check = sitemap::validate_sitemap(unit.content(), &config.site.domain);
        let label = format!("{} ({} URLs)", unit.identifier, check.url_count);
        record(UnitOutcome::new(&unit.identifier, check.findings(&unit.identifier)).label(label));
    }

    let robots = robots_unit(site, config);
    let check = robots::validate_robots(
        robots.content(),
        &config.site.domain,
        &config.robots.required_disallow,
    );
    record(UnitOutcome::new(&robots.identifier, check.findings(&robots.identifier)));

    for unit in discover_documents(site, config, &config.paths.build_output, is_html_file) {
        record(UnitOutcome::new(&unit.identifier, html::check(&unit)));
    }

    Ok(agg.finish(Tool::SeoQa, &SEO_QA_SCALE))
}

/// Exit 0 iff the composite score is at least 95.
pub fn run(site: &SiteRoot, config: &AuditConfig, json: bool) -> Result<Outcome> {
    if !json {
        output::print_header(Tool::SeoQa, &timestamp_now());
    }
    let run = audit(site, config, |o| {
        if !json {
            output::print_unit(o)
        }
    })?;
    let passed = run.summary.score >= SEO_QA_PASS;

    if json {
        print_json(&run)?;
    } else {
        output::print_summary(&run);
        output::print_verdict(run.summary.score, run.summary.verdict, passed);
    }
    Ok(Outcome::from_pass(passed))
}
