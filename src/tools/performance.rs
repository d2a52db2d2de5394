//! Page metadata and image audit over the source tree.

use super::{Outcome, print_json, report_path};
use crate::audit::{UnitOutcome, image, not_found, page};
use crate::config::AuditConfig;
use crate::discovery::files::AUDIT_IMAGE_EXTENSIONS;
use crate::discovery::{discover_components, discover_images, discover_pages};
use crate::error::Result;
use crate::output;
use crate::report::{self, Aggregator, RunReport, Tool, timestamp_now};
use crate::score::PERFORMANCE_SCALE;
use crate::site::SiteRoot;

pub const REPORT_FILE: &str = "performance-audit-report.json";

/// Evaluate pages, the not-found page, image-bearing components and public
/// images, in that order. `on_unit` sees every outcome as it is produced.
pub fn audit(
    site: &SiteRoot,
    config: &AuditConfig,
    mut on_unit: impl FnMut(&UnitOutcome),
) -> Result<RunReport> {
    site.require_dir("pages root", &config.paths.pages)?;

    let mut agg = Aggregator::new();
    let mut record = |outcome: UnitOutcome| {
        on_unit(&outcome);
        agg.record(&outcome);
    };

    for p in discover_pages(site, config) {
        let findings = page::check(&p.unit, &p.route);
        record(UnitOutcome::new(&p.unit.identifier, findings).label(p.route.clone()));
    }

    let nf = not_found::discover(site, &config.paths.pages);
    record(UnitOutcome::new(&nf.identifier, not_found::check(&nf, site)).label("not-found page"));

    // Unreadable sources stay in so the failure is reported.
    for unit in discover_components(site, config)
        .into_iter()
        .filter(|u| u.content.is_none() || image::is_image_bearing(u.content()))
    {
        let findings = image::check_component(&unit, site, &config.paths.public);
        record(UnitOutcome::new(&unit.identifier, findings));
    }

    for unit in discover_images(site, config, AUDIT_IMAGE_EXTENSIONS) {
        let findings = image::check_file(&unit, site, config.images.large_bytes);
        record(UnitOutcome::new(&unit.identifier, findings));
    }

    Ok(agg.finish(Tool::Performance, &PERFORMANCE_SCALE))
}

/// Exit 1 on any critical finding.
pub fn run(site: &SiteRoot, config: &AuditConfig, json: bool) -> Result<Outcome> {
    if !json {
        output::print_header(Tool::Performance, &timestamp_now());
    }
    let run = audit(site, config, |o| {
        if !json {
            output::print_unit(o)
        }
    })?;
    let path = report::save_json(site, report_path(config, REPORT_FILE), &run)?;
    let passed = !run.has_critical();

    if json {
        print_json(&run)?;
    } else {
        output::print_summary(&run);
        output::print_verdict(run.summary.score, run.summary.verdict, passed);
        output::print_report_path(&path);
    }
    Ok(Outcome::from_pass(passed))
}
