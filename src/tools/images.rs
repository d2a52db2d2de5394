//! Image optimization planner. Reads sizes from file metadata and writes a
//! Markdown plan; it never converts anything itself.

use super::{Outcome, print_json, report_path};
use crate::config::AuditConfig;
use crate::discovery::files::{ALL_IMAGE_EXTENSIONS, RASTER_EXTENSIONS, has_extension, webp_sibling};
use crate::discovery::{UnitKind, discover_images};
use crate::error::Result;
use crate::output;
use crate::report::markdown::{self, ImagePlan, PlannedImage, format_bytes};
use crate::report::{Tool, timestamp_now};
use crate::site::SiteRoot;
use colored::Colorize;
use std::path::Path;

pub const PLAN_FILE: &str = "IMAGE_OPTIMIZATION_PLAN.md";

/// Categorize every image under the public root.
pub fn build(site: &SiteRoot, config: &AuditConfig) -> Result<ImagePlan> {
    site.require_dir("public root", &config.paths.public)?;

    let large_threshold = config.images.large_bytes;
    let medium_threshold = config.images.medium_bytes;
    let mut plan = ImagePlan {
        generated: timestamp_now(),
        total_images: 0,
        total_bytes: 0,
        large_threshold,
        medium_threshold,
        large: Vec::new(),
        medium: Vec::new(),
        missing_webp: Vec::new(),
        already_webp: Vec::new(),
    };

    for unit in discover_images(site, config, ALL_IMAGE_EXTENSIONS) {
        let bytes = match unit.kind {
            UnitKind::Image { bytes: Some(b) } => b,
            _ => {
                log::warn!("could not read size of {}", unit.identifier);
                0
            }
        };
        let path = Path::new(&unit.identifier);
        let is_webp = has_extension(path, &["webp"]);
        let is_raster = has_extension(path, RASTER_EXTENSIONS);
        let image = PlannedImage {
            path: unit.identifier.clone(),
            bytes,
            has_webp: is_webp || (is_raster && site.exists(webp_sibling(path))),
        };

        plan.total_images += 1;
        plan.total_bytes += bytes;
        if bytes > large_threshold {
            plan.large.push(image.clone());
        } else if bytes > medium_threshold {
            plan.medium.push(image.clone());
        }
        if is_webp {
            plan.already_webp.push(image);
        } else if is_raster && !image.has_webp {
            plan.missing_webp.push(image);
        }
    }

    Ok(plan)
}

pub fn run(site: &SiteRoot, config: &AuditConfig, json: bool) -> Result<Outcome> {
    let plan = build(site, config)?;
    let path = site.write_atomic(report_path(config, PLAN_FILE), markdown::render(&plan).as_bytes())?;
    log::debug!("wrote {}", path.display());

    if json {
        print_json(&plan)?;
        return Ok(Outcome::Pass);
    }

    output::print_header(Tool::Images, &plan.generated);
    println!("  {} images, {}", plan.total_images, format_bytes(plan.total_bytes));
    println!(
        "  {} large · {} medium · {} missing WebP · {} already WebP",
        plan.large.len().to_string().red(),
        plan.medium.len().to_string().yellow(),
        plan.missing_webp.len().to_string().yellow(),
        plan.already_webp.len().to_string().green()
    );
    output::print_report_path(&path);
    Ok(Outcome::Pass)
}
