//! Markdown rendering of the image optimization plan.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedImage {
    pub path: String,
    pub bytes: u64,
    /// The image is WebP, or a `.webp` sibling exists next to it
    pub has_webp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePlan {
    pub generated: String,
    pub total_images: usize,
    pub total_bytes: u64,
    pub large_threshold: u64,
    pub medium_threshold: u64,
    /// Above `large_threshold`
    pub large: Vec<PlannedImage>,
    /// Above `medium_threshold`, at most `large_threshold`
    pub medium: Vec<PlannedImage>,
    /// Raster images with no `.webp` sibling
    pub missing_webp: Vec<PlannedImage>,
    pub already_webp: Vec<PlannedImage>,
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.0} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn table(out: &mut String, title: &str, images: &[PlannedImage]) {
    let _ = writeln!(out, "## {} ({})", title, images.len());
    let _ = writeln!(out);
    if images.is_empty() {
        let _ = writeln!(out, "_None._");
        let _ = writeln!(out);
        return;
    }
    let _ = writeln!(out, "| Image | Size | WebP variant |");
    let _ = writeln!(out, "|---|---:|:---:|");
    for img in images {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} |",
            img.path,
            format_bytes(img.bytes),
            if img.has_webp { "yes" } else { "no" }
        );
    }
    let _ = writeln!(out);
}

/// Shell-quote a path for the suggested commands.
fn quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}

pub fn render(plan: &ImagePlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Image Optimization Plan");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", plan.generated);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Images scanned: {}", plan.total_images);
    let _ = writeln!(out, "- Total size: {}", format_bytes(plan.total_bytes));
    let _ = writeln!(
        out,
        "- Large (> {}): {}",
        format_bytes(plan.large_threshold),
        plan.large.len()
    );
    let _ = writeln!(
        out,
        "- Medium (> {}): {}",
        format_bytes(plan.medium_threshold),
        plan.medium.len()
    );
    let _ = writeln!(out, "- Missing WebP variant: {}", plan.missing_webp.len());
    let _ = writeln!(out, "- Already WebP: {}", plan.already_webp.len());
    let _ = writeln!(out);

    table(&mut out, "Large images", &plan.large);
    table(&mut out, "Medium images", &plan.medium);
    table(&mut out, "Missing WebP variant", &plan.missing_webp);
    table(&mut out, "Already WebP", &plan.already_webp);

    let _ = writeln!(out, "## Suggested commands");
    let _ = writeln!(out);
    if plan.missing_webp.is_empty() {
        let _ = writeln!(out, "Every raster image already has a WebP variant.");
        return out;
    }
    let _ = writeln!(out, "```sh");
    for img in &plan.missing_webp {
        let target = match img.path.rfind('.') {
            Some(dot) => format!("{}.webp", &img.path[..dot]),
            None => format!("{}.webp", img.path),
        };
        let _ = writeln!(out, "cwebp -q 80 {} -o {}", quote(&img.path), quote(&target));
    }
    let _ = writeln!(out, "```");
    out
}
