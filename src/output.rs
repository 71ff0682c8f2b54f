//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! paperpro 2160x1620 (2 images)
//!     001 my-photo-01 ← My Photo_01.png (800x600)
//!     002 sunset ← sunset.png (4000x3000)
//! rm2 1404x1872 (no source directory)
//! Generated docs/gallery/index.json with 2 items
//! ```
//!
//! ## Check
//!
//! ```text
//! paperpro 2160x1620 (2 images)
//!     001 my-photo-01 ← My Photo_01.png (800x600)
//!     002 broken ← broken.png (unreadable)
//! rm2 1404x1872 (no source directory)
//! 2 images across 2 devices
//! ```

use crate::build::{BuildEvent, BuildResult, DevicePlan};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn device_header(device: &str, resolution: &str, count: usize, source_found: bool) -> String {
    if !source_found {
        return format!("{device} {resolution} (no source directory)");
    }
    let noun = if count == 1 { "image" } else { "images" };
    format!("{device} {resolution} ({count} {noun})")
}

fn image_line(index: usize, slug: &str, source_name: &str, detail: &str) -> String {
    format!(
        "{}{} {} ← {} ({})",
        indent(1),
        format_index(index),
        slug,
        source_name,
        detail
    )
}

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::DeviceStarted {
            device,
            resolution,
            image_count,
            source_found,
        } => vec![device_header(device, resolution, *image_count, *source_found)],
        BuildEvent::ImageRendered {
            index,
            source_name,
            slug,
            source_size,
            ..
        } => vec![image_line(*index, slug, source_name, &source_size.to_string())],
        BuildEvent::ImageSkipped {
            index,
            source_name,
            reason,
            ..
        } => vec![
            format!("{}{} skipped {}", indent(1), format_index(*index), source_name),
            format!("{}{}", indent(2), reason),
        ],
    }
}

/// Final summary after a build.
pub fn format_build_summary(result: &BuildResult, project_root: &Path) -> Vec<String> {
    let shown = result
        .manifest_path
        .strip_prefix(project_root)
        .unwrap_or(&result.manifest_path);
    let mut lines = vec![format!(
        "Generated {} with {} items",
        shown.display(),
        result.manifest.items.len()
    )];
    if !result.skipped.is_empty() {
        lines.push(format!("Skipped {} unreadable images:", result.skipped.len()));
        for skip in &result.skipped {
            let name = skip
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("{}{}/{}", indent(1), skip.device, name));
        }
    }
    lines
}

pub fn print_build_summary(result: &BuildResult, project_root: &Path) {
    for line in format_build_summary(result, project_root) {
        println!("{}", line);
    }
}

/// Format the `check` listing.
pub fn format_plan(plans: &[DevicePlan]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;
    for plan in plans {
        lines.push(device_header(
            &plan.device.name,
            &plan.device.resolution(),
            plan.images.len(),
            plan.source_found,
        ));
        for (i, image) in plan.images.iter().enumerate() {
            let name = image
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let detail = match image.dimensions {
                Some(dims) => dims.to_string(),
                None => "unreadable".to_string(),
            };
            lines.push(image_line(i + 1, &image.slug, &name, &detail));
            if image.duplicate_slug {
                lines.push(format!(
                    "{}warning: slug '{}' is shared with another file",
                    indent(2),
                    image.slug
                ));
            }
        }
        total += plan.images.len();
    }
    let noun = if plans.len() == 1 { "device" } else { "devices" };
    lines.push(format!("{} images across {} {}", total, plans.len(), noun));
    lines
}

pub fn print_plan(plans: &[DevicePlan]) {
    for line in format_plan(plans) {
        println!("{}", line);
    }
}
