//! Presentation: text and JSON renderings of command reports.

use crate::api::{DiffReport, FreezeReport, PackageListing};
use crate::error::SyncError;
use crate::patch::PatchReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;

fn to_json<T: Serialize>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string_pretty(value).map_err(|e| SyncError::Output(e.to_string()))
}

pub fn format_freeze_report(report: &FreezeReport, format: &str) -> Result<String, SyncError> {
    if format == "json" {
        return to_json(report);
    }
    Ok(format!(
        "Froze {} files from {} into {}",
        report.files,
        report.source.display(),
        report.state_file.display()
    ))
}

pub fn format_diff_report(report: &DiffReport, format: &str) -> Result<String, SyncError> {
    let diff = &report.diff;
    if format == "json" {
        let renamed: Vec<_> = diff
            .renamed
            .iter()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect();
        let out = json!({
            "source": report.source,
            "state_file": report.state_file,
            "added": diff.added,
            "deleted": diff.deleted,
            "renamed": renamed,
            "package": report.package,
        });
        return to_json(&out);
    }

    let mut lines = Vec::new();
    for path in &diff.deleted {
        lines.push(format!("D  {}", path));
    }
    for (from, to) in &diff.renamed {
        lines.push(format!("R  {} -> {}", from, to));
    }
    for path in &diff.added {
        lines.push(format!("A  {}", path));
    }
    if diff.is_empty() {
        lines.push("No changes since snapshot.".to_string());
    }
    match &report.package {
        Some(summary) => lines.push(format!(
            "Package written to {}: {} added ({} bytes), {} deleted, {} renamed",
            summary.package_dir.display(),
            summary.added,
            summary.bytes_copied,
            summary.deleted,
            summary.renamed
        )),
        None => lines.push(format!(
            "Dry run: {} added, {} deleted, {} renamed (no package written)",
            diff.added.len(),
            diff.deleted.len(),
            diff.renamed.len()
        )),
    }
    Ok(lines.join("\n"))
}

pub fn format_patch_report(report: &PatchReport, format: &str) -> Result<String, SyncError> {
    if format == "json" {
        return to_json(report);
    }
    let deletions = if report.deletions_enabled {
        format!(
            "{} deleted ({} already absent)",
            report.deleted, report.delete_skipped
        )
    } else {
        "deletions skipped (use --delete)".to_string()
    };
    Ok(format!(
        "Patched {}: {}, {} renamed, {} copied ({} bytes)",
        report.destination.display(),
        deletions,
        report.renamed,
        report.copied,
        report.bytes_copied
    ))
}

pub fn format_package_listing(listing: &PackageListing, format: &str) -> Result<String, SyncError> {
    if format == "json" {
        let renamed: Vec<_> = listing
            .renamed
            .iter()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect();
        return to_json(&json!({
            "package_dir": listing.package_dir,
            "deleted": listing.deleted,
            "renamed": renamed,
            "added": listing.added,
        }));
    }

    if listing.deleted.is_empty() && listing.renamed.is_empty() && listing.added.is_empty() {
        return Ok(format!("Package {} is empty.", listing.package_dir.display()));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Change", "Path"]);
    for path in &listing.deleted {
        table.add_row(vec!["delete".to_string(), path.clone()]);
    }
    for (from, to) in &listing.renamed {
        table.add_row(vec!["rename".to_string(), format!("{} -> {}", from, to)]);
    }
    for path in &listing.added {
        table.add_row(vec!["add".to_string(), path.clone()]);
    }
    Ok(format!(
        "Package {}\n{}",
        listing.package_dir.display(),
        table
    ))
}
