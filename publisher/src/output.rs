//! User-facing progress output.

use crate::publish::PublishedAsset;
use camino::Utf8Path;
use std::io::Write;

/// Writes a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}

/// Formats the line reported after one asset is uploaded.
///
/// # Examples
///
/// ```
/// use release_publisher::output::published_line;
/// use release_publisher::publish::PublishedAsset;
///
/// let asset = PublishedAsset {
///     name: "libfoo.so".to_owned(),
///     asset_id: 99,
///     replaced: Some(42),
/// };
/// assert_eq!(published_line(&asset), "  uploaded libfoo.so (replaced asset 42)");
/// ```
#[must_use]
pub fn published_line(asset: &PublishedAsset) -> String {
    match asset.replaced {
        Some(previous) => format!("  uploaded {} (replaced asset {previous})", asset.name),
        None => format!("  uploaded {}", asset.name),
    }
}

/// Formats the line announcing a checksum tool invocation.
#[must_use]
pub fn checksum_line(tool: &Utf8Path, input: &Utf8Path, output: &Utf8Path) -> String {
    format!("  {tool} --in {input} --out {output}")
}

/// Formats the final summary after a successful run.
#[must_use]
pub fn success_message(count: usize, repository: &str, tag: &str) -> String {
    let plural = if count == 1 { "asset" } else { "assets" };
    format!("Published {count} {plural} to {repository} release {tag}")
}
