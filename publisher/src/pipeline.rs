//! Checksum-then-publish orchestration.
//!
//! Checksums are generated for every library first, then each library and
//! its checksum file are uploaded in order. The first failure ends the run;
//! assets uploaded before it stay published.

use crate::artifact::{ArtifactPair, upload_order};
use crate::checksum::{ChecksumGenerator, CommandExecutor};
use crate::config::PublishConfig;
use crate::error::Result;
use crate::output::{checksum_line, published_line, write_stderr_line};
use crate::publish::{AssetPublisher, PublishedAsset};
use crate::release::ReleaseApi;
use camino::Utf8Path;
use log::info;
use std::io::Write;

/// Context for a publishing run.
pub struct PipelineContext<'a> {
    /// Target release and credentials.
    pub config: &'a PublishConfig,
    /// Libraries to checksum and publish, in order.
    pub pairs: &'a [ArtifactPair],
    /// Checksum executable.
    pub checksum_tool: &'a Utf8Path,
    /// Report the plan without running the tool or calling the API.
    pub dry_run: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Assets published by a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Uploaded assets in upload order; empty for a dry run.
    pub published: Vec<PublishedAsset>,
}

impl PublishReport {
    /// Returns the number of assets that replaced an existing asset.
    #[must_use]
    pub fn replaced_count(&self) -> usize {
        self.published
            .iter()
            .filter(|asset| asset.replaced.is_some())
            .count()
    }
}

/// Runs the full pipeline: generate every checksum, then upload.
///
/// # Errors
///
/// Returns the first checksum or publishing failure. Later steps are not
/// attempted.
pub fn run_pipeline(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    api: &dyn ReleaseApi,
    stderr: &mut dyn Write,
) -> Result<PublishReport> {
    if context.dry_run {
        print_plan(context, stderr);
        return Ok(PublishReport::default());
    }

    generate_checksums(context, executor, stderr)?;
    publish_artifacts(context, api, stderr)
}

/// Generates the checksum file for every pair, stopping at the first failure.
///
/// # Errors
///
/// Returns [`crate::error::PublishError::Generation`] from the failing pair.
pub fn generate_checksums(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<()> {
    let generator = ChecksumGenerator::new(executor, context.checksum_tool);
    progress(context, stderr, "Generating checksums...");

    for pair in context.pairs {
        progress(
            context,
            stderr,
            checksum_line(generator.tool(), pair.library.path(), pair.checksum.path()),
        );
        generator.generate(pair.library.path(), pair.checksum.path())?;
    }

    progress(context, stderr, "");
    Ok(())
}

/// Uploads each library followed by its checksum file.
///
/// # Errors
///
/// Returns the first publishing failure.
pub fn publish_artifacts(
    context: &PipelineContext<'_>,
    api: &dyn ReleaseApi,
    stderr: &mut dyn Write,
) -> Result<PublishReport> {
    let publisher = AssetPublisher::new(api, context.config);
    progress(
        context,
        stderr,
        format!(
            "Publishing to {} release {}...",
            context.config.repository, context.config.release_tag
        ),
    );

    let mut report = PublishReport::default();
    for artifact in upload_order(context.pairs) {
        let published = publisher.publish(artifact)?;
        progress(context, stderr, published_line(&published));
        report.published.push(published);
    }

    info!(
        "published {} asset(s), {} replaced",
        report.published.len(),
        report.replaced_count()
    );
    Ok(report)
}

fn print_plan(context: &PipelineContext<'_>, stderr: &mut dyn Write) {
    write_stderr_line(stderr, "Dry run - no checksums generated, nothing uploaded");
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, "Checksum commands:");
    for pair in context.pairs {
        write_stderr_line(
            stderr,
            checksum_line(
                context.checksum_tool,
                pair.library.path(),
                pair.checksum.path(),
            ),
        );
    }
    write_stderr_line(stderr, "");
    write_stderr_line(
        stderr,
        format!(
            "Uploads to {} release {} (existing assets with the same name are replaced):",
            context.config.repository, context.config.release_tag
        ),
    );
    for artifact in upload_order(context.pairs) {
        write_stderr_line(stderr, format!("  {}", artifact.path()));
    }
}

fn progress(context: &PipelineContext<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !context.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
