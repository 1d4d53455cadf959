//! `publish-so` entrypoint.
//!
//! This binary checksums the zkPass query libraries under `target/release`
//! and publishes each library with its checksum file to a GitHub release,
//! replacing assets of the same name.

use clap::Parser;
use release_publisher::artifact::default_artifact_pairs;
use release_publisher::checksum::SystemCommandExecutor;
use release_publisher::cli::Cli;
use release_publisher::config::PublishConfig;
use release_publisher::error::Result;
use release_publisher::logging::init_logging;
use release_publisher::output::{success_message, write_stderr_line};
use release_publisher::pipeline::{PipelineContext, PublishReport, run_pipeline};
use release_publisher::release::github::GitHubClient;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_directive());
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<PublishReport> {
    let config = PublishConfig::load(&cli.env_file())?;
    let pairs = default_artifact_pairs();
    let context = PipelineContext {
        config: &config,
        pairs: &pairs,
        checksum_tool: &cli.checksum_tool,
        dry_run: cli.dry_run,
        quiet: cli.quiet,
    };

    let client = GitHubClient::new(&config);
    let report = run_pipeline(&context, &SystemCommandExecutor, &client, stderr)?;

    if !cli.dry_run && !cli.quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(
            stderr,
            success_message(
                report.published.len(),
                &config.repository.to_string(),
                &config.release_tag,
            ),
        );
    }

    Ok(report)
}

fn exit_code_for_run_result(result: Result<PublishReport>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            err.exit_code()
        }
    }
}
