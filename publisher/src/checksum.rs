//! Checksum generation through the external checksum tool.
//!
//! The tool is invoked as `<tool> --in <input> --out <output>`. Any text on
//! its standard error stream is treated as fatal, even when the exit status
//! reports success.

use crate::error::{PublishError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::process::{Command, Output};

/// Checksum executable used when none is given on the command line.
pub const DEFAULT_CHECKSUM_TOOL: &str = "target/release/zkpass-md5-checksum";

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be spawned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use release_publisher::checksum::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("md5sum", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output> {
        Command::new(cmd).args(args).output()
    }
}

/// Runs the checksum tool for one input file at a time.
pub struct ChecksumGenerator<'a> {
    executor: &'a dyn CommandExecutor,
    tool: Utf8PathBuf,
}

impl<'a> ChecksumGenerator<'a> {
    /// Creates a generator that invokes `tool` through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, tool: impl Into<Utf8PathBuf>) -> Self {
        Self {
            executor,
            tool: tool.into(),
        }
    }

    /// Returns the path of the checksum executable.
    #[must_use]
    pub fn tool(&self) -> &Utf8Path {
        &self.tool
    }

    /// Writes the checksum of `input` to `output`.
    ///
    /// The output file is not checked for existence afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Generation`] when the tool cannot be spawned,
    /// writes anything to stderr, or exits unsuccessfully.
    pub fn generate(&self, input: &Utf8Path, output: &Utf8Path) -> Result<()> {
        let args = checksum_args(input, output);
        debug!("running {} {}", self.tool, args.join(" "));

        let result = self
            .executor
            .run(self.tool.as_str(), &args)
            .map_err(|e| PublishError::Generation {
                input: input.to_owned(),
                message: format!("could not run {}: {e}", self.tool),
            })?;

        check_output(input, &result)?;
        info!("wrote checksum for {input} to {output}");
        Ok(())
    }
}

/// Builds the argument list passed to the checksum tool.
fn checksum_args<'p>(input: &'p Utf8Path, output: &'p Utf8Path) -> [&'p str; 4] {
    ["--in", input.as_str(), "--out", output.as_str()]
}

/// Applies the failure policy: stderr output first, then exit status.
fn check_output(input: &Utf8Path, output: &Output) -> Result<()> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        return Err(PublishError::Generation {
            input: input.to_owned(),
            message: stderr.trim().to_owned(),
        });
    }

    if !output.status.success() {
        return Err(PublishError::Generation {
            input: input.to_owned(),
            message: format!("checksum tool exited with {}", output.status),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, output_with, success_output};
    use rstest::rstest;

    const TOOL: &str = "target/release/zkpass-md5-checksum";

    fn expect_checksum(result: std::io::Result<Output>) -> StubExecutor {
        StubExecutor::new(vec![ExpectedCall::checksum(TOOL, "lib.so", "lib.md5", result)])
    }

    #[test]
    fn generate_passes_in_and_out_arguments() {
        let executor = expect_checksum(Ok(success_output()));
        let generator = ChecksumGenerator::new(&executor, TOOL);

        generator
            .generate(Utf8Path::new("lib.so"), Utf8Path::new("lib.md5"))
            .expect("checksum generation should succeed");
        executor.assert_finished();
    }

    #[rstest]
    #[case::stderr_with_success_status(output_with(0, "warning: slow disk"), "warning: slow disk")]
    #[case::stderr_with_failure_status(failure_output("no such file\n"), "no such file")]
    #[case::silent_failure(output_with(2, ""), "exited with")]
    fn generate_rejects_failed_runs(#[case] output: Output, #[case] expected: &str) {
        let executor = expect_checksum(Ok(output));
        let generator = ChecksumGenerator::new(&executor, TOOL);

        let err = generator
            .generate(Utf8Path::new("lib.so"), Utf8Path::new("lib.md5"))
            .expect_err("checksum generation should fail");
        match err {
            PublishError::Generation { input, message } => {
                assert_eq!(input, Utf8PathBuf::from("lib.so"));
                assert!(message.contains(expected), "unexpected message: {message}");
            }
            other => panic!("expected Generation error, got {other:?}"),
        }
    }

    #[test]
    fn generate_reports_spawn_failure_as_generation_error() {
        let executor = expect_checksum(Err(std::io::Error::from(std::io::ErrorKind::NotFound)));
        let generator = ChecksumGenerator::new(&executor, TOOL);

        let err = generator
            .generate(Utf8Path::new("lib.so"), Utf8Path::new("lib.md5"))
            .expect_err("missing tool should fail");
        assert!(matches!(err, PublishError::Generation { ref message, .. } if message.contains(TOOL)));
    }
}
