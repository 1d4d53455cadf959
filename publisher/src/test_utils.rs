//! Shared test utilities for the publisher crate.

use crate::checksum::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a command `Output` with the given exit code and stderr text.
#[must_use]
pub fn output_with(code: i32, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    output_with(0, "")
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    output_with(1, stderr)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute.
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: std::io::Result<Output>,
}

impl ExpectedCall {
    /// Expects `tool --in <input> --out <output>`.
    #[must_use]
    pub fn checksum(
        tool: &'static str,
        input: impl std::fmt::Display,
        output: impl std::fmt::Display,
        result: std::io::Result<Output>,
    ) -> Self {
        Self {
            cmd: tool,
            args: vec![
                "--in".to_owned(),
                input.to_string(),
                "--out".to_owned(),
                output.to_string(),
            ],
            result,
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify checksum tool calls without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Returns the argument lists of every invocation seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|arg| (*arg).to_owned()).collect());

        let mut expected = self.expected.borrow_mut();
        let call = expected.pop_front().expect("unexpected command invocation");

        assert_eq!(call.cmd, cmd);
        assert!(
            call.args.iter().map(String::as_str).eq(args.iter().copied()),
            "expected arguments {:?}, got {args:?}",
            call.args
        );

        call.result
    }
}

/// Runs `f` with the four required publishing variables set and the optional
/// endpoint overrides cleared.
///
/// Pass `None` for a value to remove that variable for the duration of `f`.
pub fn with_publish_env<R>(
    access_token: Option<&str>,
    owner: Option<&str>,
    repo: Option<&str>,
    release_tag: Option<&str>,
    f: impl FnOnce() -> R,
) -> R {
    temp_env::with_vars(
        [
            ("ACCESS_TOKEN", access_token),
            ("OWNER", owner),
            ("REPO", repo),
            ("RELEASE_TAG", release_tag),
            ("GITHUB_API_URL", None),
            ("GITHUB_UPLOADS_URL", None),
        ],
        f,
    )
}
