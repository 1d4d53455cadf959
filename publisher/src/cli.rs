//! CLI argument definitions for `publish-so`.
//!
//! The artifact set and release target are not configurable here; the
//! release comes from the environment and the libraries are fixed paths
//! under `target/release`.

use crate::checksum::DEFAULT_CHECKSUM_TOOL;
use crate::env_file::EnvFile;
use camino::Utf8PathBuf;
use clap::Parser;

/// Checksum the zkPass query libraries and publish them to a GitHub release.
#[derive(Parser, Debug, Clone)]
#[command(name = "publish-so")]
#[command(version, about)]
#[command(long_about = concat!(
    "Checksum the zkPass query libraries and publish them to a GitHub release.\n\n",
    "Both shared libraries under target/release are checksummed with the ",
    "checksum tool first. Each library and its checksum file are then uploaded ",
    "to the release tagged RELEASE_TAG, replacing any asset with the same name.\n\n",
    "ACCESS_TOKEN, OWNER, REPO and RELEASE_TAG are read from the environment or ",
    "from the env file. Variables already set in the environment win.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Publish using ./.env:\n",
    "    $ publish-so\n\n",
    "  Preview the checksum commands and uploads:\n",
    "    $ publish-so --dry-run\n\n",
    "  Use a different env file and show request details:\n",
    "    $ publish-so --env-file release.env -v",
))]
pub struct Cli {
    /// Env file to read the publishing variables from [default: .env].
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<Utf8PathBuf>,

    /// Ignore any env file and use the process environment only.
    #[arg(long, conflicts_with = "env_file")]
    pub no_env_file: bool,

    /// Checksum executable, invoked as `<tool> --in <lib> --out <checksum>`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CHECKSUM_TOOL)]
    pub checksum_tool: Utf8PathBuf,

    /// Show the checksum commands and uploads without running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Returns which env file the configuration should be read from.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use release_publisher::cli::Cli;
    /// use release_publisher::env_file::EnvFile;
    ///
    /// let cli = Cli::parse_from(["publish-so", "--no-env-file"]);
    /// assert_eq!(cli.env_file(), EnvFile::Disabled);
    /// ```
    #[must_use]
    pub fn env_file(&self) -> EnvFile {
        if self.no_env_file {
            return EnvFile::Disabled;
        }
        self.env_file
            .clone()
            .map_or(EnvFile::Default, EnvFile::Explicit)
    }

    /// Returns the default log filter directive for the chosen verbosity.
    ///
    /// Only this crate's level follows `-v`/`-q`; dependencies stay at
    /// `warn` so HTTP wire traces never reach the log.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use release_publisher::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["publish-so", "-vv"]);
    /// assert_eq!(cli.log_directive(), "warn,release_publisher=debug");
    /// ```
    #[must_use]
    pub fn log_directive(&self) -> String {
        let level = if self.quiet {
            "error"
        } else {
            match self.verbosity {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
    }
}

impl Default for Cli {
    /// Matches a bare `publish-so` invocation.
    fn default() -> Self {
        Self {
            env_file: None,
            no_env_file: false,
            checksum_tool: Utf8PathBuf::from(DEFAULT_CHECKSUM_TOOL),
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
