//! Minimal `.env` file reader.
//!
//! Supports `KEY=VALUE` lines, blank lines, `#` comments, an optional
//! `export ` prefix, and values wrapped in matching single or double quotes.
//! Variable interpolation is not supported.

use crate::error::{PublishError, Result};
use camino::Utf8Path;
use std::collections::BTreeMap;
use std::io::ErrorKind;

/// Variables read from an env file, keyed by name.
pub type EnvVars = BTreeMap<String, String>;

/// Where to look for the env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    /// The conventional `.env` in the working directory; absence is fine.
    Default,
    /// A file named on the command line; absence is an error.
    Explicit(camino::Utf8PathBuf),
    /// Do not read any env file.
    Disabled,
}

/// Name of the env file read when none is given explicitly.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Reads the variables named by `source`.
///
/// # Errors
///
/// Returns [`PublishError::Configuration`] if an explicit file is missing or
/// any file contains a malformed line, and [`PublishError::Io`] for other
/// read failures.
pub fn load_env_file(source: &EnvFile) -> Result<EnvVars> {
    match source {
        EnvFile::Disabled => Ok(EnvVars::new()),
        EnvFile::Default => read_env_file(Utf8Path::new(DEFAULT_ENV_FILE), false),
        EnvFile::Explicit(path) => read_env_file(path, true),
    }
}

fn read_env_file(path: &Utf8Path, required: bool) -> Result<EnvVars> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_env_file(&contents).map_err(|reason| PublishError::Configuration {
            reason: format!("{path}: {reason}"),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound && !required => {
            log::debug!("no env file at {path}");
            Ok(EnvVars::new())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PublishError::Configuration {
            reason: format!("env file {path} does not exist"),
        }),
        Err(source) => Err(PublishError::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Parses env file contents.
///
/// Later assignments to the same key override earlier ones.
///
/// # Errors
///
/// Returns a description naming the first malformed line.
///
/// # Examples
///
/// ```
/// use release_publisher::env_file::parse_env_file;
///
/// let vars = parse_env_file("# release\nOWNER=acme\nexport REPO=\"zkpass\"\n")?;
/// assert_eq!(vars.get("OWNER").map(String::as_str), Some("acme"));
/// assert_eq!(vars.get("REPO").map(String::as_str), Some("zkpass"));
/// # Ok::<(), String>(())
/// ```
pub fn parse_env_file(contents: &str) -> std::result::Result<EnvVars, String> {
    let mut vars = EnvVars::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let assignment = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(format!("line {}: expected KEY=VALUE", index + 1));
        };
        let name = key.trim();
        if !is_valid_key(name) {
            return Err(format!("line {}: invalid variable name {name:?}", index + 1));
        }
        vars.insert(name.to_owned(), unquote(value.trim()).to_owned());
    }
    Ok(vars)
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            value
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(value)
}
