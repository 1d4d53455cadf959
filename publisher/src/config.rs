//! Publishing configuration.
//!
//! [`PublishConfig`] is built once at start-up from the process environment
//! and an optional env file, then passed by reference to the publisher. The
//! process environment takes precedence over values from the file.

use crate::env_file::{EnvFile, load_env_file};
use crate::error::{PublishError, Result};
use crate::release::Repository;
use std::fmt;

/// Variable holding the GitHub access token.
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
/// Variable holding the repository owner.
pub const OWNER_VAR: &str = "OWNER";
/// Variable holding the repository name.
pub const REPO_VAR: &str = "REPO";
/// Variable holding the release tag.
pub const RELEASE_TAG_VAR: &str = "RELEASE_TAG";
/// Optional override for the REST API base URL.
pub const API_URL_VAR: &str = "GITHUB_API_URL";
/// Optional override for the asset upload base URL.
pub const UPLOADS_URL_VAR: &str = "GITHUB_UPLOADS_URL";

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Public GitHub asset upload endpoint.
pub const DEFAULT_UPLOADS_URL: &str = "https://uploads.github.com";

/// A bearer token that never appears in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Everything the publisher needs to reach the target release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Fine-grained access token authorising release edits.
    pub access_token: AccessToken,
    /// Repository that owns the release.
    pub repository: Repository,
    /// Tag of the release receiving the assets.
    pub release_tag: String,
    /// REST API base URL, without a trailing slash.
    pub api_url: String,
    /// Asset upload base URL, without a trailing slash.
    pub uploads_url: String,
}

impl PublishConfig {
    /// Loads configuration from the process environment, falling back to the
    /// env file for variables the environment does not set.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Configuration`] if the env file is malformed or
    /// any required variable is missing.
    pub fn load(env_file: &EnvFile) -> Result<Self> {
        let file_vars = load_env_file(env_file)?;
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as missing. Every missing required variable is
    /// reported in a single error.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Configuration`] naming the missing variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_publisher::config::PublishConfig;
    ///
    /// let config = PublishConfig::from_lookup(|key| match key {
    ///     "ACCESS_TOKEN" => Some("t".to_owned()),
    ///     "OWNER" => Some("o".to_owned()),
    ///     "REPO" => Some("r".to_owned()),
    ///     "RELEASE_TAG" => Some("v1".to_owned()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.release_tag, "v1");
    /// assert_eq!(config.api_url, "https://api.github.com");
    /// # Ok::<(), release_publisher::error::PublishError>(())
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let (Some(token), Some(owner), Some(repo), Some(tag)) = (
            read(ACCESS_TOKEN_VAR),
            read(OWNER_VAR),
            read(REPO_VAR),
            read(RELEASE_TAG_VAR),
        ) else {
            let missing: Vec<&str> = [ACCESS_TOKEN_VAR, OWNER_VAR, REPO_VAR, RELEASE_TAG_VAR]
                .into_iter()
                .filter(|key| read(*key).is_none())
                .collect();
            return Err(PublishError::Configuration {
                reason: format!("missing required variable(s): {}", missing.join(", ")),
            });
        };

        Ok(Self {
            access_token: AccessToken::new(token),
            repository: Repository::new(owner, repo),
            release_tag: tag,
            api_url: base_url(read(API_URL_VAR), DEFAULT_API_URL),
            uploads_url: base_url(read(UPLOADS_URL_VAR), DEFAULT_UPLOADS_URL),
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_owned()
}
