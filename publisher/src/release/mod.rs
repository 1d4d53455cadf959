//! Release lookup and asset management on the hosting platform.
//!
//! [`ReleaseApi`] is the seam between the publisher and the network: the
//! production implementation is [`github::GitHubClient`], and tests inject a
//! mock generated by `mockall`.
//!
//! # Sub-modules
//!
//! - [`github`] - `ureq`-backed GitHub REST client.

pub mod github;

use crate::error::Result;
use serde::Deserialize;
use std::fmt;

/// The owner and name of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    /// Account or organisation owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl Repository {
    /// Creates a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A release resolved from its tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Numeric release identifier.
    pub id: u64,
    /// Tag the release was resolved from.
    pub tag_name: String,
}

/// A named binary attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// Numeric asset identifier.
    pub id: u64,
    /// Asset file name, unique within a release.
    pub name: String,
}

/// Operations the publisher needs from the release-hosting API.
///
/// Implementations must map "no such resource" responses to
/// [`crate::error::PublishError::NotFound`] and every other failure to
/// [`crate::error::PublishError::RemoteApi`].
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseApi {
    /// Resolves a release by its tag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the tag has no release.
    fn get_release_by_tag(&self, repository: &Repository, tag: &str) -> Result<Release>;

    /// Lists every asset attached to a release.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn list_release_assets(
        &self,
        repository: &Repository,
        release_id: u64,
    ) -> Result<Vec<ReleaseAsset>>;

    /// Deletes an asset by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be deleted.
    fn delete_release_asset(&self, repository: &Repository, asset_id: u64) -> Result<()>;

    /// Uploads `data` as a new asset named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    fn upload_release_asset(
        &self,
        repository: &Repository,
        release_id: u64,
        name: &str,
        data: &[u8],
    ) -> Result<ReleaseAsset>;
}
