//! Replace-semantics asset publishing.
//!
//! Publishing resolves the release by tag, deletes any asset with the same
//! name, then uploads the local file. A failure at any step stops the
//! remaining steps; in particular a failed delete means nothing is uploaded.

use crate::artifact::Artifact;
use crate::config::PublishConfig;
use crate::error::Result;
use crate::release::{ReleaseApi, Repository};
use log::{info, warn};

/// Outcome of publishing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAsset {
    /// Asset name on the release.
    pub name: String,
    /// Identifier of the newly uploaded asset.
    pub asset_id: u64,
    /// Identifier of the asset that was deleted to make room, if any.
    pub replaced: Option<u64>,
}

/// Publishes artifacts to one tagged release.
pub struct AssetPublisher<'a> {
    api: &'a dyn ReleaseApi,
    repository: &'a Repository,
    tag: &'a str,
}

impl<'a> AssetPublisher<'a> {
    /// Creates a publisher targeting the release named in `config`.
    #[must_use]
    pub fn new(api: &'a dyn ReleaseApi, config: &'a PublishConfig) -> Self {
        Self {
            api,
            repository: &config.repository,
            tag: &config.release_tag,
        }
    }

    /// Uploads `artifact`, replacing any same-named asset on the release.
    ///
    /// # Errors
    ///
    /// Returns the first failure among: deriving the asset name, reading the
    /// file, resolving the release, listing assets, deleting the existing
    /// asset, and uploading.
    pub fn publish(&self, artifact: &Artifact) -> Result<PublishedAsset> {
        let name = artifact.asset_name()?;
        let data = artifact.read()?;

        let release = self.api.get_release_by_tag(self.repository, self.tag)?;
        let assets = self.api.list_release_assets(self.repository, release.id)?;

        let replaced = assets
            .iter()
            .find(|asset| asset.name == name)
            .map(|existing| existing.id);
        if let Some(existing_id) = replaced {
            warn!(
                "replacing existing asset {name} (id {existing_id}) on {} {}",
                self.repository, self.tag
            );
            self.api.delete_release_asset(self.repository, existing_id)?;
        }

        let uploaded = self
            .api
            .upload_release_asset(self.repository, release.id, name, &data)?;
        info!(
            "uploaded {name} ({} bytes) to {} {}",
            data.len(),
            self.repository,
            self.tag
        );

        Ok(PublishedAsset {
            name: name.to_owned(),
            asset_id: uploaded.id,
            replaced,
        })
    }
}
