//! GitHub REST implementation of [`ReleaseApi`] using `ureq`.

use super::{Release, ReleaseApi, ReleaseAsset, Repository};
use crate::config::PublishConfig;
use crate::error::{PublishError, Result};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::RequestBuilder;

/// Network timeout for a single API call, including uploads.
const API_TIMEOUT: Duration = Duration::from_secs(300);

/// Page size requested when listing assets; GitHub's maximum.
const ASSETS_PER_PAGE: usize = 100;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("release-publisher/", env!("CARGO_PKG_VERSION"));

/// Authenticated GitHub client sharing one `ureq` agent across calls.
pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    uploads_url: String,
    authorization: String,
}

impl GitHubClient {
    /// Creates a client for the endpoints and token in `config`.
    #[must_use]
    pub fn new(config: &PublishConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(API_TIMEOUT))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            api_url: config.api_url.clone(),
            uploads_url: config.uploads_url.clone(),
            authorization: format!("Bearer {}", config.access_token.expose()),
        }
    }

    fn authorised<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", &self.authorization)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }
}

impl ReleaseApi for GitHubClient {
    fn get_release_by_tag(&self, repository: &Repository, tag: &str) -> Result<Release> {
        const OPERATION: &str = "get release by tag";
        let url = release_by_tag_url(&self.api_url, repository, tag);
        debug!("GET {url}");

        let body = self
            .authorised(self.agent.get(&url))
            .call()
            .map_err(|e| {
                map_ureq_error(OPERATION, || format!("release {tag} in {repository}"), &e)
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| remote_error(OPERATION, &e))?;
        decode(OPERATION, &body)
    }

    fn list_release_assets(
        &self,
        repository: &Repository,
        release_id: u64,
    ) -> Result<Vec<ReleaseAsset>> {
        const OPERATION: &str = "list release assets";
        let url = release_assets_url(&self.api_url, repository, release_id);
        let mut assets = Vec::new();

        for page in 1_u32.. {
            debug!("GET {url} (page {page})");
            let body = self
                .authorised(self.agent.get(&url))
                .query("per_page", ASSETS_PER_PAGE.to_string())
                .query("page", page.to_string())
                .call()
                .map_err(|e| {
                    map_ureq_error(OPERATION, || format!("release {release_id} in {repository}"), &e)
                })?
                .into_body()
                .read_to_string()
                .map_err(|e| remote_error(OPERATION, &e))?;

            let batch: Vec<ReleaseAsset> = decode(OPERATION, &body)?;
            let is_last = batch.len() < ASSETS_PER_PAGE;
            assets.extend(batch);
            if is_last {
                break;
            }
        }

        Ok(assets)
    }

    fn delete_release_asset(&self, repository: &Repository, asset_id: u64) -> Result<()> {
        const OPERATION: &str = "delete release asset";
        let url = release_asset_url(&self.api_url, repository, asset_id);
        debug!("DELETE {url}");

        self.authorised(self.agent.delete(&url))
            .call()
            .map_err(|e| {
                map_ureq_error(OPERATION, || format!("asset {asset_id} in {repository}"), &e)
            })?;
        Ok(())
    }

    fn upload_release_asset(
        &self,
        repository: &Repository,
        release_id: u64,
        name: &str,
        data: &[u8],
    ) -> Result<ReleaseAsset> {
        const OPERATION: &str = "upload release asset";
        let url = upload_url(&self.uploads_url, repository, release_id);
        debug!("POST {url}?name={name} ({} bytes)", data.len());

        let body = self
            .authorised(self.agent.post(&url))
            .query("name", name)
            .header("Content-Type", "application/octet-stream")
            .send(data)
            .map_err(|e| {
                map_ureq_error(OPERATION, || format!("release {release_id} in {repository}"), &e)
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| remote_error(OPERATION, &e))?;
        decode(OPERATION, &body)
    }
}

fn release_by_tag_url(api_url: &str, repository: &Repository, tag: &str) -> String {
    format!(
        "{api_url}/repos/{}/{}/releases/tags/{}",
        encode_path_segment(&repository.owner),
        encode_path_segment(&repository.name),
        encode_path_segment(tag)
    )
}

fn release_assets_url(api_url: &str, repository: &Repository, release_id: u64) -> String {
    format!(
        "{api_url}/repos/{}/{}/releases/{release_id}/assets",
        encode_path_segment(&repository.owner),
        encode_path_segment(&repository.name),
    )
}

fn release_asset_url(api_url: &str, repository: &Repository, asset_id: u64) -> String {
    format!(
        "{api_url}/repos/{}/{}/releases/assets/{asset_id}",
        encode_path_segment(&repository.owner),
        encode_path_segment(&repository.name),
    )
}

fn upload_url(uploads_url: &str, repository: &Repository, release_id: u64) -> String {
    format!(
        "{uploads_url}/repos/{}/{}/releases/{release_id}/assets",
        encode_path_segment(&repository.owner),
        encode_path_segment(&repository.name),
    )
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PublishError::RemoteApi {
        operation,
        reason: format!("unexpected response body: {e}"),
    })
}

fn remote_error(operation: &'static str, err: &ureq::Error) -> PublishError {
    PublishError::RemoteApi {
        operation,
        reason: err.to_string(),
    }
}

/// Map a ureq error to a [`PublishError`], treating 404 as a missing resource.
fn map_ureq_error(
    operation: &'static str,
    resource: impl FnOnce() -> String,
    err: &ureq::Error,
) -> PublishError {
    match err {
        ureq::Error::StatusCode(404) => PublishError::NotFound {
            resource: resource(),
        },
        other => remote_error(operation, other),
    }
}


#[cfg(test)]
#[path = "github_wire_tests.rs"]
mod wire_tests;
