//! Local build outputs to be published.
//!
//! An [`Artifact`] is a path on disk whose final segment becomes the release
//! asset name. [`default_artifact_pairs`] is the fixed publishing plan: two
//! shared libraries, each with a checksum file written next to it.

use crate::error::{PublishError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// A local file to upload as a release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: Utf8PathBuf,
}

impl Artifact {
    /// Creates an artifact for `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path on disk.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the asset name: the final path segment.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidArtifactPath`] when the path ends in
    /// `..` or is a root.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_publisher::artifact::Artifact;
    ///
    /// let artifact = Artifact::new("target/release/libfoo.so");
    /// assert_eq!(artifact.asset_name()?, "libfoo.so");
    /// # Ok::<(), release_publisher::error::PublishError>(())
    /// ```
    pub fn asset_name(&self) -> Result<&str> {
        self.path
            .file_name()
            .ok_or_else(|| PublishError::InvalidArtifactPath {
                path: self.path.clone(),
            })
    }

    /// Reads the whole file into memory.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Io`] if the file cannot be read.
    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|source| PublishError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A shared library and the checksum file generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    /// The library to checksum and upload.
    pub library: Artifact,
    /// Where the checksum tool writes the library's digest.
    pub checksum: Artifact,
}

impl ArtifactPair {
    /// Pairs a library path with its checksum output path.
    #[must_use]
    pub fn new(library: impl Into<Utf8PathBuf>, checksum: impl Into<Utf8PathBuf>) -> Self {
        Self {
            library: Artifact::new(library),
            checksum: Artifact::new(checksum),
        }
    }
}

/// Returns the fixed set of libraries published on every run.
#[must_use]
pub fn default_artifact_pairs() -> Vec<ArtifactPair> {
    vec![
        ArtifactPair::new(
            "target/release/libr0_zkpass_query.so",
            "target/release/libr0_zkpass_query.md5",
        ),
        ArtifactPair::new(
            "target/release/libsp1_zkpass_query.so",
            "target/release/libsp1_zkpass_query.md5",
        ),
    ]
}

/// Flattens pairs into upload order: each library followed by its checksum.
#[must_use]
pub fn upload_order(pairs: &[ArtifactPair]) -> Vec<&Artifact> {
    pairs
        .iter()
        .flat_map(|pair| [&pair.library, &pair.checksum])
        .collect()
}
