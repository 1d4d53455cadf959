//! Error types for the release publisher.
//!
//! Each variant corresponds to one failure kind of the publishing run and maps
//! to a distinct process exit code via [`PublishError::exit_code`].

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while checksumming or publishing release assets.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Required configuration was missing or malformed.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Description of what is missing or invalid.
        reason: String,
    },

    /// The checksum tool reported a failure.
    #[error("checksum generation failed for {input}: {message}")]
    Generation {
        /// The file whose checksum was requested.
        input: Utf8PathBuf,
        /// Error text reported by the tool, or a description of the failure.
        message: String,
    },

    /// The remote platform has no such resource (HTTP 404).
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable description of the missing resource.
        resource: String,
    },

    /// A remote API call failed for any reason other than a missing resource.
    #[error("GitHub API {operation} failed: {reason}")]
    RemoteApi {
        /// The API operation that failed (for example `upload release asset`).
        operation: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// The artifact path has no usable final segment to name the asset.
    #[error("cannot derive an asset name from {path}")]
    InvalidArtifactPath {
        /// The offending path.
        path: Utf8PathBuf,
    },

    /// A local file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    /// Returns the process exit code reported for this error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_publisher::error::PublishError;
    ///
    /// let err = PublishError::Configuration {
    ///     reason: "missing OWNER".to_owned(),
    /// };
    /// assert_eq!(err.exit_code(), 2);
    /// ```
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } => 2,
            Self::Generation { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::RemoteApi { .. } => 5,
            Self::InvalidArtifactPath { .. } | Self::Io { .. } => 6,
        }
    }
}

/// Result type alias using [`PublishError`].
pub type Result<T> = std::result::Result<T, PublishError>;
