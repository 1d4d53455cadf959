//! Release publisher library.
//!
//! This crate checksums the prebuilt zkPass query libraries with an external
//! checksum tool and publishes each library and its checksum file as assets
//! of an existing GitHub release. It backs the `publish-so` binary and can be
//! driven programmatically with stub executors and release clients in tests.
//!
//! # Modules
//!
//! - [`artifact`] - Local files to publish and their asset names
//! - [`checksum`] - External checksum tool invocation
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Publishing configuration from the environment
//! - [`env_file`] - `.env` file loading
//! - [`error`] - Semantic error types with exit codes
//! - [`logging`] - Diagnostic log initialisation
//! - [`output`] - Progress and summary formatting
//! - [`pipeline`] - Checksum-then-publish orchestration
//! - [`publish`] - Replace-then-upload for a single asset
//! - [`release`] - GitHub release types and REST client

pub mod artifact;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod env_file;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod release;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
