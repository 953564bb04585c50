//! Error types for each pipeline stage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::contract::Platform;

/// Retrieving the directory listing failed. Fatal: nothing is classified.
#[derive(Debug, Error)]
#[error("failed to fetch directory listing {url}: {kind}")]
pub struct ListingError {
    pub url: String,
    #[source]
    pub kind: ListingErrorKind,
}

#[derive(Debug, Error)]
pub enum ListingErrorKind {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Downloading a single release file failed. Aborts the fetch stage.
#[derive(Debug, Error)]
#[error("failed to download {platform} file {filename} from {url}: {kind}")]
pub struct FetchError {
    pub platform: Platform,
    pub filename: String,
    pub url: String,
    #[source]
    pub kind: FetchErrorKind,
}

#[derive(Debug, Error)]
pub enum FetchErrorKind {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("staging file {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creating a directory or writing an index file failed.
#[derive(Debug, Error)]
#[error("{path}: {source}")]
pub struct FilesystemError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FilesystemError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Any fatal error surfaced by [`crate::mirror::mirror`], tagged with its stage.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("listing stage: {0}")]
    Listing(#[from] ListingError),

    #[error("fetch stage: {0}")]
    Fetch(#[from] FetchError),

    #[error("generate stage ({platform}): {source}")]
    Filesystem {
        platform: Platform,
        #[source]
        source: FilesystemError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MirrorError {
    /// Short name of the stage that failed, used as a structured log field.
    pub fn stage(&self) -> &'static str {
        match self {
            MirrorError::Listing(_) => "listing",
            MirrorError::Fetch(_) => "fetch",
            MirrorError::Filesystem { .. } => "generate",
            MirrorError::Config(_) => "config",
        }
    }
}
