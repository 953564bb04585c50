//! # contract: shared data model and stage seams
//!
//! This module defines the plain data passed between the pipeline stages
//! (filenames, platform buckets, artifacts) and the two traits the driver
//! depends on: [`ListingSource`] for retrieving the directory listing and
//! [`ArtifactFetcher`] for turning classified filenames into hashed artifacts.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so the driver can be exercised
//!   without any network access.
//! - Real implementations live in [`crate::listing`] and [`crate::fetch`].

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FetchError, ListingError};

/// Target operating system a release file is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Mac,
    Windows,
}

impl Platform {
    /// Every platform, in the order indexes are generated and reported.
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Mac, Platform::Windows];

    /// Directory name used for this platform in the output tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filenames bucketed by platform, each list in first-seen listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedFiles {
    pub linux: Vec<String>,
    pub mac: Vec<String>,
    pub windows: Vec<String>,
}

impl CategorizedFiles {
    pub fn get(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::Linux => &self.linux,
            Platform::Mac => &self.mac,
            Platform::Windows => &self.windows,
        }
    }

    pub(crate) fn get_mut(&mut self, platform: Platform) -> &mut Vec<String> {
        match platform {
            Platform::Linux => &mut self.linux,
            Platform::Mac => &mut self.mac,
            Platform::Windows => &mut self.windows,
        }
    }

    pub fn counts(&self) -> PlatformCounts {
        PlatformCounts {
            linux: self.linux.len(),
            mac: self.mac.len(),
            windows: self.windows.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.linux.len() + self.mac.len() + self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A release file that has been (or, in skip-download mode, would be) mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Filename exactly as it appeared in the listing href.
    pub filename: String,
    /// Absolute download URL the index links to.
    pub url: String,
    /// Lowercase hex SHA-256 of the fetched bytes. `None` when the file was never fetched.
    pub sha256: Option<String>,
    /// Number of bytes received. `None` when the file was never fetched.
    pub size: Option<u64>,
}

impl Artifact {
    /// True only for artifacts whose bytes were actually downloaded and hashed.
    pub fn is_verified(&self) -> bool {
        self.sha256.is_some()
    }
}

/// Artifacts per platform, in the same order as the [`CategorizedFiles`] they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformArtifacts {
    pub linux: Vec<Artifact>,
    pub mac: Vec<Artifact>,
    pub windows: Vec<Artifact>,
}

impl PlatformArtifacts {
    pub fn get(&self, platform: Platform) -> &[Artifact] {
        match platform {
            Platform::Linux => &self.linux,
            Platform::Mac => &self.mac,
            Platform::Windows => &self.windows,
        }
    }

    pub fn insert(&mut self, platform: Platform, artifacts: Vec<Artifact>) {
        match platform {
            Platform::Linux => self.linux = artifacts,
            Platform::Mac => self.mac = artifacts,
            Platform::Windows => self.windows = artifacts,
        }
    }

    pub fn counts(&self) -> PlatformCounts {
        PlatformCounts {
            linux: self.linux.len(),
            mac: self.mac.len(),
            windows: self.windows.len(),
        }
    }

    pub fn all_verified(&self) -> bool {
        Platform::ALL
            .iter()
            .flat_map(|p| self.get(*p))
            .all(Artifact::is_verified)
    }
}

/// Number of files or artifacts per platform, as reported in the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformCounts {
    pub linux: usize,
    pub mac: usize,
    pub windows: usize,
}

/// Retrieves the raw HTML of a directory listing.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the listing document at `url` and return its body as text.
    async fn fetch_listing(&self, url: &str) -> Result<String, ListingError>;
}

/// Downloads classified files and produces hashed artifacts.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch every file of every platform bucket relative to `base_url`.
    ///
    /// Implementations must return each platform's artifacts in the order of
    /// the input bucket and fail the whole call on the first fetch error.
    async fn fetch_artifacts(
        &self,
        base_url: &str,
        files: &CategorizedFiles,
    ) -> Result<PlatformArtifacts, FetchError>;
}
