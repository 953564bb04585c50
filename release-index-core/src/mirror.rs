//! High-level pipeline: listing → classify → fetch-and-hash → generate.
//!
//! This module sequences the four stages for one run of the mirror:
//!   - Fetches the configured directory listing and extracts file hrefs
//!   - Buckets the files per platform with the filename classifier
//!   - Downloads and hashes every file (or, in skip-download mode, synthesises
//!     unverified artifacts without touching the network)
//!   - Regenerates the `<platform>/simple/` trees under the output directory
//!
//! # Responsibilities
//! - Fail-fast orchestration: the first stage error aborts the run and is
//!   returned as a [`MirrorError`] naming the stage
//! - Structured `tracing` events at each stage boundary
//! - Returns a [`MirrorReport`] for the caller to print; nothing is printed here
//!
//! # Callable From
//! - The CLI crate, via [`run_mirror`]
//! - Tests, via [`mirror`] with mocked [`ListingSource`] / [`ArtifactFetcher`]

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::classify::categorize;
use crate::config::MirrorConfig;
use crate::contract::{ArtifactFetcher, ListingSource, PlatformArtifacts, PlatformCounts};
use crate::error::MirrorError;
use crate::fetch::{unverified_artifacts, HttpFetcher};
use crate::generate::{generate_tree, validate_project_name};
use crate::listing::{list_files, HttpListingSource};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorReport {
    pub success: bool,
    pub output_directory: PathBuf,
    pub project: String,
    /// Artifacts published per platform.
    pub platforms: PlatformCounts,
    /// False when the indexes were generated in skip-download mode and carry no hashes.
    pub verified: bool,
}

pub async fn mirror<L, F>(
    config: &MirrorConfig,
    listing: &L,
    fetcher: &F,
) -> Result<MirrorReport, MirrorError>
where
    L: ListingSource + ?Sized,
    F: ArtifactFetcher + ?Sized,
{
    info!(
        source = %config.source_url,
        output = %config.output_dir.display(),
        project = %config.project_name,
        "Starting generation"
    );
    validate_project_name(&config.project_name)?;

    info!("Parsing directory listing");
    let files = list_files(listing, &config.source_url).await.map_err(|e| {
        error!(error = %e, "Failed to parse directory listing");
        MirrorError::from(e)
    })?;

    info!(files = files.len(), "Categorizing files by OS");
    let categorized = categorize(files);
    let counts = categorized.counts();
    info!(
        linux = counts.linux,
        mac = counts.mac,
        windows = counts.windows,
        "Categorization complete"
    );

    let artifacts = if categorized.is_empty() {
        warn!(source = %config.source_url, "No release files found in directory listing");
        PlatformArtifacts::default()
    } else if config.skip_download {
        warn!("Skipping download: indexes will be published without sha256 hashes");
        unverified_artifacts(&config.source_url, &categorized)
    } else {
        info!("Downloading files and calculating checksums");
        fetcher
            .fetch_artifacts(&config.source_url, &categorized)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to download files");
                MirrorError::from(e)
            })?
    };

    info!("Generating PyPI Simple repository structure");
    let indexes =
        generate_tree(&config.output_dir, &config.project_name, &artifacts).map_err(|e| {
            error!(error = %e, "Failed to generate structure");
            e
        })?;
    for index in &indexes {
        debug!(
            platform = %index.platform,
            root_index = %index.root_index.display(),
            project_index = %index.project_index.display(),
            "Index pair in place"
        );
    }

    Ok(MirrorReport {
        success: true,
        output_directory: config.output_dir.clone(),
        project: config.project_name.clone(),
        platforms: artifacts.counts(),
        verified: !config.skip_download && artifacts.all_verified(),
    })
}

/// Run the pipeline with the reqwest-backed listing source and fetcher.
pub async fn run_mirror(config: &MirrorConfig) -> Result<MirrorReport, MirrorError> {
    config.trace_loaded();
    let client = config
        .fetch
        .build_client()
        .map_err(|e| MirrorError::Config(format!("failed to build HTTP client: {e}")))?;

    let listing = HttpListingSource::new(client.clone());
    let fetcher = HttpFetcher::new(client, config.staging_dir(), config.fetch.concurrency);
    mirror(config, &listing, &fetcher).await
}
