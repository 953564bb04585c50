//! Fetch-and-hash stage: download every classified file and record its SHA-256.
//!
//! Each response body is streamed chunk by chunk into a temporary file in the
//! staging directory while the digest is updated, so a file is read exactly
//! once and never held in memory. The temporary file only takes its final name
//! once the whole body has arrived; an aborted download leaves nothing behind.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::contract::{Artifact, ArtifactFetcher, CategorizedFiles, Platform, PlatformArtifacts};
use crate::error::{FetchError, FetchErrorKind};

/// Resolve `filename` against the listing URL.
///
/// A `/` is inserted when `base` does not already end with one; nothing else
/// is normalised or percent-encoded.
pub fn join_url(base: &str, filename: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{filename}")
    } else {
        format!("{base}/{filename}")
    }
}

/// Name a fetched file is stored under in the staging directory.
fn staged_name(filename: &str) -> String {
    match filename.rsplit('/').next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name.to_string(),
        _ => filename.replace(['/', '.'], "_"),
    }
}

/// Artifacts for skip-download mode: no checksum, no size.
///
/// These are not verified and the generated index carries no hash for them.
pub fn unverified_artifacts(base_url: &str, files: &CategorizedFiles) -> PlatformArtifacts {
    let mut artifacts = PlatformArtifacts::default();
    for platform in Platform::ALL {
        let unverified = files
            .get(platform)
            .iter()
            .map(|filename| Artifact {
                filename: filename.clone(),
                url: join_url(base_url, filename),
                sha256: None,
                size: None,
            })
            .collect();
        artifacts.insert(platform, unverified);
    }
    artifacts
}

/// [`ArtifactFetcher`] that downloads over HTTP into a staging directory.
pub struct HttpFetcher {
    client: reqwest::Client,
    staging_dir: PathBuf,
    concurrency: usize,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, staging_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            client,
            staging_dir: staging_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Download a single file, stage it, and return its artifact record.
    pub async fn fetch_one(
        &self,
        platform: Platform,
        base_url: &str,
        filename: &str,
    ) -> Result<Artifact, FetchError> {
        let url = join_url(base_url, filename);
        let error = |kind| FetchError {
            platform,
            filename: filename.to_string(),
            url: url.clone(),
            kind,
        };
        let staging = |path: &Path, source: io::Error| {
            error(FetchErrorKind::Staging {
                path: path.to_path_buf(),
                source,
            })
        };

        debug!(platform = %platform, url = %url, "Downloading file");
        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| error(FetchErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error(FetchErrorKind::Status(status.as_u16())));
        }

        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| staging(&self.staging_dir, e))?;
        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(&self.staging_dir)
            .map_err(|e| staging(&self.staging_dir, e))?;
        let handle = partial
            .as_file()
            .try_clone()
            .map_err(|e| staging(partial.path(), e))?;
        let mut file = tokio::fs::File::from_std(handle);

        let mut hasher = Sha256::new();
        let mut size = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| error(FetchErrorKind::Transport(e.to_string())))?
        {
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| staging(partial.path(), e))?;
            size += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| staging(partial.path(), e))?;
        drop(file);

        let destination = self.staging_dir.join(staged_name(filename));
        partial
            .persist(&destination)
            .map_err(|e| staging(&destination, e.error))?;

        let sha256 = hex::encode(hasher.finalize());
        info!(
            platform = %platform,
            filename = %filename,
            size,
            sha256 = %sha256,
            "Downloaded and hashed file"
        );

        Ok(Artifact {
            filename: filename.to_string(),
            url,
            sha256: Some(sha256),
            size: Some(size),
        })
    }

    /// Fetch one platform bucket with at most `concurrency` downloads in flight.
    ///
    /// Results are written back by input position, so the output order always
    /// matches `files`. The first failure drops every in-flight download.
    async fn fetch_platform(
        &self,
        platform: Platform,
        base_url: &str,
        files: &[String],
    ) -> Result<Vec<Artifact>, FetchError> {
        let mut slots: Vec<Option<Artifact>> = vec![None; files.len()];

        let pending: Vec<_> = files
            .iter()
            .enumerate()
            .map(|(index, filename)| async move {
                self.fetch_one(platform, base_url, filename)
                    .await
                    .map(|artifact| (index, artifact))
            })
            .collect();
        let mut downloads = stream::iter(pending).buffer_unordered(self.concurrency);

        while let Some(result) = downloads.next().await {
            let (index, artifact) = result?;
            slots[index] = Some(artifact);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch_artifacts(
        &self,
        base_url: &str,
        files: &CategorizedFiles,
    ) -> Result<PlatformArtifacts, FetchError> {
        let mut artifacts = PlatformArtifacts::default();
        for platform in Platform::ALL {
            let fetched = self
                .fetch_platform(platform, base_url, files.get(platform))
                .await?;
            info!(platform = %platform, count = fetched.len(), "Fetched platform files");
            artifacts.insert(platform, fetched);
        }
        Ok(artifacts)
    }
}
