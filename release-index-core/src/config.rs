use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_SOURCE_URL: &str = "https://www.python.org/ftp/python/3.14.0/";
pub const DEFAULT_OUTPUT_DIR: &str = "releases";
pub const DEFAULT_PROJECT_NAME: &str = "python";

/// Name of the staging directory created under the output directory.
pub const STAGING_DIR_NAME: &str = "temp-downloads";

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    /// Directory listing to mirror; also the base URL of every file.
    pub source_url: String,
    /// Root of the generated `<platform>/simple/` trees.
    pub output_dir: PathBuf,
    /// PyPI project name used at both index levels.
    pub project_name: String,
    /// Publish unverified links without downloading anything.
    pub skip_download: bool,
    /// Where downloaded files are kept. Defaults to `<output_dir>/temp-downloads`.
    pub staging_dir: Option<PathBuf>,
    pub fetch: FetchSettings,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            skip_download: false,
            staging_dir: None,
            fetch: FetchSettings::default(),
        }
    }
}

impl MirrorConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join(STAGING_DIR_NAME))
    }

    pub fn trace_loaded(&self) {
        info!(
            source_url = %self.source_url,
            output_dir = %self.output_dir.display(),
            project = %self.project_name,
            skip_download = self.skip_download,
            "Loaded MirrorConfig"
        );
        debug!(?self, "MirrorConfig loaded (full debug)");
    }
}

/// HTTP transport settings for the listing and file downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// Deadline for a whole request, body included.
    pub fetch_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Maximum number of files downloaded at once; 1 fetches sequentially.
    pub concurrency: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 300,
            connect_timeout_secs: 30,
            concurrency: 1,
        }
    }
}

impl FetchSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Build the HTTP client shared by the listing source and the fetcher.
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.fetch_timeout())
            .connect_timeout(self.connect_timeout())
            .user_agent(concat!("release-index/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}
