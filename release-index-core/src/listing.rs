//! Directory-listing retrieval and anchor extraction.
//!
//! Only `<a href="...">` values are of interest: parent and sub-directory
//! links are skipped, as are signature, certificate and SBOM files which are
//! never mirrored.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::contract::ListingSource;
use crate::error::{ListingError, ListingErrorKind};

/// Suffixes of files that accompany a release but are not installable artifacts.
const IGNORED_SUFFIXES: [&str; 4] = [".sig", ".crt", ".sigstore", ".spdx.json"];

/// Compiled once from a constant pattern.
fn anchor_regex() -> &'static Regex {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    ANCHOR.get_or_init(|| {
        Regex::new(r#"(?i)<a\s+href="([^"]+)"[^>]*>"#).expect("anchor pattern is valid")
    })
}

/// Extract the file hrefs of a listing document, in document order.
///
/// Values are taken literally (no entity decoding). Repeated hrefs are kept.
pub fn parse_listing(html: &str) -> Vec<String> {
    anchor_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|href| *href != "../")
        .filter(|href| !href.ends_with('/'))
        .filter(|href| !IGNORED_SUFFIXES.iter().any(|suffix| href.ends_with(suffix)))
        .map(str::to_owned)
        .collect()
}

/// Fetch the listing at `url` through `source` and return its file hrefs.
pub async fn list_files<S>(source: &S, url: &str) -> Result<Vec<String>, ListingError>
where
    S: ListingSource + ?Sized,
{
    let html = source.fetch_listing(url).await?;
    let files = parse_listing(&html);
    debug!(url = %url, count = files.len(), "Found files in directory listing");
    Ok(files)
}

/// [`ListingSource`] backed by a shared `reqwest::Client`.
pub struct HttpListingSource {
    client: reqwest::Client,
}

impl HttpListingSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self, url: &str) -> Result<String, ListingError> {
        let error = |kind| ListingError {
            url: url.to_string(),
            kind,
        };

        info!(url = %url, "Fetching directory listing");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| error(ListingErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error(ListingErrorKind::Status(status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| error(ListingErrorKind::Body(e.to_string())))
    }
}
