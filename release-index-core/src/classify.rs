//! Filename-based platform classification.
//!
//! Rules are evaluated in order and the first match wins; matching is
//! case-insensitive. Files matching no rule are dropped.

use tracing::debug;

use crate::contract::{CategorizedFiles, Platform};

fn is_mac(name: &str) -> bool {
    name.contains("macos")
        || name.contains("darwin")
        || name.ends_with(".pkg")
        || name.ends_with(".dmg")
}

fn is_windows(name: &str) -> bool {
    name.ends_with(".exe")
        || name.ends_with(".msi")
        || (name.ends_with(".zip") && (name.contains("win") || name.contains("embed")))
}

fn is_linux_tarball(name: &str) -> bool {
    name.ends_with(".tar.xz") || name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

fn is_other_archive(name: &str) -> bool {
    name.ends_with(".tar") || name.ends_with(".bz2") || name.ends_with(".xz")
}

/// Platform a release file belongs to, or `None` if it is not mirrored.
pub fn classify(filename: &str) -> Option<Platform> {
    let name = filename.to_lowercase();

    if is_mac(&name) {
        return Some(Platform::Mac);
    }
    if is_windows(&name) {
        return Some(Platform::Windows);
    }
    if is_linux_tarball(&name) {
        // A tarball naming another OS is not a Linux build, and no later rule applies.
        if name.contains("macos") || name.contains("win") {
            return None;
        }
        return Some(Platform::Linux);
    }
    if is_other_archive(&name) {
        return Some(Platform::Linux);
    }
    None
}

/// Bucket `files` by platform, keeping their relative order.
pub fn categorize<I, S>(files: I) -> CategorizedFiles
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut categorized = CategorizedFiles::default();
    for file in files {
        let file = file.into();
        match classify(&file) {
            Some(platform) => categorized.get_mut(platform).push(file),
            None => debug!(filename = %file, "Skipping file with no recognised platform"),
        }
    }
    categorized
}
