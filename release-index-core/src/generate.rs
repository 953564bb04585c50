//! # generate: PyPI "Simple" repository writer
//!
//! Renders, per platform `P` and project `N`:
//!
//! ```text
//! <output>/<P>/simple/index.html       one link: N/
//! <output>/<P>/simple/<N>/index.html   one link per artifact
//! ```
//!
//! Templates are static, so identical inputs always produce identical bytes.
//! Both files of a platform are written to temporary siblings first and only
//! renamed into place once both are complete; a failed root rename rolls the
//! project index back.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::contract::{Artifact, Platform, PlatformArtifacts};
use crate::error::{FilesystemError, MirrorError};

pub const INDEX_FILE: &str = "index.html";

/// Paths of the two index files written for a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIndex {
    pub platform: Platform,
    pub root_index: PathBuf,
    pub project_index: PathBuf,
}

/// Escape text and attribute values the way an auto-escaping HTML template does.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reject project names that would escape `<output>/<P>/simple/`.
pub fn validate_project_name(project: &str) -> Result<(), MirrorError> {
    if project.trim().is_empty() {
        return Err(MirrorError::Config("project name must not be empty".into()));
    }
    if project.contains('/') || project.contains('\\') || project == "." || project == ".." {
        return Err(MirrorError::Config(format!(
            "project name {project:?} must be a single path segment"
        )));
    }
    Ok(())
}

pub fn render_root_index(project: &str) -> String {
    let project = escape_html(project);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    <title>Simple Index</title>\n</head>\n\
         <body>\n    <h1>Simple Index</h1>\n    <a href=\"{project}/\">{project}</a>\n</body>\n\
         </html>\n"
    )
}

/// Link target for an artifact. Unverified artifacts get no `#sha256=` fragment.
fn artifact_href(artifact: &Artifact) -> String {
    match &artifact.sha256 {
        Some(digest) => format!("{}#sha256={}", artifact.url, digest),
        None => artifact.url.clone(),
    }
}

pub fn render_project_index(project: &str, artifacts: &[Artifact]) -> String {
    let project = escape_html(project);
    let mut html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    <title>Links for {project}</title>\n</head>\n\
         <body>\n    <h1>Links for {project}</h1>\n"
    );
    for artifact in artifacts {
        html.push_str(&format!(
            "    <a href=\"{}\">{}</a><br>\n",
            escape_html(&artifact_href(artifact)),
            escape_html(&artifact.filename)
        ));
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Write `contents` to a temporary file inside `dir`, ready to be persisted.
fn stage(dir: &Path, contents: &[u8]) -> Result<NamedTempFile, FilesystemError> {
    let mut file = tempfile::Builder::new()
        .prefix(".index-")
        .suffix(".html")
        .tempfile_in(dir)
        .map_err(|e| FilesystemError::new(dir, e))?;
    file.write_all(contents)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| FilesystemError::new(file.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| FilesystemError::new(file.path(), e))?;
    }

    Ok(file)
}

/// Copy of the current project index, if any, so a half-written pair can be undone.
fn previous_project_index(
    project_dir: &Path,
    project_index: &Path,
) -> Result<Option<NamedTempFile>, FilesystemError> {
    match fs::read(project_index) {
        Ok(contents) => stage(project_dir, &contents).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FilesystemError::new(project_index, e)),
    }
}

/// Put the project index back to its state before this run.
fn restore_project_index(previous: Option<NamedTempFile>, project_index: &Path) {
    let restored = match previous {
        Some(backup) => backup.persist(project_index).map(|_| ()).map_err(|e| e.error),
        None => fs::remove_file(project_index),
    };
    if let Err(e) = restored {
        warn!(path = %project_index.display(), error = %e, "Failed to restore previous project index");
    }
}

/// Write both index files for one platform.
///
/// The project index is replaced first and rolled back if the root index
/// cannot be put in place, so either both files are new or neither is.
pub fn generate_platform(
    output_dir: &Path,
    project: &str,
    platform: Platform,
    artifacts: &[Artifact],
) -> Result<PlatformIndex, FilesystemError> {
    let simple_dir = output_dir.join(platform.as_str()).join("simple");
    let project_dir = simple_dir.join(project);
    fs::create_dir_all(&project_dir).map_err(|e| FilesystemError::new(&project_dir, e))?;
    debug!(path = %project_dir.display(), "Created project directory");

    let project_index = project_dir.join(INDEX_FILE);
    let root_index = simple_dir.join(INDEX_FILE);

    let project_staged = stage(&project_dir, render_project_index(project, artifacts).as_bytes())?;
    let root_staged = stage(&simple_dir, render_root_index(project).as_bytes())?;
    let previous = previous_project_index(&project_dir, &project_index)?;

    project_staged
        .persist(&project_index)
        .map_err(|e| FilesystemError::new(&project_index, e.error))?;
    if let Err(e) = root_staged.persist(&root_index) {
        restore_project_index(previous, &project_index);
        return Err(FilesystemError::new(&root_index, e.error));
    }

    info!(
        platform = %platform,
        artifacts = artifacts.len(),
        path = %simple_dir.display(),
        "Generated simple index"
    );
    Ok(PlatformIndex {
        platform,
        root_index,
        project_index,
    })
}

/// Generate the index pair for every platform, stopping at the first failure.
///
/// Platforms without artifacts still get an (empty) project index.
pub fn generate_tree(
    output_dir: &Path,
    project: &str,
    artifacts: &PlatformArtifacts,
) -> Result<Vec<PlatformIndex>, MirrorError> {
    validate_project_name(project)?;
    Platform::ALL
        .iter()
        .map(|&platform| {
            generate_platform(output_dir, project, platform, artifacts.get(platform))
                .map_err(|source| MirrorError::Filesystem { platform, source })
        })
        .collect()
}
