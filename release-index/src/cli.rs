///
/// This module implements the CLI interface for release-index: command parsing,
/// merging flags with the optional config file, invoking the core pipeline and
/// printing the run summary.
///
/// All pipeline logic (parsing, classification, fetching, index generation)
/// lives in the [`release-index-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: `release-index generate --help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`release-index-core`]: ../../release-index-core/
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use release_index_core::config::MirrorConfig;
use release_index_core::mirror::{run_mirror, MirrorReport};
use std::io::Write;
use std::path::PathBuf;

/// CLI for release-index: publish release files as per-OS PyPI Simple repositories.
#[derive(Parser, Debug)]
#[clap(
    name = "release-index",
    version,
    about = "Generate PyPI Simple repository structure from release files",
    long_about = "Generate PyPI Simple repository format from a release directory listing.\n\
                  Files are split by target OS (Linux, macOS, Windows) and each OS gets its\n\
                  own repository tree, e.g. for separate proxy repositories."
)]
pub struct Cli {
    /// Log level (debug, info, warn, error)
    #[clap(long, short = 'l', global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Format of the log lines and the final summary (json, text)
    #[clap(long, short = 'f', global = true, value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download release files, hash them and write per-OS PyPI Simple indexes
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Source URL to fetch files from [default: https://www.python.org/ftp/python/3.14.0/]
    #[clap(long, short = 'u')]
    pub url: Option<String>,

    /// Output directory for generated structure [default: releases]
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Project name for PyPI repository [default: python]
    #[clap(long, short = 'p')]
    pub project: Option<String>,

    /// Skip downloading files; links are published without sha256 hashes
    #[clap(long)]
    pub skip_download: bool,

    /// Path to a YAML config file; flags override its values
    #[clap(long, env = "RELEASE_INDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of files downloaded at once [default: 1]
    #[clap(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds [default: 300]
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory for downloaded files [default: <output>/temp-downloads]
    #[clap(long)]
    pub staging_dir: Option<PathBuf>,
}

impl GenerateArgs {
    /// Overlay the flags that were given on top of `base`.
    pub fn apply(&self, mut base: MirrorConfig) -> MirrorConfig {
        if let Some(url) = &self.url {
            base.source_url = url.clone();
        }
        if let Some(output) = &self.output {
            base.output_dir = output.clone();
        }
        if let Some(project) = &self.project {
            base.project_name = project.clone();
        }
        if self.skip_download {
            base.skip_download = true;
        }
        if let Some(concurrency) = self.concurrency {
            base.fetch.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            base.fetch.fetch_timeout_secs = timeout;
        }
        if let Some(staging_dir) = &self.staging_dir {
            base.staging_dir = Some(staging_dir.clone());
        }
        base
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Defaults, then the config file (if any), then command-line flags.
pub fn resolve_config(args: &GenerateArgs) -> Result<MirrorConfig> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => MirrorConfig::default(),
    };
    Ok(args.apply(base))
}

/// Render the end-of-run summary in the requested format.
pub fn render_report(report: &MirrorReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string(report).context("failed to serialise run summary")
        }
        OutputFormat::Text => {
            let mut text = format!(
                "Generated PyPI Simple repositories for '{}' in {}\n",
                report.project,
                report.output_directory.display()
            );
            text.push_str(&format!("  linux:   {}\n", report.platforms.linux));
            text.push_str(&format!("  mac:     {}\n", report.platforms.mac));
            text.push_str(&format!("  windows: {}\n", report.platforms.windows));
            if !report.verified {
                text.push_str("  warning: downloads were skipped; links carry no sha256 hash\n");
            }
            Ok(text)
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let config = resolve_config(&args)?;
            tracing::info!(command = "generate", "Starting generation process");

            let report = match run_mirror(&config).await {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(command = "generate", stage = e.stage(), error = %e, "Generation failed");
                    return Err(anyhow::Error::new(e).context("generation failed"));
                }
            };
            tracing::info!(command = "generate", ?report, "Generation complete");

            let summary = render_report(&report, cli.output_format)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", summary.trim_end()).context("failed to write summary")?;
            Ok(())
        }
    }
}
