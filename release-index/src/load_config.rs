/// `load_config` module: loads the optional YAML config file into a [`MirrorConfig`].
///
/// Every key is optional; missing keys keep the built-in defaults and unknown
/// keys are rejected so typos do not silently fall back to a default.
///
/// ```yaml
/// source_url: https://www.python.org/ftp/python/3.14.0/
/// output_dir: releases
/// project_name: python
/// skip_download: false
/// fetch:
///   fetch_timeout_secs: 300
///   connect_timeout_secs: 30
///   concurrency: 4
/// ```
use anyhow::Result;
use release_index_core::config::MirrorConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MirrorConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<MirrorConfig>(&config_content) {
        Ok(config) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(config)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
