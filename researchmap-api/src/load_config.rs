//! `load_config` module: builds the [`GenerateConfig`] for a run from defaults, an optional
//! YAML file, the environment and CLI flags.
//!
//! # Layering
//! Lowest to highest precedence:
//!   1. Built-in defaults (`data/`, `public/api/`, researchmap's export file names)
//!   2. The YAML file passed with `--config`, every key optional
//!   3. `RESEARCHMAP_DATA_DIR` / `RESEARCHMAP_OUTPUT_DIR`
//!   4. `--data-dir` / `--output-dir`
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.
//!
//! Accepted YAML:
//!
//! ```yaml
//! data_dir: ./data
//! output_dir: ./public/api
//! sources:
//!   papers: rm_published_papers.csv
//!   research_projects: rm_research_projects.csv
//! ```

use anyhow::Result;
use researchmap_api_core::config::{GenerateConfig, SourceFiles};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const DATA_DIR_ENV: &str = "RESEARCHMAP_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "RESEARCHMAP_OUTPUT_DIR";

/// Shape of the optional YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub sources: Option<SourceFiles>,
}

/// Directory overrides given on the command line.
#[derive(Debug, Default, Clone)]
pub struct DirOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Reads and parses a YAML config file.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
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

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            info!(var = name, value = %value, "Using directory from environment");
            Some(PathBuf::from(value))
        }
        _ => None,
    }
}

/// Merges all configuration layers into the config passed to the pipeline.
pub fn load_config(
    config_path: Option<&Path>,
    overrides: &DirOverrides,
) -> Result<GenerateConfig> {
    let file = match config_path {
        Some(path) => read_config_file(path)?,
        None => FileConfig::default(),
    };

    let mut config = GenerateConfig::default();
    if let Some(sources) = file.sources {
        config.sources = sources;
    }

    config.data_dir = overrides
        .data_dir
        .clone()
        .or_else(|| env_path(DATA_DIR_ENV))
        .or(file.data_dir)
        .unwrap_or(config.data_dir);
    config.output_dir = overrides
        .output_dir
        .clone()
        .or_else(|| env_path(OUTPUT_DIR_ENV))
        .or(file.output_dir)
        .unwrap_or(config.output_dir);

    config.trace_loaded();
    Ok(config)
}
