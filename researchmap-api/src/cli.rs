//! This module implements the CLI interface for researchmap-api: argument parsing and the
//! `run` entrypoint shared by `main` and the integration tests.
//!
//! All pipeline logic (loading, formatting, sorting, publishing) lives in
//! [`researchmap-api-core`]. This module is glue: it resolves configuration, opens the
//! output directory and reports what was generated.
//!
//! Invoked without arguments it reads `data/rm_*.csv` and writes `public/api/`.
//!
//! [`researchmap-api-core`]: ../../researchmap-api-core/

use crate::load_config::{load_config, DirOverrides};
use anyhow::{Context, Result};
use clap::Parser;
use researchmap_api_core::generate::{generate, GenerateReport};
use researchmap_api_core::load::CsvTableReader;
use researchmap_api_core::publish::DirectorySink;
use std::path::PathBuf;

/// Generate the website's static JSON API from researchmap CSV exports.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "researchmap-api",
    version,
    about = "Generate static JSON for papers, presentations, misc, awards and research projects from researchmap exports"
)]
pub struct Cli {
    /// Optional YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the rm_*.csv exports
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the JSON files are written to
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
}

/// Extracted CLI logic entrypoint for integration tests and main()
pub fn run(cli: Cli) -> Result<GenerateReport> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let overrides = DirOverrides {
        data_dir: cli.data_dir,
        output_dir: cli.output_dir,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    tracing::info!(command = "generate", "Starting static API generation");
    let sink = DirectorySink::create(&config.output_dir).with_context(|| {
        format!(
            "Failed to prepare output directory {}",
            config.output_dir.display()
        )
    })?;

    let result = match generate(&config, &CsvTableReader::new(), &sink) {
        Ok(report) => {
            tracing::info!(command = "generate", ?report, "Generation complete");
            println!(
                "Generated {} files in {}",
                report.files_written,
                sink.output_dir().display()
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(command = "generate", error = %e, "Generation failed");
            Err(anyhow::Error::new(e).context("Static API generation failed"))
        }
    };

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(success = result.is_ok(), "run finished");
    });

    result
}
