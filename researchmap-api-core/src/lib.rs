#![doc = "researchmap-api-core: core pipeline for researchmap-api."]

//! This crate turns researchmap CSV exports into the static JSON API served by the
//! website: loading, visibility filtering, bilingual formatting, sorting and publishing.
//! The CLI crate only wires configuration and logging around [`generate::generate`].

pub mod config;
pub mod contract;
pub mod error;
pub mod format;
pub mod generate;
pub mod load;
pub mod publish;
pub mod record;
pub mod sort;

pub use config::{GenerateConfig, SourceFiles};
pub use error::{GenerateError, SinkError, TableError};
pub use generate::{generate, GenerateReport};
