use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything a generation run needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sources: SourceFiles,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("public/api"),
            sources: SourceFiles::default(),
        }
    }
}

impl GenerateConfig {
    /// Resolves a source file name against `data_dir`.
    pub fn source_path(&self, kind: crate::record::RecordKind) -> PathBuf {
        self.data_dir.join(self.sources.file_name(kind))
    }

    pub fn trace_loaded(&self) {
        info!(
            data_dir = %self.data_dir.display(),
            output_dir = %self.output_dir.display(),
            "Loaded GenerateConfig"
        );
        debug!(?self, "GenerateConfig loaded (full debug)");
    }
}

/// File names of the five researchmap exports, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceFiles {
    pub papers: String,
    pub presentations: String,
    pub misc: String,
    pub awards: String,
    pub research_projects: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            papers: "rm_published_papers.csv".to_string(),
            presentations: "rm_presentations.csv".to_string(),
            misc: "rm_misc.csv".to_string(),
            awards: "rm_awards.csv".to_string(),
            research_projects: "rm_research_projects.csv".to_string(),
        }
    }
}

impl SourceFiles {
    pub fn file_name(&self, kind: crate::record::RecordKind) -> &str {
        use crate::record::RecordKind;
        match kind {
            RecordKind::Paper => &self.papers,
            RecordKind::Presentation => &self.presentations,
            RecordKind::Misc => &self.misc,
            RecordKind::Award => &self.awards,
            RecordKind::ResearchProject => &self.research_projects,
        }
    }
}
