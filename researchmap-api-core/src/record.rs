//! Output shapes of the published JSON API.
//!
//! Field order in each struct is the key order in the emitted JSON, so keep it stable:
//! the website build reads these files directly.

use serde::Serialize;
use std::fmt;

/// The five researchmap export kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Paper,
    Presentation,
    Misc,
    Award,
    ResearchProject,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Paper,
        RecordKind::Presentation,
        RecordKind::Misc,
        RecordKind::Award,
        RecordKind::ResearchProject,
    ];

    /// Prefix of generated ids, e.g. `paper-3fa2c91d0`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            RecordKind::Paper => "paper",
            RecordKind::Presentation => "presentation",
            RecordKind::Misc => "misc",
            RecordKind::Award => "award",
            RecordKind::ResearchProject => "researchProject",
        }
    }

    /// Stem of the collection file, e.g. `papers` for `papers.json` and `papers-2023.json`.
    pub fn file_stem(self) -> &'static str {
        match self {
            RecordKind::Paper => "papers",
            RecordKind::Presentation => "presentations",
            RecordKind::Misc => "misc",
            RecordKind::Award => "awards",
            RecordKind::ResearchProject => "researchProjects",
        }
    }

    /// Whether the collection is also split into per-year files.
    pub fn partitioned_by_year(self) -> bool {
        matches!(
            self,
            RecordKind::Paper | RecordKind::Presentation | RecordKind::Misc
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// A published paper or a misc publication; both exports share the same columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub title_ja: String,
    pub authors: String,
    pub authors_ja: String,
    pub journal: String,
    pub journal_ja: String,
    pub year: String,
    pub month: String,
    pub doi: String,
    pub is_main_work: bool,
}

pub type Paper = Publication;
pub type Misc = Publication;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: String,
    pub title: String,
    pub title_ja: String,
    pub speakers: String,
    pub speakers_ja: String,
    pub conference: String,
    pub conference_ja: String,
    pub date: String,
    pub year: String,
    pub place: String,
    pub place_ja: String,
    pub is_invited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub id: String,
    pub title: String,
    pub title_ja: String,
    pub awarder: String,
    pub awarder_ja: String,
    pub year: String,
    pub month: String,
    pub is_main_work: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProject {
    pub id: String,
    pub title: String,
    pub title_ja: String,
    pub subject: String,
    pub subject_ja: String,
    pub funder: String,
    pub funder_ja: String,
    pub description: String,
    pub description_ja: String,
    pub number: String,
    pub year_from: String,
    pub month_from: String,
    pub year_to: String,
    pub month_to: String,
    pub is_main_work: bool,
}

/// Records that belong to a single calendar year.
pub trait Dated {
    fn year(&self) -> &str;
}

impl Dated for Publication {
    fn year(&self) -> &str {
        &self.year
    }
}

impl Dated for Presentation {
    fn year(&self) -> &str {
        &self.year
    }
}
