//! High-level pipeline: load → filter → format → sort → publish.
//!
//! One call to [`generate`] is one build of the static API. Each of the five exports is
//! read through a [`TableReader`], closed rows are dropped, rows are formatted into their
//! record kind and sorted newest first. The resulting collections are then written through
//! an [`ArtifactSink`]: one file per collection, one file per kind per year for papers,
//! presentations and misc, and `years.json`.
//!
//! # Error Handling
//! Fail-fast. The first load or publish error aborts the run and is returned as-is;
//! artifacts already written are left in place.
//!
//! # Navigation
//! - Main entrypoint: [`generate`]
//! - In-memory half of the pipeline: [`build_collections`]

use tracing::{error, info, info_span};

use crate::config::GenerateConfig;
use crate::contract::{ArtifactSink, RawRow, TableReader};
use crate::error::GenerateError;
use crate::format;
use crate::load::filter_visible;
use crate::publish;
use crate::record::{Award, Presentation, Publication, RecordKind, ResearchProject};
use crate::sort;

/// Formatted and sorted collections of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub papers: Vec<Publication>,
    pub presentations: Vec<Presentation>,
    pub misc: Vec<Publication>,
    pub awards: Vec<Award>,
    pub research_projects: Vec<ResearchProject>,
}

impl Collections {
    /// Distinct years across papers, presentations and misc, newest first.
    pub fn years(&self) -> Vec<String> {
        let years = self
            .papers
            .iter()
            .map(|p| p.year.as_str())
            .chain(self.presentations.iter().map(|p| p.year.as_str()))
            .chain(self.misc.iter().map(|m| m.year.as_str()));
        publish::available_years(years)
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub kinds: Vec<KindReport>,
    pub years: Vec<String>,
    pub files_written: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport {
    pub kind: RecordKind,
    pub rows_read: usize,
    pub records_published: usize,
}

fn load_visible<R>(
    config: &GenerateConfig,
    reader: &R,
    kind: RecordKind,
    reports: &mut Vec<KindReport>,
) -> Result<Vec<RawRow>, GenerateError>
where
    R: TableReader + ?Sized,
{
    let path = config.source_path(kind);
    let rows = reader.read_table(&path).map_err(|e| {
        error!(%kind, error = %e, "Loading export failed");
        GenerateError::Load { kind, source: e }
    })?;
    let rows_read = rows.len();
    let visible = filter_visible(rows);
    info!(%kind, rows_read, visible = visible.len(), "Loaded export");
    reports.push(KindReport {
        kind,
        rows_read,
        records_published: visible.len(),
    });
    Ok(visible)
}

/// Reads, filters, formats and sorts all five exports.
///
/// Ids are made unique per kind in export order, before sorting.
pub fn build_collections<R>(
    config: &GenerateConfig,
    reader: &R,
) -> Result<(Collections, Vec<KindReport>), GenerateError>
where
    R: TableReader + ?Sized,
{
    let mut reports = Vec::with_capacity(RecordKind::ALL.len());

    let mut papers: Vec<Publication> =
        load_visible(config, reader, RecordKind::Paper, &mut reports)?
            .iter()
            .map(format::format_paper)
            .collect();
    let mut presentations: Vec<Presentation> =
        load_visible(config, reader, RecordKind::Presentation, &mut reports)?
            .iter()
            .map(format::format_presentation)
            .collect();
    let mut misc: Vec<Publication> = load_visible(config, reader, RecordKind::Misc, &mut reports)?
        .iter()
        .map(format::format_misc)
        .collect();
    let mut awards: Vec<Award> = load_visible(config, reader, RecordKind::Award, &mut reports)?
        .iter()
        .map(format::format_award)
        .collect();
    let mut research_projects: Vec<ResearchProject> =
        load_visible(config, reader, RecordKind::ResearchProject, &mut reports)?
            .iter()
            .map(format::format_research_project)
            .collect();

    format::disambiguate_ids(papers.iter_mut().map(|p| &mut p.id));
    format::disambiguate_ids(presentations.iter_mut().map(|p| &mut p.id));
    format::disambiguate_ids(misc.iter_mut().map(|m| &mut m.id));
    format::disambiguate_ids(awards.iter_mut().map(|a| &mut a.id));
    format::disambiguate_ids(research_projects.iter_mut().map(|r| &mut r.id));

    sort::sort_publications(&mut papers);
    sort::sort_presentations(&mut presentations);
    sort::sort_publications(&mut misc);
    sort::sort_awards(&mut awards);
    sort::sort_research_projects(&mut research_projects);

    Ok((
        Collections {
            papers,
            presentations,
            misc,
            awards,
            research_projects,
        },
        reports,
    ))
}

/// Writes every artifact of a run. Returns the number of files written.
pub fn publish_collections<S>(collections: &Collections, sink: &S) -> Result<usize, GenerateError>
where
    S: ArtifactSink + ?Sized,
{
    publish::publish_collection(sink, RecordKind::Paper, &collections.papers)?;
    publish::publish_collection(sink, RecordKind::Presentation, &collections.presentations)?;
    publish::publish_collection(sink, RecordKind::Misc, &collections.misc)?;
    publish::publish_collection(sink, RecordKind::Award, &collections.awards)?;
    publish::publish_collection(
        sink,
        RecordKind::ResearchProject,
        &collections.research_projects,
    )?;

    let years = collections.years();
    publish::publish_by_year(sink, RecordKind::Paper, &collections.papers, &years)?;
    publish::publish_by_year(
        sink,
        RecordKind::Presentation,
        &collections.presentations,
        &years,
    )?;
    publish::publish_by_year(sink, RecordKind::Misc, &collections.misc, &years)?;
    publish::publish_years_index(sink, &years)?;

    let partitioned = RecordKind::ALL
        .iter()
        .filter(|kind| kind.partitioned_by_year())
        .count();
    Ok(RecordKind::ALL.len() + partitioned * years.len() + 1)
}

/// Entrypoint: one full build of the static API.
pub fn generate<R, S>(
    config: &GenerateConfig,
    reader: &R,
    sink: &S,
) -> Result<GenerateReport, GenerateError>
where
    R: TableReader + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let span = info_span!("generate", output_dir = %config.output_dir.display());
    let _enter = span.enter();
    info!("[GENERATE] Starting static API generation");

    let (collections, kinds) = build_collections(config, reader)?;
    let files_written = publish_collections(&collections, sink)?;
    let years = collections.years();

    info!(files_written, years = years.len(), "[GENERATE] Static API generated");

    Ok(GenerateReport {
        kinds,
        years,
        files_written,
    })
}
