//! Projection of raw export rows into the published record shapes.
//!
//! Every bilingual field follows the same rule: take the preferred language if it has
//! text, otherwise the other language, otherwise a per-field default. English fields
//! prefer English and Japanese fields prefer Japanese.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::contract::RawRow;
use crate::record::{Award, Misc, Paper, Presentation, Publication, RecordKind, ResearchProject};

pub mod columns {
    pub const ID: &str = "ID";
    pub const DOI: &str = "DOI";
    pub const MAIN_WORK: &str = "主要な業績かどうか";

    pub const TITLE_EN: &str = "タイトル(英語)";
    pub const TITLE_JA: &str = "タイトル(日本語)";
    pub const AUTHORS_EN: &str = "著者(英語)";
    pub const AUTHORS_JA: &str = "著者(日本語)";
    pub const JOURNAL_EN: &str = "誌名(英語)";
    pub const JOURNAL_JA: &str = "誌名(日本語)";
    pub const PUBLISHED: &str = "出版年月";

    pub const SPEAKERS_EN: &str = "講演者(英語)";
    pub const SPEAKERS_JA: &str = "講演者(日本語)";
    pub const CONFERENCE_EN: &str = "会議名(英語)";
    pub const CONFERENCE_JA: &str = "会議名(日本語)";
    pub const PRESENTED_ON: &str = "発表年月日";
    pub const HELD_FROM: &str = "開催年月日(From)";
    pub const PLACE_EN: &str = "開催地(英語)";
    pub const PLACE_JA: &str = "開催地(日本語)";
    pub const COUNTRY: &str = "国・地域";
    pub const INVITED: &str = "招待の有無";

    pub const AWARD_EN: &str = "賞名(英語)";
    pub const AWARD_JA: &str = "賞名(日本語)";
    pub const AWARDER_EN: &str = "授与機関(英語)";
    pub const AWARDER_JA: &str = "授与機関(日本語)";
    pub const AWARDED: &str = "受賞年月";

    pub const PROGRAM_EN: &str = "制度名(英語)";
    pub const PROGRAM_JA: &str = "制度名(日本語)";
    pub const CATEGORY_EN: &str = "研究種目(英語)";
    pub const CATEGORY_JA: &str = "研究種目(日本語)";
    pub const FUNDER_EN: &str = "提供機関(英語)";
    pub const FUNDER_JA: &str = "提供機関(日本語)";
    pub const GRANT_NUMBER: &str = "課題番号";
    pub const PERIOD_FROM: &str = "研究期間(From)";
    pub const PERIOD_TO: &str = "研究期間(To)";
}

use columns::*;

pub const UNTITLED: &str = "Untitled";

const GENERATED_ID_LEN: usize = 9;

static LIST_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[|\]$").expect("valid regex"));
static TRAILING_BACKSLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\$").expect("valid regex"));

/// First of `preferred`, `fallback` that has text, else `default`.
pub fn coalesce(row: &RawRow, preferred: &str, fallback: &str, default: &str) -> String {
    row.non_empty(preferred)
        .or_else(|| row.non_empty(fallback))
        .unwrap_or(default)
        .to_string()
}

/// Like [`coalesce`], for person lists exported as `[A, B\]`.
///
/// The side is picked on the raw value, so a list that is empty after stripping does not
/// fall back to the other language.
pub fn person_list(row: &RawRow, preferred: &str, fallback: &str) -> String {
    row.non_empty(preferred)
        .or_else(|| row.non_empty(fallback))
        .map(strip_person_list)
        .unwrap_or_default()
}

/// Removes a leading `[`, a trailing `]`, then one trailing backslash.
pub fn strip_person_list(raw: &str) -> String {
    let unbracketed = LIST_BRACKETS.replace_all(raw, "");
    if unbracketed.is_empty() {
        return String::new();
    }
    TRAILING_BACKSLASH.replace(&unbracketed, "").into_owned()
}

/// Characters `[0, 4)` of a `YYYY-MM...` date.
pub fn year_of(date: Option<&str>) -> String {
    date.map(|d| d.chars().take(4).collect())
        .unwrap_or_default()
}

/// Characters `[5, 7)` of a `YYYY-MM...` date.
pub fn month_of(date: Option<&str>) -> String {
    date.map(|d| d.chars().skip(5).take(2).collect())
        .unwrap_or_default()
}

/// researchmap exports flags as `TRUE`/`True`/`true`/`1`; anything else is false.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some("TRUE" | "True" | "true" | "1"))
}

/// The row's `ID`, or a stable id derived from the given fields when it has none.
///
/// Derived ids look like `paper-1a2b3c4d5` and only change when the hashed fields do.
/// Callers pass every formatted field that tells two records apart; rows that are
/// identical in all of them are separated afterwards by [`disambiguate_ids`].
pub fn record_id(row: &RawRow, kind: RecordKind, seed: &[&str]) -> String {
    if let Some(id) = row.non_empty(ID) {
        return id.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(kind.id_prefix().as_bytes());
    for part in seed {
        hasher.update(b"\x1f");
        hasher.update(part.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("{}-{}", kind.id_prefix(), &digest[..GENERATED_ID_LEN])
}

/// Makes the ids of one collection unique, in export order.
///
/// The second occurrence of an id becomes `<id>-2`, the third `<id>-3` and so on, so the
/// same export always yields the same ids.
pub fn disambiguate_ids<'a, I>(ids: I)
where
    I: IntoIterator<Item = &'a mut String>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.insert(id.clone()) {
            continue;
        }
        let mut occurrence = 2;
        let unique = loop {
            let candidate = format!("{id}-{occurrence}");
            if seen.insert(candidate.clone()) {
                break candidate;
            }
            occurrence += 1;
        };
        debug!(duplicate = %id, id = %unique, "Renamed repeated record id");
        *id = unique;
    }
}

fn format_publication(row: &RawRow, kind: RecordKind) -> Publication {
    let title = coalesce(row, TITLE_EN, TITLE_JA, UNTITLED);
    let title_ja = coalesce(row, TITLE_JA, TITLE_EN, UNTITLED);
    let authors = person_list(row, AUTHORS_EN, AUTHORS_JA);
    let authors_ja = person_list(row, AUTHORS_JA, AUTHORS_EN);
    let journal = coalesce(row, JOURNAL_EN, JOURNAL_JA, "");
    let journal_ja = coalesce(row, JOURNAL_JA, JOURNAL_EN, "");
    let published = row.non_empty(PUBLISHED);
    let doi = row.non_empty(DOI).unwrap_or_default().to_string();

    let id = record_id(
        row,
        kind,
        &[
            title.as_str(),
            title_ja.as_str(),
            authors.as_str(),
            authors_ja.as_str(),
            journal.as_str(),
            journal_ja.as_str(),
            published.unwrap_or_default(),
            doi.as_str(),
        ],
    );

    Publication {
        id,
        title,
        title_ja,
        authors,
        authors_ja,
        journal,
        journal_ja,
        year: year_of(published),
        month: month_of(published),
        doi,
        is_main_work: is_truthy(row.get(MAIN_WORK)),
    }
}

pub fn format_paper(row: &RawRow) -> Paper {
    format_publication(row, RecordKind::Paper)
}

pub fn format_misc(row: &RawRow) -> Misc {
    format_publication(row, RecordKind::Misc)
}

pub fn format_presentation(row: &RawRow) -> Presentation {
    let title = coalesce(row, TITLE_EN, TITLE_JA, UNTITLED);
    let title_ja = coalesce(row, TITLE_JA, TITLE_EN, UNTITLED);
    let speakers = person_list(row, SPEAKERS_EN, SPEAKERS_JA);
    let speakers_ja = person_list(row, SPEAKERS_JA, SPEAKERS_EN);
    let conference = coalesce(row, CONFERENCE_EN, CONFERENCE_JA, "");
    let conference_ja = coalesce(row, CONFERENCE_JA, CONFERENCE_EN, "");
    let date = row
        .non_empty(PRESENTED_ON)
        .or_else(|| row.non_empty(HELD_FROM))
        .unwrap_or_default()
        .to_string();
    let place = row
        .non_empty(PLACE_EN)
        .or_else(|| row.non_empty(PLACE_JA))
        .or_else(|| row.non_empty(COUNTRY))
        .unwrap_or_default()
        .to_string();
    let place_ja = coalesce(row, PLACE_JA, PLACE_EN, "");
    let is_invited = is_truthy(row.get(INVITED));

    let id = record_id(
        row,
        RecordKind::Presentation,
        &[
            title.as_str(),
            title_ja.as_str(),
            speakers.as_str(),
            speakers_ja.as_str(),
            conference.as_str(),
            conference_ja.as_str(),
            date.as_str(),
            place.as_str(),
            place_ja.as_str(),
        ],
    );

    Presentation {
        id,
        title,
        title_ja,
        speakers,
        speakers_ja,
        conference,
        conference_ja,
        year: year_of(Some(date.as_str())),
        date,
        place,
        place_ja,
        is_invited,
    }
}

pub fn format_award(row: &RawRow) -> Award {
    let title = coalesce(row, AWARD_EN, AWARD_JA, "");
    let title_ja = coalesce(row, AWARD_JA, AWARD_EN, "");
    let awarder = coalesce(row, AWARDER_EN, AWARDER_JA, "");
    let awarder_ja = coalesce(row, AWARDER_JA, AWARDER_EN, "");
    let awarded = row.non_empty(AWARDED);

    let id = record_id(
        row,
        RecordKind::Award,
        &[
            title.as_str(),
            title_ja.as_str(),
            awarder.as_str(),
            awarder_ja.as_str(),
            awarded.unwrap_or_default(),
        ],
    );

    Award {
        id,
        title,
        title_ja,
        awarder,
        awarder_ja,
        year: year_of(awarded),
        month: month_of(awarded),
        is_main_work: is_truthy(row.get(MAIN_WORK)),
    }
}

pub fn format_research_project(row: &RawRow) -> ResearchProject {
    let title = coalesce(row, PROGRAM_EN, PROGRAM_JA, "");
    let title_ja = coalesce(row, PROGRAM_JA, PROGRAM_EN, "");
    let description = coalesce(row, TITLE_EN, TITLE_JA, "");
    let description_ja = coalesce(row, TITLE_JA, TITLE_EN, "");
    let subject = coalesce(row, CATEGORY_EN, CATEGORY_JA, "");
    let subject_ja = coalesce(row, CATEGORY_JA, CATEGORY_EN, "");
    let funder = coalesce(row, FUNDER_EN, FUNDER_JA, "");
    let funder_ja = coalesce(row, FUNDER_JA, FUNDER_EN, "");
    let number = row.non_empty(GRANT_NUMBER).unwrap_or_default().to_string();
    let from = row.non_empty(PERIOD_FROM);
    let to = row.non_empty(PERIOD_TO);

    let id = record_id(
        row,
        RecordKind::ResearchProject,
        &[
            title.as_str(),
            title_ja.as_str(),
            description.as_str(),
            description_ja.as_str(),
            subject.as_str(),
            subject_ja.as_str(),
            funder.as_str(),
            funder_ja.as_str(),
            number.as_str(),
            from.unwrap_or_default(),
            to.unwrap_or_default(),
        ],
    );

    ResearchProject {
        id,
        title,
        title_ja,
        subject,
        subject_ja,
        funder,
        funder_ja,
        number,
        year_from: year_of(from),
        month_from: month_of(from),
        year_to: year_of(to),
        month_to: month_of(to),
        is_main_work: is_truthy(row.get(MAIN_WORK)),
        description,
        description_ja,
    }
}
