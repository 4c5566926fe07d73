//! Newest-first ordering of formatted collections.
//!
//! All sorts are stable: records with equal keys, and records whose key cannot be
//! read, keep their export order. Unreadable keys go last.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::record::{Award, Presentation, Publication, ResearchProject};

/// Numeric value of `year ++ month`, e.g. `"2023" + "05"` → `202305`.
///
/// `None` for an empty or non-numeric concatenation.
pub fn year_month_key(year: &str, month: &str) -> Option<u64> {
    let joined = format!("{year}{month}");
    joined.trim().parse::<u64>().ok()
}

/// Parses the date forms researchmap uses for presentations.
///
/// Month-only and year-only dates resolve to the first day of the period. Dates with a
/// time part (`2023-05-01T10:00:00`) are not read and sort with the unparsable ones.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for separator in ['-', '/'] {
        let mut parts = raw.splitn(2, separator);
        if let (Some(year), Some(month)) = (parts.next(), parts.next()) {
            if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
                return NaiveDate::from_ymd_opt(year, month, 1);
            }
        }
    }
    if raw.len() == 4 {
        if let Ok(year) = raw.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

/// Descending by key, `None` last.
fn newest_first<K: Ord>(a: &Option<K>, b: &Option<K>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_publications(records: &mut [Publication]) {
    records.sort_by(|a, b| {
        newest_first(
            &year_month_key(&a.year, &a.month),
            &year_month_key(&b.year, &b.month),
        )
    });
}

pub fn sort_awards(records: &mut [Award]) {
    records.sort_by(|a, b| {
        newest_first(
            &year_month_key(&a.year, &a.month),
            &year_month_key(&b.year, &b.month),
        )
    });
}

pub fn sort_research_projects(records: &mut [ResearchProject]) {
    records.sort_by(|a, b| {
        newest_first(
            &year_month_key(&a.year_from, &a.month_from),
            &year_month_key(&b.year_from, &b.month_from),
        )
    });
}

pub fn sort_presentations(records: &mut [Presentation]) {
    records.sort_by(|a, b| {
        newest_first(&parse_calendar_date(&a.date), &parse_calendar_date(&b.date))
    });
}
