//! One pure summary function per chart.
//!
//! Every function borrows the table and returns freshly allocated rows.
//! Titles missing the attribute a chart groups on are skipped for that chart.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{ContentType, TitleTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub kind: ContentType,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingCount {
    pub rating: String,
    pub count: usize,
    pub movies: usize,
    pub tv_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDuration {
    pub country: String,
    pub mean_minutes: f64,
    /// Movies that contributed to the mean.
    pub titles: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSeries {
    pub kind: ContentType,
    pub points: Vec<YearCount>,
}

/// Number of titles per content type, movies first. Absent types are omitted.
pub fn type_distribution(table: &TitleTable) -> Vec<TypeCount> {
    let mut counts: BTreeMap<ContentType, usize> = BTreeMap::new();
    for rec in table {
        *counts.entry(rec.kind).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(kind, count)| TypeCount { kind, count })
        .collect()
}

/// Number of titles per timeline year, ascending.
pub fn titles_over_time(table: &TitleTable) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for rec in table {
        *counts.entry(rec.timeline_year()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Titles per rating, most frequent first; equal counts order by rating.
pub fn rating_breakdown(table: &TitleTable) -> Vec<RatingCount> {
    let mut by_rating: HashMap<&str, RatingCount> = HashMap::new();
    for rec in table {
        let Some(rating) = rec.rating.as_deref() else {
            continue;
        };
        let entry = by_rating.entry(rating).or_insert_with(|| RatingCount {
            rating: rating.to_string(),
            count: 0,
            movies: 0,
            tv_shows: 0,
        });
        entry.count += 1;
        match rec.kind {
            ContentType::Movie => entry.movies += 1,
            ContentType::TvShow => entry.tv_shows += 1,
        }
    }

    let mut rows: Vec<RatingCount> = by_rating.into_values().collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rating.cmp(&b.rating)));
    rows
}

/// Mean movie running time per primary country, longest first; equal means
/// order by country name.
pub fn duration_by_country(table: &TitleTable) -> Vec<CountryDuration> {
    mean_minutes_by_country(table, |_| true)
}

/// Like [`duration_by_country`], restricted to the `n` countries with the
/// most movies (ties broken by country name).
pub fn duration_by_top_countries(table: &TitleTable, n: usize) -> Vec<CountryDuration> {
    let mut movie_counts: HashMap<&str, usize> = HashMap::new();
    for rec in table.iter().filter(|r| r.kind == ContentType::Movie) {
        if let Some(country) = rec.primary_country() {
            *movie_counts.entry(country).or_default() += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = movie_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let top: Vec<&str> = ranked.into_iter().take(n).map(|(c, _)| c).collect();

    mean_minutes_by_country(table, |country| top.iter().any(|c| *c == country))
}

fn mean_minutes_by_country(
    table: &TitleTable,
    keep: impl Fn(&str) -> bool,
) -> Vec<CountryDuration> {
    // country -> (sum of minutes, movie count)
    let mut totals: HashMap<&str, (u64, usize)> = HashMap::new();
    for rec in table {
        let (Some(country), Some(minutes)) = (rec.primary_country(), rec.duration_minutes())
        else {
            continue;
        };
        if !keep(country) {
            continue;
        }
        let slot = totals.entry(country).or_default();
        slot.0 += u64::from(minutes);
        slot.1 += 1;
    }

    let mut rows: Vec<CountryDuration> = totals
        .into_iter()
        .map(|(country, (sum, n))| CountryDuration {
            country: country.to_string(),
            mean_minutes: sum as f64 / n as f64,
            titles: n,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.mean_minutes
            .total_cmp(&a.mean_minutes)
            .then_with(|| a.country.cmp(&b.country))
    });
    rows
}

/// Cumulative number of titles up to and including each timeline year.
pub fn growth_trend(table: &TitleTable) -> Vec<YearCount> {
    let mut running = 0;
    titles_over_time(table)
        .into_iter()
        .map(|YearCount { year, count }| {
            running += count;
            YearCount {
                year,
                count: running,
            }
        })
        .collect()
}

/// Titles per timeline year, one ascending series per content type present.
pub fn yearly_counts_by_type(table: &TitleTable) -> Vec<TypeSeries> {
    let mut counts: BTreeMap<ContentType, BTreeMap<i32, usize>> = BTreeMap::new();
    for rec in table {
        *counts
            .entry(rec.kind)
            .or_default()
            .entry(rec.timeline_year())
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(kind, years)| TypeSeries {
            kind,
            points: years
                .into_iter()
                .map(|(year, count)| YearCount { year, count })
                .collect(),
        })
        .collect()
}
