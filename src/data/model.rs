use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// ContentType – Movie or TV Show
// ---------------------------------------------------------------------------

/// The two kinds of title in the catalogue.
///
/// Ordered `Movie < TvShow` so grouped summaries list movies first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContentType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    /// Label used by the source dataset.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Words may be separated by runs of spaces or underscores, never split.
        let norm = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match norm.as_str() {
            "movie" => Ok(ContentType::Movie),
            "tv show" => Ok(ContentType::TvShow),
            _ => Err(format!("unknown content type '{}'", s.trim())),
        }
    }
}

// ---------------------------------------------------------------------------
// Duration – minutes for movies, seasons for shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Duration {
    Minutes(u32),
    Seasons(u32),
}

impl Duration {
    /// Parse `"90 min"`, `"1 Season"`, `"3 Seasons"`.
    ///
    /// A bare number takes its unit from `kind`. Returns `None` when no
    /// leading number is found.
    pub fn parse(s: &str, kind: ContentType) -> Option<Self> {
        let s = s.trim();
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        let value: u32 = digits.parse().ok()?;
        let unit = s[digits.len()..].trim().to_ascii_lowercase();

        if unit.starts_with("min") {
            Some(Duration::Minutes(value))
        } else if unit.starts_with("season") {
            Some(Duration::Seasons(value))
        } else if unit.is_empty() {
            Some(match kind {
                ContentType::Movie => Duration::Minutes(value),
                ContentType::TvShow => Duration::Seasons(value),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duration::Minutes(m) => write!(f, "{m} min"),
            Duration::Seasons(1) => write!(f, "1 Season"),
            Duration::Seasons(n) => write!(f, "{n} Seasons"),
        }
    }
}

// ---------------------------------------------------------------------------
// TitleRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single Movie or TV Show entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecord {
    pub id: String,
    pub kind: ContentType,
    pub title: String,
    /// Production countries in source order; the first is the primary one.
    pub countries: Vec<String>,
    pub date_added: Option<NaiveDate>,
    pub release_year: i32,
    pub rating: Option<String>,
    pub duration: Option<Duration>,
    pub genres: Vec<String>,
}

impl TitleRecord {
    pub fn year_added(&self) -> Option<i32> {
        self.date_added.map(|d| d.year())
    }

    /// Year the title appears on the timeline charts: the year it was added,
    /// falling back to its release year.
    pub fn timeline_year(&self) -> i32 {
        self.year_added().unwrap_or(self.release_year)
    }

    pub fn primary_country(&self) -> Option<&str> {
        self.countries.first().map(String::as_str)
    }

    /// Running time in minutes. Only movies carry one.
    pub fn duration_minutes(&self) -> Option<u32> {
        match (self.kind, self.duration) {
            (ContentType::Movie, Some(Duration::Minutes(m))) => Some(m),
            _ => None,
        }
    }
}

/// Split a comma-separated cell into trimmed, non-empty entries.
pub fn split_list(cell: Option<&str>) -> Vec<String> {
    cell.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// TitleTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable table of titles with its release-year span precomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleTable {
    pub records: Vec<TitleRecord>,
    /// `(min, max)` release year over all records; `None` when empty.
    pub release_years: Option<(i32, i32)>,
}

impl TitleTable {
    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        let release_years = records.iter().fold(None, |span, r| match span {
            None => Some((r.release_year, r.release_year)),
            Some((lo, hi)) => Some((lo.min(r.release_year), hi.max(r.release_year))),
        });
        TitleTable {
            records,
            release_years,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TitleRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a TitleTable {
    type Item = &'a TitleRecord;
    type IntoIter = std::slice::Iter<'a, TitleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
