use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{ContentType, TitleRecord, TitleTable};

// ---------------------------------------------------------------------------
// Filter criteria: which content type, which release years
// ---------------------------------------------------------------------------

/// Content type selector offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSelection {
    Movie,
    TvShow,
    #[default]
    Both,
}

impl TypeSelection {
    pub const ALL: [TypeSelection; 3] = [
        TypeSelection::Both,
        TypeSelection::Movie,
        TypeSelection::TvShow,
    ];

    pub fn accepts(self, kind: ContentType) -> bool {
        match self {
            TypeSelection::Both => true,
            TypeSelection::Movie => kind == ContentType::Movie,
            TypeSelection::TvShow => kind == ContentType::TvShow,
        }
    }
}

impl fmt::Display for TypeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSelection::Movie => f.write_str("Movie"),
            TypeSelection::TvShow => f.write_str("TV Show"),
            TypeSelection::Both => f.write_str("Both"),
        }
    }
}

/// Inclusive release-year range. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Build a range from two endpoints in either order.
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Number of calendar years covered.
    pub fn span(&self) -> i32 {
        self.max.saturating_sub(self.min).saturating_add(1)
    }
}

/// User-selected constraints for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FilterCriteria {
    pub types: TypeSelection,
    pub years: YearRange,
}

impl FilterCriteria {
    pub fn new(types: TypeSelection, years: YearRange) -> Self {
        FilterCriteria { types, years }
    }

    /// Criteria that let every row of `table` through.
    pub fn spanning(table: &TitleTable) -> Self {
        let (lo, hi) = table.release_years.unwrap_or((i32::MIN, i32::MAX));
        FilterCriteria::new(TypeSelection::Both, YearRange::new(lo, hi))
    }

    /// Narrow the year range to the table's span. A range that misses the
    /// span entirely collapses onto the nearest edge year.
    pub fn clamped_to(self, table: &TitleTable) -> Self {
        let Some((lo, hi)) = table.release_years else {
            return self;
        };
        let years = YearRange::new(
            self.years.min.clamp(lo, hi),
            self.years.max.clamp(lo, hi),
        );
        FilterCriteria { years, ..self }
    }

    pub fn matches(&self, record: &TitleRecord) -> bool {
        self.types.accepts(record.kind) && self.years.contains(record.release_year)
    }
}

/// Return indices of titles that pass the criteria.
pub fn filtered_indices(table: &TitleTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Build a fresh table holding only the matching titles.
///
/// No matches is not an error: the result is simply empty.
pub fn apply(table: &TitleTable, criteria: &FilterCriteria) -> TitleTable {
    let records = table
        .iter()
        .filter(|rec| criteria.matches(rec))
        .cloned()
        .collect();
    TitleTable::from_records(records)
}
