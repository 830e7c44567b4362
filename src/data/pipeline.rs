use std::fmt;

use serde::Serialize;

use super::aggregate::{
    self, CountryDuration, RatingCount, TypeCount, TypeSeries, YearCount,
};
use super::filter::{self, FilterCriteria};
use super::insight;
use super::model::TitleTable;

// ---------------------------------------------------------------------------
// Options and results of one recomputation pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Limit the duration chart to this many most frequent countries.
    pub top_countries: Option<usize>,
}

/// Raised (not returned as an error) when criteria match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyResultWarning {
    pub criteria: FilterCriteria,
}

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No titles match type {} released {}–{}.",
            self.criteria.types,
            self.criteria.years.min(),
            self.criteria.years.max()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub overview: Option<String>,
    pub titles_over_time: Option<String>,
    pub ratings: Option<String>,
    pub durations: Option<String>,
    pub trends: Option<String>,
    pub view: Option<String>,
}

/// Everything the dashboard renders for one set of criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub criteria: FilterCriteria,
    pub total_rows: usize,
    pub row_count: usize,
    pub type_distribution: Vec<TypeCount>,
    pub titles_over_time: Vec<YearCount>,
    pub ratings: Vec<RatingCount>,
    pub durations: Vec<CountryDuration>,
    pub growth: Vec<YearCount>,
    pub yearly_by_type: Vec<TypeSeries>,
    pub insights: Insights,
    pub warning: Option<EmptyResultWarning>,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Run filter, every aggregation, and every insight over `table`.
///
/// Called once per interaction with the full dataset; the dataset is only
/// borrowed.
pub fn run(
    table: &TitleTable,
    criteria: &FilterCriteria,
    options: &PipelineOptions,
) -> DashboardSummary {
    let subset = filter::apply(table, criteria);

    let type_distribution = aggregate::type_distribution(&subset);
    let titles_over_time = aggregate::titles_over_time(&subset);
    let ratings = aggregate::rating_breakdown(&subset);
    let durations = match options.top_countries {
        Some(n) => aggregate::duration_by_top_countries(&subset, n),
        None => aggregate::duration_by_country(&subset),
    };
    let growth = aggregate::growth_trend(&subset);
    let yearly_by_type = aggregate::yearly_counts_by_type(&subset);

    let insights = Insights {
        overview: insight::most_common_type(&type_distribution),
        titles_over_time: insight::peak_year(&titles_over_time),
        ratings: insight::top_rating(&ratings),
        durations: insight::longest_duration(&durations),
        trends: insight::growth(&growth),
        view: insight::view_summary(criteria, subset.len(), &type_distribution),
    };

    let warning = subset.is_empty().then_some(EmptyResultWarning {
        criteria: *criteria,
    });

    log::debug!(
        "Pipeline: {} of {} titles match {:?}",
        subset.len(),
        table.len(),
        criteria
    );

    DashboardSummary {
        criteria: *criteria,
        total_rows: table.len(),
        row_count: subset.len(),
        type_distribution,
        titles_over_time,
        ratings,
        durations,
        growth,
        yearly_by_type,
        insights,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{TypeSelection, YearRange};
    use crate::data::model::tests::title;
    use crate::data::model::{ContentType, Duration};

    fn catalogue() -> TitleTable {
        TitleTable::from_records(vec![
            title(
                ContentType::Movie,
                Some("US"),
                2020,
                Some("PG"),
                Some(Duration::Minutes(90)),
            ),
            title(
                ContentType::Movie,
                Some("India"),
                2018,
                Some("TV-14"),
                Some(Duration::Minutes(140)),
            ),
            title(
                ContentType::TvShow,
                Some("UK"),
                2019,
                Some("TV-MA"),
                Some(Duration::Seasons(3)),
            ),
        ])
    }

    #[test]
    fn summary_reflects_filtered_subset() {
        let table = catalogue();
        let criteria = FilterCriteria::new(TypeSelection::Movie, YearRange::new(2015, 2020));
        let summary = run(&table, &criteria, &PipelineOptions::default());

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.row_count, 2);
        assert_eq!(
            summary
                .type_distribution
                .iter()
                .map(|t| t.count)
                .sum::<usize>(),
            summary.row_count
        );
        assert_eq!(summary.durations[0].country, "India");
        assert_eq!(
            summary.insights.overview.as_deref(),
            Some("Most content is of type Movie.")
        );
        assert!(summary.warning.is_none());
    }

    #[test]
    fn empty_match_degrades_to_warning() {
        let table = catalogue();
        let criteria = FilterCriteria::new(TypeSelection::TvShow, YearRange::new(2000, 2005));
        let summary = run(&table, &criteria, &PipelineOptions::default());

        assert!(summary.is_empty());
        assert!(summary.type_distribution.is_empty());
        assert!(summary.growth.is_empty());
        assert_eq!(summary.insights, Insights::default());
        let warning = summary.warning.expect("warning for empty result");
        assert_eq!(warning.criteria, criteria);
        assert_eq!(
            warning.to_string(),
            "No titles match type TV Show released 2000–2005."
        );
    }

    #[test]
    fn rerunning_is_idempotent() {
        let table = catalogue();
        let criteria = FilterCriteria::new(TypeSelection::Both, YearRange::new(2018, 2020));
        let options = PipelineOptions {
            top_countries: Some(5),
        };
        let first = run(&table, &criteria, &options);
        let second = run(&table, &criteria, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn top_country_option_limits_duration_rows() {
        let table = catalogue();
        let criteria = FilterCriteria::spanning(&table);
        let summary = run(
            &table,
            &criteria,
            &PipelineOptions {
                top_countries: Some(1),
            },
        );
        assert_eq!(summary.durations.len(), 1);
        // India and US tie on movie count; India sorts first.
        assert_eq!(summary.durations[0].country, "India");
    }
}
