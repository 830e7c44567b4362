use std::path::Path;
use std::sync::Arc;

use netflix_explorer::data::export;
use netflix_explorer::data::filter::{FilterCriteria, TypeSelection, YearRange};
use netflix_explorer::data::loader::DatasetCache;
use netflix_explorer::data::model::TitleTable;
use netflix_explorer::data::pipeline::{self, DashboardSummary, PipelineOptions};
use netflix_explorer::data::source::Source;
use netflix_explorer::data::{filter, error::LoadError};
use netflix_explorer::settings::FilterSettings;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    TitlesOverTime,
    Ratings,
    Durations,
    Trends,
    Data,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::TitlesOverTime,
        Tab::Ratings,
        Tab::Durations,
        Tab::Trends,
        Tab::Data,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::TitlesOverTime => "Titles Over Time",
            Tab::Ratings => "Ratings",
            Tab::Durations => "Durations",
            Tab::Trends => "Trends",
            Tab::Data => "Data",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is opened). Shared read-only.
    pub dataset: Option<Arc<TitleTable>>,

    /// Where `dataset` came from.
    pub source: Option<Source>,

    /// Text of the File → Open URL field.
    pub url_input: String,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// Summaries for `criteria` (recomputed on every change).
    pub summary: Option<DashboardSummary>,

    /// Indices of titles passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Active navigation tab.
    pub tab: Tab,

    /// Whether the "summarize this view" sentence is shown.
    pub show_view_summary: bool,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    cache: DatasetCache,
    filter_defaults: FilterSettings,
    options: PipelineOptions,
}

impl AppState {
    pub fn new(filter_defaults: FilterSettings, options: PipelineOptions) -> Self {
        Self {
            dataset: None,
            source: None,
            url_input: String::new(),
            criteria: FilterCriteria::new(
                filter_defaults.content_type,
                YearRange::new(filter_defaults.min_year, filter_defaults.max_year),
            ),
            summary: None,
            visible_indices: Vec::new(),
            tab: Tab::default(),
            show_view_summary: false,
            status_message: None,
            cache: DatasetCache::default(),
            filter_defaults,
            options,
        }
    }

    /// Load (or fetch from cache) the dataset at `source` and make it current.
    pub fn open(&mut self, source: &Source) -> Result<(), LoadError> {
        let dataset = self.cache.load(source)?;
        self.source = Some(source.clone());
        self.set_dataset(dataset);
        Ok(())
    }

    /// Open whatever is typed in the URL field.
    pub fn open_url_input(&mut self) -> Result<(), LoadError> {
        let source = Source::parse(&self.url_input);
        self.open(&source)
    }

    /// Re-read the current source, bypassing the cache.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let dataset = self.cache.reload(&source)?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Short name of the current source, for display.
    pub fn source_name(&self) -> Option<String> {
        self.source.as_ref().map(Source::display_name)
    }

    /// Ingest a newly loaded dataset, reset filters and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<TitleTable>) {
        self.criteria = self.filter_defaults.initial_criteria(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Re-run the whole pipeline for the current criteria.
    pub fn refresh(&mut self) {
        self.summary = self
            .dataset
            .as_deref()
            .map(|ds| pipeline::run(ds, &self.criteria, &self.options));
        self.visible_indices = self
            .dataset
            .as_deref()
            .map(|ds| filter::filtered_indices(ds, &self.criteria))
            .unwrap_or_default();
    }

    pub fn set_types(&mut self, types: TypeSelection) {
        if self.criteria.types != types {
            self.criteria.types = types;
            self.refresh();
        }
    }

    pub fn set_years(&mut self, min: i32, max: i32) {
        let years = YearRange::new(min, max);
        if self.criteria.years != years {
            self.criteria.years = years;
            self.refresh();
        }
    }

    /// Select every title of the loaded dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::spanning(ds);
            self.refresh();
        }
    }

    /// Release-year bounds for the year sliders.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.dataset.as_ref().and_then(|ds| ds.release_years)
    }

    /// Write the currently filtered titles to `path`.
    pub fn export_filtered(&self, path: &Path) -> anyhow::Result<usize> {
        let Some(ds) = &self.dataset else {
            anyhow::bail!("no dataset loaded");
        };
        let subset = filter::apply(ds, &self.criteria);
        export::export_csv(&subset, path)?;
        Ok(subset.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CSV: &str = "\
show_id,type,title,country,date_added,release_year,rating,duration,listed_in
s1,Movie,A,United States,\"March 1, 2019\",2016,PG,90 min,Dramas
s2,Movie,B,India,,2018,TV-14,140 min,Dramas
s3,TV Show,C,United Kingdom,,2021,TV-MA,2 Seasons,British TV Shows
";

    fn state_with_dataset() -> (tempfile::TempDir, AppState) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        fs::write(&path, CSV).unwrap();
        let mut state = AppState::new(FilterSettings::default(), PipelineOptions::default());
        state.open(&Source::from(path.as_path())).unwrap();
        (dir, state)
    }

    #[test]
    fn opening_applies_clamped_default_criteria() {
        let (_dir, state) = state_with_dataset();
        assert_eq!(state.criteria.years, YearRange::new(2016, 2020));
        let summary = state.summary.as_ref().unwrap();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.row_count, 2);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn filter_changes_recompute_summary() {
        let (_dir, mut state) = state_with_dataset();
        state.reset_filters();
        assert_eq!(state.summary.as_ref().unwrap().row_count, 3);

        state.set_types(TypeSelection::TvShow);
        assert_eq!(state.summary.as_ref().unwrap().row_count, 1);

        state.set_years(2016, 2018);
        let summary = state.summary.as_ref().unwrap();
        assert!(summary.is_empty());
        assert!(summary.warning.is_some());
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let (_dir, mut state) = state_with_dataset();
        let err = state.open(&Source::parse("/missing/titles.csv"));
        assert!(err.is_err());
        assert!(state.dataset.is_some());
        assert_eq!(state.source_name().as_deref(), Some("titles.csv"));
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let (dir, mut state) = state_with_dataset();
        let path = dir.path().join("titles.csv");
        fs::write(&path, format!("{CSV}s4,Movie,D,Japan,,2017,R,100 min,Dramas\n")).unwrap();

        // Cached copy until an explicit reload.
        state.open(&Source::from(path.as_path())).unwrap();
        assert_eq!(state.summary.as_ref().unwrap().total_rows, 3);

        state.reload().unwrap();
        assert_eq!(state.summary.as_ref().unwrap().total_rows, 4);
    }

    #[test]
    fn url_field_accepts_local_paths_too() {
        let (dir, mut state) = state_with_dataset();
        let other = dir.path().join("more.csv");
        fs::write(&other, CSV.replace("s1,Movie,A", "s9,Movie,Z")).unwrap();

        state.url_input = format!("  {}  ", other.display());
        state.open_url_input().unwrap();
        assert_eq!(state.source, Some(Source::File(other)));
        assert_eq!(state.source_name().as_deref(), Some("more.csv"));
    }

    #[test]
    fn failed_url_keeps_previous_dataset() {
        let (_dir, mut state) = state_with_dataset();
        state.url_input = "http://127.0.0.1:9/titles.csv".to_string();
        assert!(state.open_url_input().is_err());
        assert_eq!(state.source_name().as_deref(), Some("titles.csv"));
        assert_eq!(state.summary.as_ref().unwrap().total_rows, 3);
    }

    #[test]
    fn export_writes_only_filtered_titles() {
        let (dir, mut state) = state_with_dataset();
        state.set_types(TypeSelection::Movie);
        let out = dir.path().join("filtered.csv");
        assert_eq!(state.export_filtered(&out).unwrap(), 2);
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
