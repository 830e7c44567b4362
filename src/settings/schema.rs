use serde::Deserialize;

use crate::data::filter::{FilterCriteria, TypeSelection, YearRange};
use crate::data::model::TitleTable;
use crate::data::pipeline::PipelineOptions;
use crate::data::source::Source;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/netflix-explorer/config.toml`
/// or `~/.config/netflix-explorer/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `NETFLIX_EXPLORER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub filters: FilterSettings,
    pub charts: ChartSettings,
    pub window: WindowSettings,
}

impl Settings {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            top_countries: Some(self.charts.top_countries),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path or `http(s)://` URL opened at startup. Left unset, the window
    /// starts empty.
    pub source: Option<String>,
}

impl DatasetSettings {
    pub fn to_source(&self) -> Option<Source> {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(Source::parse)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// One of `"both"`, `"movie"`, `"tv_show"`.
    pub content_type: TypeSelection,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            content_type: TypeSelection::Both,
            min_year: 2015,
            max_year: 2020,
        }
    }
}

impl FilterSettings {
    /// Criteria applied right after a dataset loads, narrowed to its span.
    pub fn initial_criteria(&self, table: &TitleTable) -> FilterCriteria {
        FilterCriteria::new(
            self.content_type,
            YearRange::new(self.min_year, self.max_year),
        )
        .clamped_to(table)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// How many of the most frequent countries the duration chart shows.
    pub top_countries: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { top_countries: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}
