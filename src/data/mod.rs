/// Data layer: core types, loading, filtering and chart summaries.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet   (local path or http(s) URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  Source → bytes → TitleTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  TitleTable  │  Vec<TitleRecord>, release-year span
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → fresh subset table
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ aggregate, insight │  subset → per-chart summaries + takeaways
///   └────────────────────┘
///        │
///        ▼
///   DashboardSummary  (pipeline::run, once per interaction)
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod insight;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod source;
