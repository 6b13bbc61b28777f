/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SurveyDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SurveyDataset │  Vec<SurveyRecord>, per-dimension domains
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ aggregate   │  ranked totals / primary × secondary pivot
///   └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
