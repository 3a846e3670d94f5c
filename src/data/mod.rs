/// Data layer: core types, loading, and descriptive statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ClinicalDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ClinicalDataset  │  columns, rows, numeric columns
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  correlation matrix, value counts
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
