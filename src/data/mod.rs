/// Data layer: record types, loading, and cleaning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRateRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  rename, drop "Family Option", normalise age, drop outliers
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RateDataset  │  immutable Arc<[RateRecord]>, shared by every query
///   └─────────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
