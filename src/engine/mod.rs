/// Aggregation engine: pure queries from a (dataset, selection) pair to an
/// ordered summary ready for charting.
///
/// ```text
///   route "#map/max" ──► request::ChartRequest ──► request::render
///                                                      │
///                          aggregate::{aggregate_by_dimension,
///                                      aggregate_distribution,
///                                      aggregate_mean_and_median,
///                                      count_by_dimension,
///                                      rate_histogram}
///                                                      │
///                                                      ▼
///                                              request::ChartData
/// ```
///
/// Nothing here mutates the dataset or keeps state between calls.

pub mod aggregate;
pub mod request;
pub mod selection;
pub mod stats;
pub mod summary;
