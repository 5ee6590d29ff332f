use std::collections::BTreeMap;

use crate::data::model::RateDataset;

use super::selection::{Dimension, Statistic};
use super::stats::{self, BoxStats};
use super::summary::{
    DistributionSummary, Entry, HistogramBin, Label, MeanMedian, Partition, Summary,
};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Rates per group, keyed (and therefore ordered) by the natural order of
/// the dimension's values.
fn group_rates(dataset: &RateDataset, dimension: Dimension) -> BTreeMap<Label, Vec<f64>> {
    let mut groups: BTreeMap<Label, Vec<f64>> = BTreeMap::new();
    for record in dataset.records() {
        groups
            .entry(dimension.key(record))
            .or_default()
            .push(record.rate);
    }
    groups
}

/// Stable sort of `items` by ascending `key`, so equal keys keep the
/// natural group order.
fn order_by<T>(items: &mut [(T, f64)]) {
    items.sort_by(|a, b| a.1.total_cmp(&b.1));
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Apply `statistic` to the rates of each group.
///
/// States are ordered by ascending **median** rate whatever `statistic` is
/// displayed; ages and years keep their ascending natural order.
pub fn aggregate_by_dimension(
    dataset: &RateDataset,
    dimension: Dimension,
    statistic: Statistic,
) -> Summary<f64> {
    let mut keyed: Vec<(Entry<f64>, f64)> = group_rates(dataset, dimension)
        .into_iter()
        .map(|(label, rates)| {
            let value = stats::apply(statistic, &rates);
            let order = match (dimension, statistic) {
                (Dimension::State, Statistic::Median) => value,
                (Dimension::State, _) => stats::median(&rates),
                _ => 0.0,
            };
            (Entry { label, value }, order)
        })
        .collect();

    if dimension == Dimension::State {
        order_by(&mut keyed);
    }

    Summary {
        dimension,
        entries: keyed.into_iter().map(|(entry, _)| entry).collect(),
    }
}

/// Raw rates partitioned by `dimension`, or one partition holding every rate
/// when `dimension` is `None`. State partitions come pre-ordered by median.
pub fn aggregate_distribution(
    dataset: &RateDataset,
    dimension: Option<Dimension>,
) -> DistributionSummary {
    let Some(dim) = dimension else {
        let rates: Vec<f64> = dataset.records().iter().map(|r| r.rate).collect();
        let stats = BoxStats::compute(&rates);
        return DistributionSummary {
            dimension: None,
            labels: Vec::new(),
            partitions: vec![Partition {
                label: None,
                rates,
                stats,
            }],
        };
    };

    let mut keyed: Vec<(Partition, f64)> = group_rates(dataset, dim)
        .into_iter()
        .map(|(label, rates)| {
            let stats = BoxStats::compute(&rates);
            let median = stats.as_ref().map_or(f64::NAN, |s| s.median);
            let partition = Partition {
                label: Some(label),
                rates,
                stats,
            };
            (partition, median)
        })
        .collect();

    if dim == Dimension::State {
        order_by(&mut keyed);
    }

    let partitions: Vec<Partition> = keyed.into_iter().map(|(p, _)| p).collect();
    let labels = partitions.iter().filter_map(|p| p.label.clone()).collect();

    DistributionSummary {
        dimension: Some(dim),
        labels,
        partitions,
    }
}

/// Median and mean of each group in one pass. For states the median that
/// orders the groups is the same value returned in the `median` field.
pub fn aggregate_mean_and_median(
    dataset: &RateDataset,
    dimension: Dimension,
) -> Summary<MeanMedian> {
    let mut keyed: Vec<(Entry<MeanMedian>, f64)> = group_rates(dataset, dimension)
        .into_iter()
        .map(|(label, rates)| {
            let value = MeanMedian {
                median: stats::median(&rates),
                mean: stats::mean(&rates),
            };
            (Entry { label, value }, value.median)
        })
        .collect();

    if dimension == Dimension::State {
        order_by(&mut keyed);
    }

    Summary {
        dimension,
        entries: keyed.into_iter().map(|(entry, _)| entry).collect(),
    }
}

/// Row count per group. States are ordered by ascending count (frequency,
/// not rate); other dimensions keep their natural order.
pub fn count_by_dimension(dataset: &RateDataset, dimension: Dimension) -> Summary<usize> {
    let mut counts: BTreeMap<Label, usize> = BTreeMap::new();
    for record in dataset.records() {
        *counts.entry(dimension.key(record)).or_default() += 1;
    }

    let mut entries: Vec<Entry<usize>> = counts
        .into_iter()
        .map(|(label, value)| Entry { label, value })
        .collect();

    if dimension == Dimension::State {
        entries.sort_by_key(|e| e.value);
    }

    Summary { dimension, entries }
}

/// Equal-width histogram of every rate between the observed min and max.
pub fn rate_histogram(dataset: &RateDataset, bins: usize) -> Vec<HistogramBin> {
    let rates: Vec<f64> = dataset.records().iter().map(|r| r.rate).collect();
    if rates.is_empty() {
        return Vec::new();
    }

    let min = stats::apply(Statistic::Min, &rates);
    let max = stats::apply(Statistic::Max, &rates);
    let bins = if max > min { bins.max(1) } else { 1 };
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for rate in rates {
        let idx = if width > 0.0 {
            (((rate - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::model::RawRateRow;

    fn dataset(rows: &[(&str, &str, &str, &str)]) -> RateDataset {
        let raw: Vec<RawRateRow> = rows
            .iter()
            .map(|&(y, s, a, r)| RawRateRow::new(y, s, a, r))
            .collect();
        clean(&raw).unwrap()
    }

    /// Alphabetical, count and median orders of the states all differ.
    fn mixed() -> RateDataset {
        dataset(&[
            ("2014", "AA", "30", "100"),
            ("2015", "AA", "40", "100"),
            ("2016", "AA", "50", "100"),
            ("2014", "BB", "0-20", "50"),
            ("2016", "CC", "65 and over", "500"),
            ("2015", "CC", "30", "500"),
        ])
    }

    fn text(labels: impl Iterator<Item = impl ToString>) -> Vec<String> {
        labels.map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_end_to_end_tie_keeps_natural_order() {
        let ds = dataset(&[
            ("2014", "CA", "0-20", "100"),
            ("2014", "CA", "30", "300"),
            ("2014", "NY", "65 and over", "200"),
        ]);
        let ages: Vec<u32> = ds.records().iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![20, 30, 65]);

        let summary = aggregate_by_dimension(&ds, Dimension::State, Statistic::Median);
        assert_eq!(
            summary.entries,
            vec![
                Entry { label: Label::Text("CA".into()), value: 200.0 },
                Entry { label: Label::Text("NY".into()), value: 200.0 },
            ]
        );
    }

    #[test]
    fn test_state_order_follows_median_for_every_statistic() {
        let ds = mixed();
        let medians = aggregate_by_dimension(&ds, Dimension::State, Statistic::Median);
        for stat in Statistic::ALL {
            let summary = aggregate_by_dimension(&ds, Dimension::State, stat);
            assert_eq!(text(summary.labels()), vec!["BB", "AA", "CC"], "{stat}");

            let ordered: Vec<f64> = summary
                .labels()
                .map(|l| *medians.get(l).unwrap())
                .collect();
            assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_map_ordering_ignores_displayed_statistic() {
        // AA has the smallest max but not the smallest median
        let ds = dataset(&[
            ("2014", "AA", "30", "100"),
            ("2014", "AA", "30", "110"),
            ("2014", "BB", "30", "10"),
            ("2014", "BB", "30", "20"),
            ("2014", "BB", "30", "900"),
        ]);
        let summary = aggregate_by_dimension(&ds, Dimension::State, Statistic::Max);
        assert_eq!(text(summary.labels()), vec!["BB", "AA"]);
        assert_eq!(summary.entries[0].value, 900.0);
        assert_eq!(summary.entries[1].value, 110.0);
    }

    #[test]
    fn test_numeric_dimensions_keep_natural_order() {
        let ds = dataset(&[
            ("2016", "ZZ", "50", "900"),
            ("2014", "ZZ", "0-20", "100"),
            ("2015", "AA", "30", "1"),
        ]);
        let years = aggregate_by_dimension(&ds, Dimension::Year, Statistic::Mean);
        assert_eq!(text(years.labels()), vec!["2014", "2015", "2016"]);
        let ages = aggregate_by_dimension(&ds, Dimension::Age, Statistic::Min);
        assert_eq!(text(ages.labels()), vec!["20", "30", "50"]);
        assert_eq!(ages.entries[2].value, 900.0);
    }

    #[test]
    fn test_mean_and_median_uses_one_median() {
        let ds = mixed();
        let lines = aggregate_mean_and_median(&ds, Dimension::State);
        let standalone = aggregate_by_dimension(&ds, Dimension::State, Statistic::Median);

        assert_eq!(text(lines.labels()), text(standalone.labels()));
        let medians: Vec<f64> = lines.entries.iter().map(|e| e.value.median).collect();
        assert!(medians.windows(2).all(|w| w[0] <= w[1]));
        for entry in &lines.entries {
            assert_eq!(Some(&entry.value.median), standalone.get(&entry.label));
        }
    }

    #[test]
    fn test_mean_and_median_by_year() {
        let ds = dataset(&[
            ("2016", "AA", "30", "400"),
            ("2014", "AA", "30", "100"),
            ("2014", "AA", "30", "200"),
            ("2014", "AA", "30", "600"),
        ]);
        let lines = aggregate_mean_and_median(&ds, Dimension::Year);
        assert_eq!(text(lines.labels()), vec!["2014", "2016"]);
        assert_eq!(lines.entries[0].value, MeanMedian { median: 200.0, mean: 300.0 });
        assert_eq!(lines.entries[1].value, MeanMedian { median: 400.0, mean: 400.0 });
    }

    #[test]
    fn test_count_order_is_independent_of_median_order() {
        let ds = mixed();
        let counts = count_by_dimension(&ds, Dimension::State);
        let medians = aggregate_by_dimension(&ds, Dimension::State, Statistic::Median);

        assert_eq!(text(counts.labels()), vec!["BB", "CC", "AA"]);
        assert_eq!(
            counts.entries.iter().map(|e| e.value).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_ne!(text(counts.labels()), text(medians.labels()));
    }

    #[test]
    fn test_count_by_year_natural_order() {
        let counts = count_by_dimension(&mixed(), Dimension::Year);
        assert_eq!(text(counts.labels()), vec!["2014", "2015", "2016"]);
        assert_eq!(counts.get(&Label::Number(2016)), Some(&2));
    }

    #[test]
    fn test_distribution_without_grouping() {
        let dist = aggregate_distribution(&mixed(), None);
        assert!(dist.labels.is_empty());
        assert_eq!(dist.partitions.len(), 1);
        assert_eq!(dist.partitions[0].label, None);
        assert_eq!(dist.partitions[0].rates.len(), 6);
        assert_eq!(dist.partitions[0].stats.as_ref().unwrap().median, 100.0);
    }

    #[test]
    fn test_distribution_by_state_exposes_median_order() {
        let dist = aggregate_distribution(&mixed(), Some(Dimension::State));
        assert_eq!(text(dist.labels.iter()), vec!["BB", "AA", "CC"]);
        let partition_labels: Vec<Label> =
            dist.partitions.iter().filter_map(|p| p.label.clone()).collect();
        assert_eq!(partition_labels, dist.labels);
        assert_eq!(dist.partitions[1].rates, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_distribution_by_age_natural_order() {
        let dist = aggregate_distribution(&mixed(), Some(Dimension::Age));
        assert_eq!(text(dist.labels.iter()), vec!["20", "30", "40", "50", "65"]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = dataset(&[]);
        assert!(aggregate_by_dimension(&ds, Dimension::State, Statistic::Mean).is_empty());
        assert!(count_by_dimension(&ds, Dimension::Age).is_empty());
        assert!(rate_histogram(&ds, 10).is_empty());
        let dist = aggregate_distribution(&ds, None);
        assert_eq!(dist.partitions[0].stats, None);
    }

    #[test]
    fn test_rate_histogram_bins() {
        let ds = dataset(&[
            ("2014", "AA", "30", "0"),
            ("2014", "AA", "30", "10"),
            ("2014", "AA", "30", "45"),
            ("2014", "AA", "30", "100"),
        ]);
        let bins = rate_histogram(&ds, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 1, 0, 1]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 100.0);
        assert_eq!(bins[1].width(), 25.0);
    }

    #[test]
    fn test_rate_histogram_single_value() {
        let ds = dataset(&[("2014", "AA", "30", "7"), ("2015", "AA", "30", "7")]);
        let bins = rate_histogram(&ds, 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }
}
