use std::fmt;

use serde::{Deserialize, Serialize};

use super::selection::Dimension;
use super::stats::BoxStats;

// ---------------------------------------------------------------------------
// Label – the group key shown on a chart axis
// ---------------------------------------------------------------------------

/// State codes are text; ages and years are numbers. Within one dimension
/// every label has the same variant, so the derived `Ord` is the natural
/// order of the key (alphabetical or numeric).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{n}"),
            Label::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Label {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Number(n) => Some(*n as f64),
            Label::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary – ordered (label, value) records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<V> {
    pub label: Label,
    pub value: V,
}

/// Ordered label/value pairs ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary<V> {
    pub dimension: Dimension,
    pub entries: Vec<Entry<V>>,
}

impl<V> Summary<V> {
    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.entries.iter().map(|e| &e.label)
    }

    pub fn get(&self, label: &Label) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| &e.label == label)
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both series of the mean/median line view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanMedian {
    pub median: f64,
    pub mean: f64,
}

// ---------------------------------------------------------------------------
// DistributionSummary – raw rates per group for box plots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// `None` for the single ungrouped partition.
    pub label: Option<Label>,
    pub rates: Vec<f64>,
    /// `None` only when the partition is empty.
    pub stats: Option<BoxStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub dimension: Option<Dimension>,
    /// Axis tick labels, in the same order as `partitions`.
    pub labels: Vec<Label>,
    pub partitions: Vec<Partition>,
}

// ---------------------------------------------------------------------------
// HistogramBin – equal-width bin of the rate histogram
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` except for the last bin, which also holds `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}
