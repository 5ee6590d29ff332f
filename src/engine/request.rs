use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::data::model::RateDataset;
use crate::error::EngineError;

use super::aggregate::{
    aggregate_by_dimension, aggregate_distribution, aggregate_mean_and_median,
    count_by_dimension, rate_histogram,
};
use super::selection::{grouping_str, parse_grouping, Dimension, HistogramTarget, Statistic};
use super::summary::{DistributionSummary, HistogramBin, MeanMedian, Summary};

// ---------------------------------------------------------------------------
// ChartRequest – one selection event from the UI
// ---------------------------------------------------------------------------

/// A fully validated view selection.
///
/// Routes have the form `#<view>/<value>`:
/// `#hist/{rate,state,age,year}`, `#box/{none,state,age,year}`,
/// `#line/{state,age,year}`, `#map/{median,mean,min,max,std}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRequest {
    Histogram(HistogramTarget),
    BoxPlot(Option<Dimension>),
    Lines(Dimension),
    Map(Statistic),
}

impl ChartRequest {
    pub fn from_route(route: &str) -> Result<Self, EngineError> {
        let unknown = || EngineError::UnknownRoute(route.to_string());
        let (view, value) = route
            .strip_prefix('#')
            .unwrap_or(route)
            .split_once('/')
            .ok_or_else(unknown)?;

        match view {
            "hist" => value.parse().map(ChartRequest::Histogram),
            "box" => parse_grouping(value).map(ChartRequest::BoxPlot),
            "line" => value.parse().map(ChartRequest::Lines),
            "map" => value.parse().map(ChartRequest::Map),
            _ => Err(unknown()),
        }
    }

    pub fn route(&self) -> String {
        match self {
            ChartRequest::Histogram(target) => format!("#hist/{}", target.as_str()),
            ChartRequest::BoxPlot(grouping) => format!("#box/{}", grouping_str(*grouping)),
            ChartRequest::Lines(dim) => format!("#line/{dim}"),
            ChartRequest::Map(stat) => format!("#map/{stat}"),
        }
    }

    pub fn title(&self) -> String {
        match self {
            ChartRequest::Histogram(target) => format!("Count Histogram of {}", target.title()),
            ChartRequest::BoxPlot(None) => "Distribution of Rate".to_string(),
            ChartRequest::BoxPlot(Some(dim)) => {
                format!("Distribution of Rate Grouped by {}", dim.title())
            }
            ChartRequest::Lines(dim) => format!("Mean and Median Rate by {}", dim.title()),
            ChartRequest::Map(Statistic::Std) => "Standard Deviation by State".to_string(),
            ChartRequest::Map(stat) => format!("{} Rate by State", stat.title()),
        }
    }
}

impl FromStr for ChartRequest {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartRequest::from_route(s)
    }
}

impl fmt::Display for ChartRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}

// ---------------------------------------------------------------------------
// ChartData – the engine's answer to a request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    /// Number of equal-width bins of the rate histogram.
    pub rate_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { rate_bins: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    RateHistogram { bins: Vec<HistogramBin> },
    Counts(Summary<usize>),
    Distribution(DistributionSummary),
    Lines(Summary<MeanMedian>),
    Map {
        statistic: Statistic,
        summary: Summary<f64>,
    },
}

/// Run the single engine query behind `request`.
pub fn render(dataset: &RateDataset, request: &ChartRequest, options: &ViewOptions) -> ChartData {
    match *request {
        ChartRequest::Histogram(HistogramTarget::Rate) => ChartData::RateHistogram {
            bins: rate_histogram(dataset, options.rate_bins),
        },
        ChartRequest::Histogram(HistogramTarget::Dimension(dim)) => {
            ChartData::Counts(count_by_dimension(dataset, dim))
        }
        ChartRequest::BoxPlot(grouping) => {
            ChartData::Distribution(aggregate_distribution(dataset, grouping))
        }
        ChartRequest::Lines(dim) => ChartData::Lines(aggregate_mean_and_median(dataset, dim)),
        ChartRequest::Map(statistic) => ChartData::Map {
            statistic,
            summary: aggregate_by_dimension(dataset, Dimension::State, statistic),
        },
    }
}
