use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::RateRecord;
use crate::error::EngineError;

use super::summary::Label;

// ---------------------------------------------------------------------------
// Dimension – the column rates are grouped by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    State,
    Age,
    Year,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::State, Dimension::Age, Dimension::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::State => "state",
            Dimension::Age => "age",
            Dimension::Year => "year",
        }
    }

    /// Capitalised name used in chart titles and selectors.
    pub fn title(self) -> &'static str {
        match self {
            Dimension::State => "State",
            Dimension::Age => "Age",
            Dimension::Year => "Year",
        }
    }

    /// The group key of a record along this dimension.
    pub fn key(self, record: &RateRecord) -> Label {
        match self {
            Dimension::State => Label::Text(record.state.clone()),
            Dimension::Age => Label::Number(i64::from(record.age)),
            Dimension::Year => Label::Number(i64::from(record.year)),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state" => Ok(Dimension::State),
            "age" => Ok(Dimension::Age),
            "year" => Ok(Dimension::Year),
            other => Err(EngineError::UnknownDimension(other.to_string())),
        }
    }
}

/// Parse a box-plot grouping, where `"none"` means a single overall
/// distribution.
pub fn parse_grouping(s: &str) -> Result<Option<Dimension>, EngineError> {
    match s {
        "none" => Ok(None),
        other => other.parse().map(Some),
    }
}

pub fn grouping_str(grouping: Option<Dimension>) -> &'static str {
    grouping.map_or("none", Dimension::as_str)
}

// ---------------------------------------------------------------------------
// Statistic – the aggregate applied within each group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Median,
    Mean,
    Min,
    Max,
    Std,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::Median,
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
        Statistic::Std,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Median => "median",
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Std => "std",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Statistic::Median => "Median",
            Statistic::Mean => "Mean",
            Statistic::Min => "Minimum",
            Statistic::Max => "Maximum",
            Statistic::Std => "Standard Deviation",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| EngineError::UnknownStatistic(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// HistogramTarget – rate itself or one of the dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramTarget {
    Rate,
    #[serde(untagged)]
    Dimension(Dimension),
}

impl HistogramTarget {
    pub const ALL: [HistogramTarget; 4] = [
        HistogramTarget::Rate,
        HistogramTarget::Dimension(Dimension::Year),
        HistogramTarget::Dimension(Dimension::Age),
        HistogramTarget::Dimension(Dimension::State),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistogramTarget::Rate => "rate",
            HistogramTarget::Dimension(dim) => dim.as_str(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HistogramTarget::Rate => "Rate",
            HistogramTarget::Dimension(dim) => dim.title(),
        }
    }
}

impl FromStr for HistogramTarget {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rate" => Ok(HistogramTarget::Rate),
            other => other.parse().map(HistogramTarget::Dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        for dim in Dimension::ALL {
            assert_eq!(dim.as_str().parse::<Dimension>(), Ok(dim));
        }
        assert_eq!(
            "bogus".parse::<Dimension>(),
            Err(EngineError::UnknownDimension("bogus".into()))
        );
        // case-sensitive, as the selector values are fixed
        assert!("State".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_parse_statistics() {
        for stat in Statistic::ALL {
            assert_eq!(stat.as_str().parse::<Statistic>(), Ok(stat));
        }
        assert_eq!(
            "bogus".parse::<Statistic>(),
            Err(EngineError::UnknownStatistic("bogus".into()))
        );
    }

    #[test]
    fn test_parse_grouping() {
        assert_eq!(parse_grouping("none"), Ok(None));
        assert_eq!(parse_grouping("year"), Ok(Some(Dimension::Year)));
        assert_eq!(
            parse_grouping("bogus"),
            Err(EngineError::UnknownDimension("bogus".into()))
        );
        assert_eq!(grouping_str(None), "none");
    }

    #[test]
    fn test_parse_histogram_target() {
        assert_eq!("rate".parse::<HistogramTarget>(), Ok(HistogramTarget::Rate));
        assert_eq!(
            "age".parse::<HistogramTarget>(),
            Ok(HistogramTarget::Dimension(Dimension::Age))
        );
        assert!("none".parse::<HistogramTarget>().is_err());
    }

    #[test]
    fn test_dimension_keys() {
        let record = RateRecord {
            year: 2015,
            state: "MT".into(),
            age: 33,
            rate: 250.0,
        };
        assert_eq!(Dimension::State.key(&record), Label::Text("MT".into()));
        assert_eq!(Dimension::Age.key(&record), Label::Number(33));
        assert_eq!(Dimension::Year.key(&record), Label::Number(2015));
    }
}
