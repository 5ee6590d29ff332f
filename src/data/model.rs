use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawRateRow – one uncleaned row of the source table
// ---------------------------------------------------------------------------

/// A row as it appears in the source file, every cell kept as text.
///
/// Both the original column names (`BusinessYear`, `StateCode`, `Age`,
/// `IndividualRate`) and the short cleaned names are accepted, so a file that
/// was already cleaned can be fed through the cleaner again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRateRow {
    #[serde(alias = "BusinessYear")]
    pub year: String,
    #[serde(alias = "StateCode")]
    pub state: String,
    #[serde(alias = "Age")]
    pub age: String,
    #[serde(alias = "IndividualRate")]
    pub rate: String,
}

impl RawRateRow {
    pub fn new(
        year: impl Into<String>,
        state: impl Into<String>,
        age: impl Into<String>,
        rate: impl Into<String>,
    ) -> Self {
        Self {
            year: year.into(),
            state: state.into(),
            age: age.into(),
            rate: rate.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RateRecord – one cleaned observation
// ---------------------------------------------------------------------------

/// A single cleaned insurance rate observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub year: i32,
    /// US state / territory code, never empty.
    pub state: String,
    pub age: u32,
    /// Individual premium rate, always `< OUTLIER_RATE`.
    pub rate: f64,
}

impl RateRecord {
    /// Render the record back into the raw text layout.
    pub fn to_raw(&self) -> RawRateRow {
        RawRateRow {
            year: self.year.to_string(),
            state: self.state.clone(),
            age: self.age.to_string(),
            rate: self.rate.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RateDataset – the immutable cleaned table
// ---------------------------------------------------------------------------

/// The cleaned dataset. Cloning only bumps a reference count, so the same
/// table can be handed to every view and every query without copying.
#[derive(Debug, Clone, Default)]
pub struct RateDataset {
    records: Arc<[RateRecord]>,
}

impl RateDataset {
    /// Wrap already-validated records. Use [`crate::data::clean::clean`] for
    /// raw input.
    pub(crate) fn from_records(records: Vec<RateRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw rows equivalent to this dataset, in the same order.
    pub fn to_raw_rows(&self) -> Vec<RawRateRow> {
        self.records.iter().map(RateRecord::to_raw).collect()
    }
}
