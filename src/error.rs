use thiserror::Error;

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

/// Structural failures raised by the cleaner and the aggregation engine.
///
/// None of these are transient: they indicate malformed input data or a
/// selection value that should never have reached the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A raw row could not be normalised (row numbers are 1-based data rows).
    #[error("row {row}: {message}")]
    DataFormat { row: usize, message: String },

    #[error("unknown dimension '{0}' (expected state, age or year)")]
    UnknownDimension(String),

    #[error("unknown statistic '{0}' (expected median, mean, min, max or std)")]
    UnknownStatistic(String),

    #[error("unknown chart route '{0}'")]
    UnknownRoute(String),
}

impl EngineError {
    pub fn data_format(row: usize, message: impl Into<String>) -> Self {
        EngineError::DataFormat {
            row,
            message: message.into(),
        }
    }
}
