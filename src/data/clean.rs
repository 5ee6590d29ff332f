use crate::error::EngineError;

use super::model::{RateDataset, RateRecord, RawRateRow};

/// Rates at or above this value are placeholder plans and are dropped.
pub const OUTLIER_RATE: f64 = 9999.0;

/// Age value marking family plans, which have no individual age.
pub const FAMILY_OPTION: &str = "Family Option";

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Turn raw rows into the immutable cleaned dataset.
///
/// * rows with age `"Family Option"` are dropped
/// * age bands are normalised to integers (see [`parse_age`])
/// * rows with `rate >= 9999` are dropped
///
/// Any cell that cannot be parsed aborts the whole load; no partial dataset
/// is returned. The input is never modified.
pub fn clean(rows: &[RawRateRow]) -> Result<RateDataset, EngineError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut family = 0usize;
    let mut outliers = 0usize;

    for (i, raw) in rows.iter().enumerate() {
        let row = i + 1;

        if raw.age.trim() == FAMILY_OPTION {
            family += 1;
            continue;
        }

        let year = raw
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| EngineError::data_format(row, format!("invalid year '{}'", raw.year)))?;

        let state = raw.state.trim();
        if state.is_empty() {
            return Err(EngineError::data_format(row, "missing state"));
        }

        let age = parse_age(&raw.age).map_err(|msg| EngineError::data_format(row, msg))?;
        let rate = parse_rate(&raw.rate).map_err(|msg| EngineError::data_format(row, msg))?;

        if rate >= OUTLIER_RATE {
            outliers += 1;
            continue;
        }

        records.push(RateRecord {
            year,
            state: state.to_string(),
            age,
            rate,
        });
    }

    log::debug!(
        "cleaned {} rows: kept {}, dropped {family} family-option and {outliers} outlier rows",
        rows.len(),
        records.len()
    );

    Ok(RateDataset::from_records(records))
}

/// Normalise an age band to an integer age.
///
/// `"0-20"` becomes 20 and `"65 and over"` becomes 65; every other band must
/// already be a plain integer.
pub fn parse_age(token: &str) -> Result<u32, String> {
    match token.trim() {
        "0-20" => Ok(20),
        "65 and over" => Ok(65),
        other => other
            .parse::<u32>()
            .map_err(|_| format!("invalid age band '{token}'")),
    }
}

fn parse_rate(token: &str) -> Result<f64, String> {
    let rate = token
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid rate '{token}'"))?;
    if rate.is_nan() || rate < 0.0 {
        return Err(format!("rate must be a non-negative number, got '{token}'"));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: &str, state: &str, age: &str, rate: &str) -> RawRateRow {
        RawRateRow::new(year, state, age, rate)
    }

    fn sample_rows() -> Vec<RawRateRow> {
        vec![
            raw("2014", "AK", "0-20", "210.5"),
            raw("2014", "AK", "Family Option", "500"),
            raw("2015", "AL", "34", "310.0"),
            raw("2016", "AL", "65 and over", "780.25"),
            raw("2016", "AZ", "40", "9999"),
            raw("2016", "AZ", "41", "999999"),
            raw("2015", "AZ", "41", "402"),
        ]
    }

    #[test]
    fn test_age_bands_are_normalised() {
        assert_eq!(parse_age("0-20"), Ok(20));
        assert_eq!(parse_age("65 and over"), Ok(65));
        assert_eq!(parse_age("21"), Ok(21));
        assert_eq!(parse_age(" 64 "), Ok(64));
        assert!(parse_age("21-30").is_err());
        assert!(parse_age("").is_err());
    }

    #[test]
    fn test_family_option_rows_are_dropped() {
        let ds = clean(&sample_rows()).unwrap();
        assert!(ds.records().iter().all(|r| !(r.state == "AK" && r.rate == 500.0)));
        let ak: Vec<_> = ds.records().iter().filter(|r| r.state == "AK").collect();
        assert_eq!(ak.len(), 1);
        assert_eq!(ak[0].age, 20);
    }

    #[test]
    fn test_outliers_are_dropped() {
        let ds = clean(&sample_rows()).unwrap();
        assert_eq!(ds.len(), 4);
        assert!(ds.records().iter().all(|r| r.rate < OUTLIER_RATE));
    }

    #[test]
    fn test_cleaned_fields() {
        let ds = clean(&sample_rows()).unwrap();
        let first = &ds.records()[0];
        assert_eq!(first.year, 2014);
        assert_eq!(first.state, "AK");
        assert_eq!(first.age, 20);
        assert_eq!(first.rate, 210.5);
        assert_eq!(ds.records()[2].age, 65);
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean(&sample_rows()).unwrap();
        let twice = clean(&once.to_raw_rows()).unwrap();
        assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn test_input_is_not_modified() {
        let rows = sample_rows();
        let before = rows.clone();
        clean(&rows).unwrap();
        assert_eq!(rows, before);
    }

    #[test]
    fn test_bad_age_fails_whole_load() {
        let mut rows = sample_rows();
        rows.push(raw("2014", "CA", "21-30", "100"));
        let err = clean(&rows).unwrap_err();
        assert_eq!(
            err,
            EngineError::data_format(8, "invalid age band '21-30'")
        );
    }

    #[test]
    fn test_bad_rate_and_year_fail() {
        assert!(matches!(
            clean(&[raw("2014", "CA", "30", "abc")]),
            Err(EngineError::DataFormat { row: 1, .. })
        ));
        assert!(matches!(
            clean(&[raw("2014", "CA", "30", "-3")]),
            Err(EngineError::DataFormat { row: 1, .. })
        ));
        assert!(matches!(
            clean(&[raw("20x4", "CA", "30", "100")]),
            Err(EngineError::DataFormat { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_state_fails() {
        let err = clean(&[raw("2014", " ", "30", "100")]).unwrap_err();
        assert_eq!(err, EngineError::data_format(1, "missing state"));
    }

    #[test]
    fn test_outlier_with_bad_age_still_fails() {
        // age is validated before the outlier filter
        assert!(clean(&[raw("2014", "CA", "old", "9999")]).is_err());
    }
}
