use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::clean::clean;
use super::model::{RateDataset, RawRateRow};

/// Source column names, original and cleaned spelling.
const COLUMNS: [(&str, &str); 4] = [
    ("BusinessYear", "year"),
    ("StateCode", "state"),
    ("Age", "age"),
    ("IndividualRate", "rate"),
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a rate dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four source (or cleaned) columns
/// * `.json`    – `[{ "BusinessYear": 2014, "StateCode": "AK", ... }, ...]`
/// * `.parquet` – the four columns as strings or numbers
pub fn load_file(path: &Path) -> Result<RateDataset> {
    let rows = read_raw_rows(path)?;
    let dataset = clean(&rows).with_context(|| format!("cleaning {}", path.display()))?;
    log::info!(
        "Loaded {} of {} rows from {}",
        dataset.len(),
        rows.len(),
        path.display()
    );
    Ok(dataset)
}

/// Read the uncleaned rows of a file.
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRateRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Any extra columns in the file are ignored.
fn load_csv(path: &Path) -> Result<Vec<RawRateRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRateRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "BusinessYear": 2014, "StateCode": "AK", "Age": "0-20", "IndividualRate": 210.5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRateRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawRateRow> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {} is not a JSON object", i + 1))?;
            let cell = |(long, short): (&str, &str)| {
                obj.get(long)
                    .or_else(|| obj.get(short))
                    .map(json_to_text)
                    .with_context(|| format!("Row {}: missing '{long}' column", i + 1))
            };
            Ok(RawRateRow {
                year: cell(COLUMNS[0])?,
                state: cell(COLUMNS[1])?,
                age: cell(COLUMNS[2])?,
                rate: cell(COLUMNS[3])?,
            })
        })
        .collect()
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing rate data.
///
/// Each of the four columns may be stored as text or as a number, which
/// covers files written both before and after the age column was cleaned.
fn load_parquet(path: &Path) -> Result<Vec<RawRateRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut indices = [0usize; 4];
        for (slot, (long, short)) in indices.iter_mut().zip(COLUMNS) {
            *slot = schema
                .index_of(long)
                .or_else(|_| schema.index_of(short))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{long}' column"))?;
        }
        let columns = indices.map(|i| batch.column(i));

        for row in 0..batch.num_rows() {
            let row_no = rows.len() + 1;
            let [year, state, age, rate] = columns.map(|col| cell_text(col, row));
            rows.push(RawRateRow {
                year: year.with_context(|| format!("Row {row_no}: unsupported year column"))?,
                state: state.with_context(|| format!("Row {row_no}: unsupported state column"))?,
                age: age.with_context(|| format!("Row {row_no}: unsupported age column"))?,
                rate: rate.with_context(|| format!("Row {row_no}: unsupported rate column"))?,
            });
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Render a single cell as text; nulls become the empty string.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return Some(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_any().downcast_ref::<StringArray>()?.value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_any().downcast_ref::<Int32Array>()?.value(row).to_string(),
        DataType::Int64 => col.as_any().downcast_ref::<Int64Array>()?.value(row).to_string(),
        DataType::Float32 => col.as_any().downcast_ref::<Float32Array>()?.value(row).to_string(),
        DataType::Float64 => col.as_any().downcast_ref::<Float64Array>()?.value(row).to_string(),
        DataType::Boolean => col.as_any().downcast_ref::<BooleanArray>()?.value(row).to_string(),
        _ => return None,
    };
    Some(text)
}
