use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STATES: [&str; 39] = [
    "AK", "AL", "AR", "AZ", "DE", "FL", "GA", "HI", "IA", "ID", "IL", "IN", "KS", "LA", "ME",
    "MI", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "OH", "OK", "OR", "PA",
    "SC", "SD", "TN", "TX", "UT", "VA", "WI", "WV", "WY",
];
const YEARS: [i64; 3] = [2014, 2015, 2016];

/// Age bands as they appear in the source data.
fn age_bands() -> Vec<String> {
    let mut bands = vec!["0-20".to_string()];
    bands.extend((21..=64).map(|a| a.to_string()));
    bands.push("65 and over".to_string());
    bands
}

/// Premium multiplier for an age band, rising roughly threefold from 21 to 64.
fn age_factor(band: &str) -> f64 {
    let age: f64 = match band {
        "0-20" => 20.0,
        "65 and over" => 65.0,
        other => other.parse().unwrap_or(40.0),
    };
    if age <= 20.0 {
        0.63
    } else {
        1.0 + ((age - 21.0) / 43.0).powf(1.6) * 2.0
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Rows {
    year: Vec<i64>,
    state: Vec<String>,
    age: Vec<String>,
    rate: Vec<f64>,
}

fn generate(rng: &mut SimpleRng, plans_per_state: usize) -> Rows {
    let bands = age_bands();
    let mut rows = Rows {
        year: Vec::new(),
        state: Vec::new(),
        age: Vec::new(),
        rate: Vec::new(),
    };

    for state in STATES {
        let state_base = rng.gauss(260.0, 60.0).max(120.0);
        for (y, &year) in YEARS.iter().enumerate() {
            let trend = 1.0 + 0.06 * y as f64;
            for _ in 0..plans_per_state {
                let plan_factor = rng.gauss(0.0, 0.25).exp();

                // ~3% of plans only publish a family rate
                let family = rng.next_f64() < 0.03;
                let band_list: Vec<&str> = if family {
                    vec!["Family Option"]
                } else {
                    bands.iter().map(String::as_str).collect()
                };

                for band in band_list {
                    let mut rate = state_base * trend * plan_factor * age_factor(band);
                    if band == "Family Option" {
                        rate *= 2.5;
                    }
                    // placeholder rates used by some carriers
                    let roll = rng.next_f64();
                    if roll < 0.005 {
                        rate = 9999.0;
                    } else if roll < 0.007 {
                        rate = 999999.0;
                    }

                    rows.year.push(year);
                    rows.state.push(state.to_string());
                    rows.age.push(band.to_string());
                    rows.rate.push((rate * 100.0).round() / 100.0);
                }
            }
        }
    }
    rows
}

fn write_csv(rows: &Rows, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["BusinessYear", "StateCode", "Age", "IndividualRate"])?;
    for i in 0..rows.year.len() {
        writer.write_record([
            rows.year[i].to_string(),
            rows.state[i].clone(),
            rows.age[i].clone(),
            rows.rate[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &Rows, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("BusinessYear", DataType::Int64, false),
        Field::new("StateCode", DataType::Utf8, false),
        Field::new("Age", DataType::Utf8, false),
        Field::new("IndividualRate", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.year.clone())),
            Arc::new(StringArray::from(
                rows.state.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.age.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.rate.clone())),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let plans_per_state = std::env::args()
        .nth(1)
        .map(|n| n.parse::<usize>())
        .transpose()?
        .unwrap_or(12);

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, plans_per_state);

    write_csv(&rows, "sample_rates.csv")?;
    write_parquet(&rows, "sample_rates.parquet")?;

    println!(
        "Wrote {} rate rows ({} states × {} years × {plans_per_state} plans) to \
         sample_rates.csv and sample_rates.parquet",
        rows.year.len(),
        STATES.len(),
        YEARS.len()
    );
    Ok(())
}
