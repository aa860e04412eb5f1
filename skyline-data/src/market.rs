use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading the market dataset.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// The dataset file does not exist. Callers disable analytics rather
    /// than fail.
    #[error("market data not found at '{}'", .0.display())]
    DataUnavailable(PathBuf),

    #[error("CSV parse error at row {row}: {message}")]
    CsvParse { row: u64, message: String },

    #[error("I/O error reading market data: {0}")]
    Io(#[from] std::io::Error),
}

/// One observed sale from the market dataset.
///
/// Columns are matched by header name, so extra columns in the file are
/// ignored:
/// - `area`: built-up area in square feet
/// - `bedrooms`: BHK count
/// - `price`: sale price in lakhs
/// - `distance`: distance to the city centre in km
/// - `age`: property age in years at the time of sale
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MarketRecord {
    pub area: f64,
    pub bedrooms: u32,
    pub price: f64,
    pub distance: f64,
    pub age: f64,
}

impl MarketRecord {
    fn check(&self) -> Result<(), String> {
        let fields = [
            ("area", self.area),
            ("price", self.price),
            ("distance", self.distance),
            ("age", self.age),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("{name} must be a finite number, got {value}"));
            }
            if value < 0.0 {
                return Err(format!("{name} must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}

/// Loader for the market dataset CSV.
pub struct MarketDataLoader;

impl MarketDataLoader {
    /// Parse market records from a CSV reader.
    ///
    /// Fields are trimmed before parsing. The reported row number counts the
    /// header as row 1.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MarketRecord>, MarketDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize::<MarketRecord>().enumerate() {
            let fallback_row = index as u64 + 2;
            let record = result.map_err(|err| MarketDataError::CsvParse {
                row: err.position().map_or(fallback_row, |p| p.line()),
                message: err.to_string(),
            })?;
            record.check().map_err(|message| MarketDataError::CsvParse {
                row: fallback_row,
                message,
            })?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed market records");
        Ok(records)
    }

    /// Open and parse the dataset at `path`.
    pub fn load_from_file(path: &Path) -> Result<Vec<MarketRecord>, MarketDataError> {
        if !path.exists() {
            warn!(path = %path.display(), "market data file missing");
            return Err(MarketDataError::DataUnavailable(path.to_path_buf()));
        }

        let file = File::open(path)?;
        Self::parse(file)
    }
}
