//! CSV loader for batch valuation input.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly.
//!
//! | Column              | Required       | Type    | Notes                          |
//! |---------------------|----------------|---------|--------------------------------|
//! | `property_type`     | yes            | string  | `house` or `apartment`         |
//! | `construction_date` | yes            | date    | `YYYY-MM-DD`                   |
//! | `plot_area`         | for houses     | decimal | square feet                    |
//! | `floors`            | for houses     | integer | 1 to 5                         |
//! | `carpet_area`       | for apartments | decimal | square feet                    |
//! | `balcony_area`      | for apartments | decimal | square feet, `0` for none      |
//! | `bedrooms`          | yes            | integer |                                |
//! | `distance_km`       | yes            | decimal | distance to the city centre    |
//!
//! Cells for the other property type may be left empty.
//!
//! ### Example
//!
//! ```csv
//! property_type,construction_date,plot_area,floors,carpet_area,balcony_area,bedrooms,distance_km
//! house,2015-01-01,1200,2,,,3,5
//! apartment,2020-06-15,,,900,100,2,12.5
//! ```
use chrono::NaiveDate;
use serde::Deserialize;
use skyline_core::PropertyType;

use crate::form::PropertyForm;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    property_type: String,
    construction_date: NaiveDate,
    plot_area: Option<f64>,
    floors: Option<f64>,
    carpet_area: Option<f64>,
    balcony_area: Option<f64>,
    bedrooms: u32,
    distance_km: f64,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `property_type` cell was neither `house` nor `apartment`.
    #[error("unrecognised property type '{value}' on row {row}")]
    InvalidPropertyType { value: String, row: usize },

    /// A dimension required by the row's property type was left empty.
    #[error("missing {field} for {property_type} on row {row}")]
    MissingDimension {
        field: &'static str,
        property_type: &'static str,
        row: usize,
    },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn required(
    value: Option<f64>,
    field: &'static str,
    property_type: PropertyType,
    row: usize,
) -> Result<f64, CsvLoadError> {
    value.ok_or(CsvLoadError::MissingDimension {
        field,
        property_type: property_type.as_str(),
        row,
    })
}

/// Convert a single CSV row into a [`PropertyForm`].
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<PropertyForm, CsvLoadError> {
    let property_type = PropertyType::parse(&row.property_type).ok_or_else(|| {
        CsvLoadError::InvalidPropertyType {
            value: row.property_type.clone(),
            row: row_number,
        }
    })?;

    let mut form = PropertyForm {
        property_type,
        construction_date: row.construction_date,
        bedrooms: row.bedrooms,
        distance_km: row.distance_km,
        ..PropertyForm::default()
    };

    match property_type {
        PropertyType::House => {
            form.plot_area = required(row.plot_area, "plot_area", property_type, row_number)?;
            form.floors = required(row.floors, "floors", property_type, row_number)?;
        }
        PropertyType::Apartment => {
            form.carpet_area = required(row.carpet_area, "carpet_area", property_type, row_number)?;
            form.balcony_area =
                required(row.balcony_area, "balcony_area", property_type, row_number)?;
        }
    }

    Ok(form)
}

/// Parse CSV text (the full file contents as a &str) and return one
/// [`PropertyForm`] per row, in file order.
///
/// Range checks are left to [`PropertyForm::validate`], so a batch can
/// report each out-of-range row without rejecting the rest.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [CsvLoadError::InvalidPropertyType] – for an unknown property type.
/// * [CsvLoadError::MissingDimension] – when the dimensions for the row's
///   property type are empty.
pub fn load_from_str(input: &str) -> Result<Vec<PropertyForm>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<PropertyForm>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
