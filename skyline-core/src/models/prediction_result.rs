use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// One lakh in currency units.
pub const LAKH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Output of a single valuation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted price, denominated in lakhs.
    pub price_lakhs: Decimal,

    /// Derived total area (sq.ft) fed to the model.
    pub area: f64,

    /// Derived age in years fed to the model.
    pub age: i32,

    /// The exact vector the model was called with.
    pub features: FeatureVector,
}

impl PredictionResult {
    /// Predicted price in currency units (`price_lakhs × 100,000`).
    pub fn price_in_units(&self) -> Decimal {
        self.price_lakhs * LAKH
    }
}
