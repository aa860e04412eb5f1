use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Compounded growth of a value over a horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub present_value: Decimal,
    pub annual_growth_percent: Decimal,
    pub years: i32,
    pub future_value: Decimal,
}

impl ProjectionResult {
    /// Absolute gain over the horizon.
    pub fn appreciation(&self) -> Decimal {
        self.future_value - self.present_value
    }
}
