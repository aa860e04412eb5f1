use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan parameters for the installment calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed, in currency units.
    pub principal: Decimal,
    /// Annual interest rate as a percentage (8.5 means 8.5%).
    pub annual_rate_percent: Decimal,
    pub tenure_years: i32,
}

impl LoanInput {
    pub fn new(
        principal: Decimal,
        annual_rate_percent: Decimal,
        tenure_years: i32,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_years,
        }
    }
}
