use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Installment summary for a loan.
///
/// `total_payable == monthly_installment × installments` and
/// `total_interest == total_payable − principal` hold exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_installment: Decimal,
    pub total_interest: Decimal,
    pub total_payable: Decimal,
    /// Number of monthly installments (`tenure_years × 12`).
    pub installments: u32,
}

impl AmortizationResult {
    pub(crate) fn zero(installments: u32) -> Self {
        Self {
            monthly_installment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_payable: Decimal::ZERO,
            installments,
        }
    }
}

/// One row of the month-by-month repayment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based month number.
    pub period: u32,
    pub installment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    /// Outstanding balance after this installment.
    pub balance: Decimal,
}

/// Principal versus interest share of the total repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalInterestSplit {
    pub principal: Decimal,
    pub interest: Decimal,
    /// Interest as a percentage of the total payable, two decimal places.
    pub interest_share_percent: Decimal,
}
