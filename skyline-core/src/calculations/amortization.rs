//! Equated monthly installment (EMI) calculations.
//!
//! # Formula
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `r`    | monthly rate: annual rate % ÷ 12 ÷ 100 |
//! | `n`    | installments: tenure years × 12 |
//! | `EMI`  | `P × r × (1+r)^n ÷ ((1+r)^n − 1)`, or 0 when `P` is 0 |
//!
//! The installment is rounded half-up to two decimal places before the totals
//! are derived, so `total_payable = EMI × n` and
//! `total_interest = total_payable − P` hold exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use skyline_core::calculations::AmortizationCalculator;
//!
//! let calculator = AmortizationCalculator::default();
//! let result = calculator.compute_emi(dec!(5000000), dec!(8.5), 20).unwrap();
//!
//! assert_eq!(result.monthly_installment, dec!(43391.16));
//! assert_eq!(result.total_payable, dec!(10413878.40));
//! assert_eq!(result.total_interest, dec!(5413878.40));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValuationError;
use crate::calculations::common::round_half_up;
use crate::models::{AmortizationPeriod, AmortizationResult, LoanInput, PrincipalInterestSplit};

const MONTHS_PER_YEAR: i32 = 12;

/// What to do when the annual rate is exactly zero.
///
/// The amortizing formula divides by `(1+r)^n − 1`, which is zero at `r = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroRatePolicy {
    /// Fail with [`ValuationError::InvalidInput`].
    #[default]
    Reject,
    /// Repay the principal in equal parts: `EMI = P ÷ n`.
    StraightLine,
}

/// Stateless EMI calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationCalculator {
    zero_rate_policy: ZeroRatePolicy,
}

impl AmortizationCalculator {
    pub fn new(zero_rate_policy: ZeroRatePolicy) -> Self {
        Self { zero_rate_policy }
    }

    pub fn zero_rate_policy(&self) -> ZeroRatePolicy {
        self.zero_rate_policy
    }

    /// Computes the installment summary for `loan`.
    pub fn calculate(
        &self,
        loan: &LoanInput,
    ) -> Result<AmortizationResult, ValuationError> {
        self.compute_emi(loan.principal, loan.annual_rate_percent, loan.tenure_years)
    }

    /// Computes the monthly installment and repayment totals.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] if:
    /// - `principal` is negative
    /// - `annual_rate_percent` is negative, or zero under
    ///   [`ZeroRatePolicy::Reject`]
    /// - `tenure_years` is zero or negative
    /// - the result does not fit in a decimal
    pub fn compute_emi(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        tenure_years: i32,
    ) -> Result<AmortizationResult, ValuationError> {
        let installments = self.validate(principal, annual_rate_percent, tenure_years)?;

        if principal.is_zero() {
            return Ok(AmortizationResult::zero(installments));
        }

        let monthly_installment = self.monthly_installment(principal, annual_rate_percent, installments)?;
        let total_payable = monthly_installment
            .checked_mul(Decimal::from(installments))
            .ok_or_else(|| overflow("total_payable"))?;
        let total_interest = total_payable - principal;

        debug!(
            %principal,
            %annual_rate_percent,
            tenure_years,
            %monthly_installment,
            %total_payable,
            "EMI computed"
        );

        Ok(AmortizationResult {
            monthly_installment,
            total_interest,
            total_payable,
            installments,
        })
    }

    /// Builds the month-by-month repayment schedule.
    ///
    /// Interest for each month is the outstanding balance × monthly rate,
    /// rounded half-up. The final installment is adjusted so the balance
    /// closes at exactly zero. A zero principal yields an empty schedule.
    pub fn schedule(
        &self,
        loan: &LoanInput,
    ) -> Result<Vec<AmortizationPeriod>, ValuationError> {
        let summary = self.calculate(loan)?;
        if loan.principal.is_zero() {
            return Ok(Vec::new());
        }

        let rate = monthly_rate(loan.annual_rate_percent);
        let mut balance = loan.principal;
        let mut periods = Vec::with_capacity(summary.installments as usize);

        for period in 1..=summary.installments {
            let interest = round_half_up(balance * rate);
            let (installment, principal_part) = if period == summary.installments {
                (balance + interest, balance)
            } else {
                let principal_part = summary.monthly_installment - interest;
                (summary.monthly_installment, principal_part)
            };
            balance -= principal_part;

            periods.push(AmortizationPeriod {
                period,
                installment,
                interest,
                principal: principal_part,
                balance,
            });
        }

        Ok(periods)
    }

    /// Principal versus interest share of the total repayment.
    pub fn principal_interest_split(
        &self,
        loan: &LoanInput,
    ) -> Result<PrincipalInterestSplit, ValuationError> {
        let summary = self.calculate(loan)?;
        let interest_share_percent = if summary.total_payable.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(summary.total_interest / summary.total_payable * Decimal::ONE_HUNDRED)
        };

        Ok(PrincipalInterestSplit {
            principal: loan.principal,
            interest: summary.total_interest,
            interest_share_percent,
        })
    }

    /// Checks the inputs and returns the number of installments.
    fn validate(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        tenure_years: i32,
    ) -> Result<u32, ValuationError> {
        if principal < Decimal::ZERO {
            return Err(ValuationError::invalid(
                "principal",
                format!("must not be negative, got {principal}"),
            ));
        }
        if annual_rate_percent < Decimal::ZERO {
            return Err(ValuationError::invalid(
                "annual_rate_percent",
                format!("must be positive, got {annual_rate_percent}"),
            ));
        }
        if annual_rate_percent.is_zero() && self.zero_rate_policy == ZeroRatePolicy::Reject {
            return Err(ValuationError::invalid(
                "annual_rate_percent",
                "must be positive; a zero rate is not supported",
            ));
        }
        if tenure_years <= 0 {
            return Err(ValuationError::invalid(
                "tenure_years",
                format!("must be positive, got {tenure_years}"),
            ));
        }

        tenure_years
            .checked_mul(MONTHS_PER_YEAR)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ValuationError::invalid("tenure_years", format!("{tenure_years} is too long")))
    }

    fn monthly_installment(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        installments: u32,
    ) -> Result<Decimal, ValuationError> {
        if annual_rate_percent.is_zero() {
            // Only reachable under ZeroRatePolicy::StraightLine.
            return Ok(round_half_up(principal / Decimal::from(installments)));
        }

        let rate = monthly_rate(annual_rate_percent);
        let growth = (Decimal::ONE + rate)
            .checked_powu(u64::from(installments))
            .ok_or_else(|| overflow("monthly_installment"))?;

        let emi = principal
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(growth))
            .and_then(|v| v.checked_div(growth - Decimal::ONE))
            .ok_or_else(|| overflow("monthly_installment"))?;

        Ok(round_half_up(emi))
    }
}

/// Monthly rate as a fraction: annual % ÷ 12 ÷ 100.
fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR) / Decimal::ONE_HUNDRED
}

fn overflow(field: &'static str) -> ValuationError {
    ValuationError::invalid(field, "result is too large to represent")
}
