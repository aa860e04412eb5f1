//! Compounded value projection.
//!
//! `future = present × (1 + growth ÷ 100) ^ years`, rounded half-up to two
//! decimal places. The default policy is 8% annual growth over 10 years.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use skyline_core::calculations::ProjectionCalculator;
//!
//! let calculator = ProjectionCalculator::default();
//!
//! assert_eq!(calculator.project_value(dec!(100), dec!(8), 10).unwrap(), dec!(215.89));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValuationError;
use crate::calculations::common::round_half_up;
use crate::models::{PredictionResult, ProjectionResult};

/// Growth rate and horizon applied by [`ProjectionCalculator::project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Annual growth as a percentage (8 means 8%).
    pub annual_growth_percent: Decimal,
    pub horizon_years: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            annual_growth_percent: Decimal::from(8),
            horizon_years: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionCalculator {
    config: ProjectionConfig,
}

impl ProjectionCalculator {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Projects a prediction's value, in currency units, over the configured
    /// horizon at the configured rate.
    pub fn project(
        &self,
        prediction: &PredictionResult,
    ) -> Result<ProjectionResult, ValuationError> {
        let present_value = prediction.price_in_units();
        let future_value = self.project_value(
            present_value,
            self.config.annual_growth_percent,
            self.config.horizon_years,
        )?;

        Ok(ProjectionResult {
            present_value,
            annual_growth_percent: self.config.annual_growth_percent,
            years: self.config.horizon_years,
            future_value,
        })
    }

    /// Compounds `present_value` annually for `years` years.
    ///
    /// `years == 0` returns `present_value` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] if:
    /// - `present_value` is negative
    /// - `years` is negative
    /// - `annual_growth_percent` is −100 or lower
    /// - the result does not fit in a decimal
    pub fn project_value(
        &self,
        present_value: Decimal,
        annual_growth_percent: Decimal,
        years: i32,
    ) -> Result<Decimal, ValuationError> {
        if present_value < Decimal::ZERO {
            return Err(ValuationError::invalid(
                "present_value",
                format!("must not be negative, got {present_value}"),
            ));
        }
        if years < 0 {
            return Err(ValuationError::invalid(
                "years",
                format!("must not be negative, got {years}"),
            ));
        }
        if annual_growth_percent <= -Decimal::ONE_HUNDRED {
            return Err(ValuationError::invalid(
                "annual_growth_percent",
                format!("must be greater than -100, got {annual_growth_percent}"),
            ));
        }
        if years == 0 {
            return Ok(present_value);
        }

        let factor = (Decimal::ONE + annual_growth_percent / Decimal::ONE_HUNDRED)
            .checked_powu(years as u64)
            .ok_or_else(|| ValuationError::invalid("years", format!("{years} years overflows")))?;
        let future_value = present_value
            .checked_mul(factor)
            .map(round_half_up)
            .ok_or_else(|| ValuationError::invalid("present_value", "projection overflows"))?;

        debug!(%present_value, %annual_growth_percent, years, %future_value, "value projected");
        Ok(future_value)
    }
}
