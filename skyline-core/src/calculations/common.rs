//! Common helpers shared by the calculators.
//!
//! Money is carried as [`Decimal`]; physical measurements and model outputs
//! arrive as `f64` and are converted at the boundary.

use rust_decimal::Decimal;

use crate::ValuationError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use skyline_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(43391.164)), dec!(43391.16));
/// assert_eq!(round_half_up(dec!(43391.165)), dec!(43391.17));
/// assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a finite `f64` into a [`Decimal`].
///
/// # Errors
///
/// Returns [`ValuationError::InvalidInput`] naming `field` when the value is
/// NaN, infinite, or outside the representable decimal range.
pub fn to_decimal(
    field: &'static str,
    value: f64,
) -> Result<Decimal, ValuationError> {
    if !value.is_finite() {
        return Err(ValuationError::invalid(field, format!("{value} is not a finite number")));
    }
    Decimal::try_from(value)
        .map_err(|e| ValuationError::invalid(field, format!("{value} cannot be represented: {e}")))
}

/// Rejects NaN, infinities and negative values.
pub(crate) fn require_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ValuationError> {
    if !value.is_finite() {
        return Err(ValuationError::invalid(field, format!("{value} is not a finite number")));
    }
    if value < 0.0 {
        return Err(ValuationError::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(value)
}
