use rust_decimal::Decimal;
use skyline_core::LAKH;
use skyline_core::calculations::common::round_half_up;
use thiserror::Error;

const HUNDRED_LAKHS: Decimal = Decimal::ONE_HUNDRED;
const CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as a digit separator in either grouping (`"5,000,000"` or
/// `"50,00,000"`). Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a price given in lakhs: `₹1.25 Cr` from 100 lakhs upwards,
/// otherwise `₹55.00 L`.
pub fn format_lakhs(value_lakhs: Decimal) -> String {
    if value_lakhs >= HUNDRED_LAKHS {
        format!("₹{:.2} Cr", round_half_up(value_lakhs / HUNDRED_LAKHS))
    } else {
        format!("₹{:.2} L", round_half_up(value_lakhs))
    }
}

/// Formats an amount in rupees: crores from 1 crore, lakhs from 1 lakh,
/// whole grouped rupees below that.
pub fn format_amount(value: Decimal) -> String {
    if value >= CRORE {
        format!("₹{:.2} Cr", round_half_up(value / CRORE))
    } else if value >= LAKH {
        format!("₹{:.2} L", round_half_up(value / LAKH))
    } else {
        format!("₹{}", group_thousands(value.round()))
    }
}

/// Formats whole rupees with thousands separators, e.g. `₹43,391`.
pub fn format_rupees(value: Decimal) -> String {
    format!("₹{}", group_thousands(value.round()))
}

/// Formats an area in square feet, rounded to the nearest whole unit.
pub fn format_area(square_feet: f64) -> String {
    match Decimal::try_from(square_feet) {
        Ok(value) => format!("{} sq.ft", group_thousands(value.round())),
        Err(_) => format!("{square_feet} sq.ft"),
    }
}

fn group_thousands(value: Decimal) -> String {
    let digits = value.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value.is_sign_negative() && !value.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_separators() {
        assert_eq!(parse_decimal("5,000,000").unwrap(), dec!(5000000));
        assert_eq!(parse_decimal("50,00,000.50").unwrap(), dec!(5000000.50));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  8.5  ").unwrap(), dec!(8.5));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn format_lakhs_switches_to_crore_at_one_hundred() {
        assert_eq!(format_lakhs(dec!(55)), "₹55.00 L");
        assert_eq!(format_lakhs(dec!(99.999)), "₹100.00 L");
        assert_eq!(format_lakhs(dec!(100)), "₹1.00 Cr");
        assert_eq!(format_lakhs(dec!(125.5)), "₹1.26 Cr");
    }

    #[test]
    fn format_amount_picks_unit_by_magnitude() {
        assert_eq!(format_amount(dec!(10413878.40)), "₹1.04 Cr");
        assert_eq!(format_amount(dec!(5413878.40)), "₹54.14 L");
        assert_eq!(format_amount(dec!(100000)), "₹1.00 L");
        assert_eq!(format_amount(dec!(99999.4)), "₹99,999");
        assert_eq!(format_amount(dec!(950)), "₹950");
    }

    #[test]
    fn format_rupees_groups_thousands() {
        assert_eq!(format_rupees(dec!(43391.16)), "₹43,391");
        assert_eq!(format_rupees(dec!(1234567)), "₹1,234,567");
        assert_eq!(format_rupees(dec!(0)), "₹0");
        assert_eq!(format_rupees(dec!(-2500)), "₹-2,500");
    }

    #[test]
    fn format_area_rounds_and_groups() {
        assert_eq!(format_area(2400.0), "2,400 sq.ft");
        assert_eq!(format_area(999.6), "1,000 sq.ft");
    }
}
