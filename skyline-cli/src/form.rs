//! Input forms for the valuation report.
//!
//! Each form holds the raw values a user entered and checks them against
//! the ranges the dashboard accepts. Validation reports every violation at
//! once rather than stopping at the first.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use skyline_core::{LoanInput, PropertyDimensions, PropertyInput, PropertyType};
use thiserror::Error;

const PLOT_AREA: RangeInclusive<f64> = 100.0..=10_000.0;
const FLOORS: RangeInclusive<f64> = 1.0..=5.0;
const CARPET_AREA: RangeInclusive<f64> = 100.0..=5_000.0;
const BALCONY_AREA: RangeInclusive<f64> = 0.0..=1_000.0;
const BEDROOMS: RangeInclusive<u32> = 1..=10;
const DISTANCE_KM: RangeInclusive<f64> = 0.0..=50.0;
const RATE_PERCENT: RangeInclusive<Decimal> = Decimal::ONE..=Decimal::from_parts(20, 0, 0, false, 0);
const TENURE_YEARS: RangeInclusive<i32> = 5..=30;

/// Earliest accepted construction date.
pub fn earliest_construction_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Every validation failure found in a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct FormErrors(pub Vec<String>);

#[derive(Default)]
struct Collector(Vec<String>);

impl Collector {
    fn range<T>(
        &mut self,
        field: &str,
        value: T,
        range: &RangeInclusive<T>,
    ) where
        T: PartialOrd + fmt::Display,
    {
        if !range.contains(&value) {
            self.0.push(format!(
                "{field} must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ));
        }
    }

    fn whole(
        &mut self,
        field: &str,
        value: f64,
    ) {
        if value.fract() != 0.0 {
            self.0.push(format!("{field} must be a whole number, got {value}"));
        }
    }

    fn finish<T>(
        self,
        value: T,
    ) -> Result<T, FormErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(FormErrors(self.0))
        }
    }
}

/// Property section of the form.
///
/// Only the dimension pair matching `property_type` is validated and used.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub property_type: PropertyType,
    pub construction_date: NaiveDate,
    pub plot_area: f64,
    pub floors: f64,
    pub carpet_area: f64,
    pub balcony_area: f64,
    pub bedrooms: u32,
    pub distance_km: f64,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            property_type: PropertyType::House,
            construction_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN),
            plot_area: 1200.0,
            floors: 2.0,
            carpet_area: 900.0,
            balcony_area: 100.0,
            bedrooms: 3,
            distance_km: 5.0,
        }
    }
}

impl PropertyForm {
    /// Checks every field and builds a [`PropertyInput`].
    ///
    /// `today` bounds the construction date from above.
    pub fn validate(
        &self,
        today: NaiveDate,
    ) -> Result<PropertyInput, FormErrors> {
        let mut errors = Collector::default();

        if self.construction_date < earliest_construction_date() {
            errors.0.push(format!(
                "Construction date must be on or after {}, got {}",
                earliest_construction_date(),
                self.construction_date
            ));
        }
        if self.construction_date > today {
            errors.0.push(format!(
                "Construction date must not be in the future, got {}",
                self.construction_date
            ));
        }

        let dimensions = match self.property_type {
            PropertyType::House => {
                errors.range("Plot area", self.plot_area, &PLOT_AREA);
                errors.range("Floors", self.floors, &FLOORS);
                errors.whole("Floors", self.floors);
                PropertyDimensions::House {
                    plot_area: self.plot_area,
                    floors: self.floors,
                }
            }
            PropertyType::Apartment => {
                errors.range("Carpet area", self.carpet_area, &CARPET_AREA);
                errors.range("Balcony area", self.balcony_area, &BALCONY_AREA);
                PropertyDimensions::Apartment {
                    carpet_area: self.carpet_area,
                    balcony_area: self.balcony_area,
                }
            }
        };

        errors.range("Bedrooms", self.bedrooms, &BEDROOMS);
        errors.range("Distance (km)", self.distance_km, &DISTANCE_KM);

        errors.finish(PropertyInput {
            construction_date: self.construction_date,
            dimensions,
            bedrooms: self.bedrooms,
            distance_km: self.distance_km,
        })
    }
}

/// Financing section of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanForm {
    pub principal: Decimal,
    pub rate_percent: Decimal,
    pub tenure_years: i32,
}

impl LoanForm {
    pub fn validate(&self) -> Result<LoanInput, FormErrors> {
        let mut errors = Collector::default();

        if self.principal < Decimal::ZERO {
            errors
                .0
                .push(format!("Loan amount must not be negative, got {}", self.principal));
        }
        errors.range("Interest rate (%)", self.rate_percent, &RATE_PERCENT);
        errors.range("Tenure (years)", self.tenure_years, &TENURE_YEARS);

        errors.finish(LoanInput::new(self.principal, self.rate_percent, self.tenure_years))
    }
}
