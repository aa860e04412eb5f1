//! Valuation, amortization and projection calculators.
//!
//! Each calculator is a small value type holding only its policy; every
//! operation is a pure function of its inputs.

pub mod amortization;
pub mod common;
pub mod projection;
pub mod valuation;

pub use amortization::{AmortizationCalculator, ZeroRatePolicy};
pub use projection::{ProjectionCalculator, ProjectionConfig};
pub use valuation::ValuationEngine;
