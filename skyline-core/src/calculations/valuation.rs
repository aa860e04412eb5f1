//! Property valuation: derived attributes and model inference.
//!
//! # Derivation
//!
//! | Attribute | House | Apartment |
//! |-----------|-------|-----------|
//! | area      | plot area × floors | carpet area + balcony area |
//! | age       | reference year − construction year | same |
//!
//! The model receives `[area, bedrooms, age, distance]` in that exact order.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use skyline_core::calculations::ValuationEngine;
//! use skyline_core::{LinearRegressionModel, PropertyDimensions, PropertyInput};
//!
//! let model = LinearRegressionModel::new(5.0, [0.02, 4.0, -0.5, -1.0]);
//! let engine = ValuationEngine::new(Some(&model)).with_reference_year(2026);
//!
//! let input = PropertyInput {
//!     construction_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
//!     dimensions: PropertyDimensions::House { plot_area: 1200.0, floors: 2.0 },
//!     bedrooms: 3,
//!     distance_km: 5.0,
//! };
//!
//! let result = engine.estimate(&input).unwrap();
//!
//! // 5 + 0.02×2400 + 4×3 − 0.5×10 − 1×5
//! assert_eq!(result.price_lakhs, dec!(55));
//! assert_eq!(result.age, 10);
//! ```

use chrono::{Datelike, Local};
use tracing::{debug, warn};

use crate::ValuationError;
use crate::calculations::common::{require_non_negative, to_decimal};
use crate::model::PredictionModel;
use crate::models::{FeatureVector, PredictionResult, PropertyDimensions, PropertyInput};

/// Turns raw property inputs into a price estimate.
///
/// Borrows a read-only model handle; holds no other state between calls.
#[derive(Clone, Copy)]
pub struct ValuationEngine<'a> {
    model: Option<&'a dyn PredictionModel>,
    reference_year: i32,
}

impl<'a> ValuationEngine<'a> {
    /// Creates an engine over `model`, using the current local year for ages.
    ///
    /// Passing `None` is allowed: every [`estimate`](Self::estimate) call
    /// then fails with [`ValuationError::ModelUnavailable`].
    pub fn new(model: Option<&'a dyn PredictionModel>) -> Self {
        Self {
            model,
            reference_year: Local::now().year(),
        }
    }

    /// Pins the year ages are measured against.
    pub fn with_reference_year(
        mut self,
        reference_year: i32,
    ) -> Self {
        self.reference_year = reference_year;
        self
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Estimates the price of a property.
    ///
    /// # Errors
    ///
    /// * [`ValuationError::ModelUnavailable`] when no model was supplied.
    /// * [`ValuationError::InvalidInput`] when an input or derived attribute
    ///   is out of range (see [`features`](Self::features)).
    /// * [`ValuationError::PredictionFailed`] when the model errors or
    ///   returns a non-finite price.
    pub fn estimate(
        &self,
        input: &PropertyInput,
    ) -> Result<PredictionResult, ValuationError> {
        let model = self.model.ok_or_else(|| {
            ValuationError::ModelUnavailable("no trained model has been loaded".to_string())
        })?;

        let features = self.features(input)?;
        let price = model.predict(&features)?;
        if !price.is_finite() {
            return Err(ValuationError::PredictionFailed(format!(
                "model '{}' returned {price}",
                model.name()
            )));
        }

        let price_lakhs = to_decimal("price_lakhs", price)
            .map_err(|e| ValuationError::PredictionFailed(e.to_string()))?;

        debug!(
            model = model.name(),
            area = features.area(),
            age = features.age(),
            %price_lakhs,
            "property valued"
        );

        Ok(PredictionResult {
            price_lakhs,
            area: features.area(),
            age: features.age() as i32,
            features,
        })
    }

    /// Validates the input and assembles the ordered feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] if:
    /// - any dimension is negative or not finite
    /// - the derived area is not strictly positive
    /// - `bedrooms` is zero
    /// - `distance_km` is negative or not finite
    /// - the construction year is after the reference year
    pub fn features(
        &self,
        input: &PropertyInput,
    ) -> Result<FeatureVector, ValuationError> {
        let area = derived_area(&input.dimensions).inspect_err(|e| {
            warn!(error = %e, "rejected property dimensions");
        })?;

        if input.bedrooms < 1 {
            warn!(bedrooms = input.bedrooms, "rejected bedroom count");
            return Err(ValuationError::invalid("bedrooms", "must be at least 1"));
        }

        let distance = require_non_negative("distance_km", input.distance_km)?;

        let age = input.age(self.reference_year);
        if age < 0 {
            warn!(
                construction_date = %input.construction_date,
                reference_year = self.reference_year,
                "construction date lies in the future"
            );
            return Err(ValuationError::invalid(
                "construction_date",
                format!(
                    "{} is after the reference year {}",
                    input.construction_date, self.reference_year
                ),
            ));
        }

        Ok(FeatureVector::new(
            area,
            f64::from(input.bedrooms),
            f64::from(age),
            distance,
        ))
    }
}

impl std::fmt::Debug for ValuationEngine<'_> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ValuationEngine")
            .field("model", &self.model.map(|m| m.name()))
            .field("reference_year", &self.reference_year)
            .finish()
    }
}

/// Validates the dimensions for the property type and returns the area.
fn derived_area(dimensions: &PropertyDimensions) -> Result<f64, ValuationError> {
    match *dimensions {
        PropertyDimensions::House { plot_area, floors } => {
            require_non_negative("plot_area", plot_area)?;
            require_non_negative("floors", floors)?;
        }
        PropertyDimensions::Apartment {
            carpet_area,
            balcony_area,
        } => {
            require_non_negative("carpet_area", carpet_area)?;
            require_non_negative("balcony_area", balcony_area)?;
        }
    }

    let area = dimensions.area();
    if !area.is_finite() || area <= 0.0 {
        return Err(ValuationError::invalid(
            "area",
            format!("must be greater than zero, got {area}"),
        ));
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::LinearRegressionModel;

    /// Records every feature vector it is asked to price.
    struct RecordingModel {
        price: f64,
        seen: Mutex<Vec<[f64; 4]>>,
    }

    impl RecordingModel {
        fn returning(price: f64) -> Self {
            Self {
                price,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl PredictionModel for RecordingModel {
        fn predict(
            &self,
            features: &FeatureVector,
        ) -> Result<f64, ValuationError> {
            self.seen.lock().unwrap().push(*features.as_array());
            Ok(self.price)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingModel;

    impl PredictionModel for FailingModel {
        fn predict(
            &self,
            _features: &FeatureVector,
        ) -> Result<f64, ValuationError> {
            Err(ValuationError::PredictionFailed("shape mismatch".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn house(
        plot_area: f64,
        floors: f64,
    ) -> PropertyInput {
        PropertyInput {
            construction_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            dimensions: PropertyDimensions::House { plot_area, floors },
            bedrooms: 3,
            distance_km: 5.0,
        }
    }

    fn apartment(
        carpet_area: f64,
        balcony_area: f64,
    ) -> PropertyInput {
        PropertyInput {
            construction_date: NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(),
            dimensions: PropertyDimensions::Apartment {
                carpet_area,
                balcony_area,
            },
            bedrooms: 2,
            distance_km: 12.0,
        }
    }

    /// Initializes tracing subscriber for tests that exercise warn paths.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // feature vector tests
    // =========================================================================

    #[test]
    fn features_are_area_bedrooms_age_distance_in_order() {
        let model = RecordingModel::returning(50.0);
        let engine = ValuationEngine::new(Some(&model)).with_reference_year(2026);

        engine.estimate(&house(1200.0, 2.0)).unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[[2400.0, 3.0, 11.0, 5.0]]);
    }

    #[test]
    fn apartment_features_use_carpet_plus_balcony() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let features = engine.features(&apartment(900.0, 100.0)).unwrap();

        assert_eq!(features.as_array(), &[1000.0, 2.0, 6.0, 12.0]);
    }

    #[test]
    fn features_accept_zero_age_and_zero_distance() {
        let engine = ValuationEngine::new(None).with_reference_year(2015);
        let input = PropertyInput {
            distance_km: 0.0,
            ..house(1500.0, 1.0)
        };

        let features = engine.features(&input).unwrap();

        assert_eq!(features.age(), 0.0);
        assert_eq!(features.distance(), 0.0);
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn estimate_returns_model_price_in_lakhs() {
        let model = LinearRegressionModel::new(10.0, [0.01, 2.0, -0.25, -0.5]);
        let engine = ValuationEngine::new(Some(&model)).with_reference_year(2025);

        let result = engine.estimate(&house(1000.0, 2.0)).unwrap();

        // 10 + 20 + 6 - 2.5 - 2.5
        assert_eq!(result.price_lakhs, dec!(31));
        assert_eq!(result.price_in_units(), dec!(3100000));
        assert_eq!(result.area, 2000.0);
        assert_eq!(result.age, 10);
    }

    #[test]
    fn estimate_is_idempotent() {
        let model = LinearRegressionModel::new(3.0, [0.05, 1.0, -0.1, -0.2]);
        let engine = ValuationEngine::new(Some(&model)).with_reference_year(2026);
        let input = apartment(750.0, 80.0);

        let first = engine.estimate(&input).unwrap();
        let second = engine.estimate(&input).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn estimate_without_model_is_model_unavailable() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let result = engine.estimate(&house(1200.0, 2.0));

        assert!(matches!(result, Err(ValuationError::ModelUnavailable(_))));
        assert!(!engine.has_model());
    }

    #[test]
    fn estimate_without_model_fails_even_for_invalid_input() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let result = engine.estimate(&house(-5.0, 2.0));

        assert!(matches!(result, Err(ValuationError::ModelUnavailable(_))));
    }

    #[test]
    fn estimate_surfaces_model_errors() {
        let engine = ValuationEngine::new(Some(&FailingModel)).with_reference_year(2026);

        let result = engine.estimate(&house(1200.0, 2.0));

        assert_eq!(
            result,
            Err(ValuationError::PredictionFailed("shape mismatch".to_string()))
        );
    }

    #[test]
    fn estimate_rejects_non_finite_model_output() {
        let model = RecordingModel::returning(f64::NAN);
        let engine = ValuationEngine::new(Some(&model)).with_reference_year(2026);

        let result = engine.estimate(&house(1200.0, 2.0));

        assert!(matches!(result, Err(ValuationError::PredictionFailed(_))));
    }

    #[test]
    fn invalid_input_never_reaches_the_model() {
        let _guard = init_test_tracing();
        let model = RecordingModel::returning(50.0);
        let engine = ValuationEngine::new(Some(&model)).with_reference_year(2026);

        let result = engine.estimate(&house(1200.0, 0.0));

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "area", .. })
        ));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn rejects_negative_plot_area() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let result = engine.features(&house(-1200.0, 2.0));

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "plot_area", .. })
        ));
    }

    #[test]
    fn rejects_nan_carpet_area() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let result = engine.features(&apartment(f64::NAN, 100.0));

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "carpet_area", .. })
        ));
    }

    #[test]
    fn rejects_zero_area_apartment() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);

        let result = engine.features(&apartment(0.0, 0.0));

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "area", .. })
        ));
    }

    #[test]
    fn rejects_zero_bedrooms() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);
        let input = PropertyInput {
            bedrooms: 0,
            ..house(1200.0, 2.0)
        };

        let result = engine.features(&input);

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "bedrooms", .. })
        ));
    }

    #[test]
    fn rejects_negative_distance() {
        let engine = ValuationEngine::new(None).with_reference_year(2026);
        let input = PropertyInput {
            distance_km: -1.0,
            ..house(1200.0, 2.0)
        };

        let result = engine.features(&input);

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "distance_km", .. })
        ));
    }

    #[test]
    fn rejects_construction_after_reference_year() {
        let _guard = init_test_tracing();
        let engine = ValuationEngine::new(None).with_reference_year(2014);

        let result = engine.features(&house(1200.0, 2.0));

        assert!(matches!(
            result,
            Err(ValuationError::InvalidInput { field: "construction_date", .. })
        ));
    }

    #[test]
    fn default_reference_year_is_current_year() {
        let engine = ValuationEngine::new(None);

        assert_eq!(engine.reference_year(), Local::now().year());
    }
}
