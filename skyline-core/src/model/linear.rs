//! Ordinary least-squares price model.
//!
//! The model is fitted offline (see the `skyline-data` trainer) and evaluated
//! here as `intercept + Σ coefficients[i] × features[i]`, with the features in
//! [`FEATURE_NAMES`](crate::models::FEATURE_NAMES) order.

use serde::{Deserialize, Serialize};

use crate::ValuationError;
use crate::model::PredictionModel;
use crate::models::{FEATURE_COUNT, FeatureVector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub intercept: f64,
    pub coefficients: [f64; FEATURE_COUNT],
}

impl LinearRegressionModel {
    pub fn new(
        intercept: f64,
        coefficients: [f64; FEATURE_COUNT],
    ) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// True when the intercept and every coefficient are finite.
    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite())
    }

    fn evaluate(
        &self,
        features: &FeatureVector,
    ) -> f64 {
        features
            .as_array()
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (x, beta)| acc + x * beta)
    }
}

impl PredictionModel for LinearRegressionModel {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> Result<f64, ValuationError> {
        let price = self.evaluate(features);
        if !price.is_finite() {
            return Err(ValuationError::PredictionFailed(format!(
                "linear model produced a non-finite price for {:?}",
                features.as_array()
            )));
        }
        Ok(price)
    }

    fn name(&self) -> &str {
        "linear_regression"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn predict_adds_weighted_features_to_intercept() {
        let model = LinearRegressionModel::new(10.0, [0.02, 5.0, -0.5, -1.0]);
        let features = FeatureVector::new(2000.0, 3.0, 10.0, 4.0);

        // 10 + 40 + 15 - 5 - 4
        let price = model.predict(&features).unwrap();

        assert_eq!(price, 56.0);
    }

    #[test]
    fn predict_is_sensitive_to_feature_order() {
        let model = LinearRegressionModel::new(0.0, [1.0, 100.0, 0.0, 0.0]);

        let in_order = model.predict(&FeatureVector::new(1.0, 2.0, 0.0, 0.0)).unwrap();
        let swapped = model.predict(&FeatureVector::new(2.0, 1.0, 0.0, 0.0)).unwrap();

        assert_eq!(in_order, 201.0);
        assert_eq!(swapped, 102.0);
    }

    #[test]
    fn predict_rejects_non_finite_output() {
        let model = LinearRegressionModel::new(f64::MAX, [f64::MAX, 0.0, 0.0, 0.0]);

        let result = model.predict(&FeatureVector::new(10.0, 1.0, 1.0, 1.0));

        assert!(matches!(result, Err(ValuationError::PredictionFailed(_))));
    }

    #[test]
    fn is_finite_detects_nan_coefficients() {
        assert!(LinearRegressionModel::new(1.0, [1.0; 4]).is_finite());
        assert!(!LinearRegressionModel::new(1.0, [1.0, f64::NAN, 1.0, 1.0]).is_finite());
        assert!(!LinearRegressionModel::new(f64::INFINITY, [0.0; 4]).is_finite());
    }
}
