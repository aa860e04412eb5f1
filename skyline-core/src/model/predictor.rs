use crate::ValuationError;
use crate::models::FeatureVector;

/// A fitted price model: four ordered features in, one price in lakhs out.
///
/// Implementations are loaded once and never mutated afterwards, so `predict`
/// must be callable concurrently through a shared reference.
pub trait PredictionModel: Send + Sync {
    /// Predict the price, in lakhs, for the given feature vector.
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> Result<f64, ValuationError>;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;
}
