//! Ordinary least-squares fit of the price model.
//!
//! Fits `price ~ 1 + area + bedrooms + age + distance` over the market
//! dataset. The design matrix is tall and tiny (five columns), so it is
//! solved directly by SVD.

use chrono::{DateTime, Utc};
use nalgebra::{DMatrix, DVector};
use skyline_core::{FEATURE_COUNT, FeatureVector, LinearRegressionModel};
use skyline_model_json::{ArtifactMetadata, ModelArtifact};
use thiserror::Error;
use tracing::{debug, info};

use crate::market::MarketRecord;

/// Intercept plus one column per feature.
const PARAMETER_COUNT: usize = FEATURE_COUNT + 1;

/// Singular values below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, PartialEq)]
pub enum TrainError {
    #[error("need at least {required} records to fit the model, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("design matrix is singular; a feature is constant or collinear with the others")]
    Singular,
}

/// A fitted model together with its goodness of fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub model: LinearRegressionModel,
    pub sample_count: usize,
    pub r_squared: f64,
}

impl TrainedModel {
    pub fn to_artifact(
        &self,
        trained_at: DateTime<Utc>,
    ) -> ModelArtifact {
        ModelArtifact::from_model(
            &self.model,
            ArtifactMetadata {
                sample_count: self.sample_count,
                r_squared: self.r_squared,
                trained_at,
            },
        )
    }
}

fn features_of(record: &MarketRecord) -> FeatureVector {
    FeatureVector::new(
        record.area,
        f64::from(record.bedrooms),
        record.age,
        record.distance,
    )
}

/// One row per record: a leading 1 for the intercept, then the features.
fn design_matrix(records: &[MarketRecord]) -> DMatrix<f64> {
    let features: Vec<FeatureVector> = records.iter().map(features_of).collect();
    DMatrix::from_fn(records.len(), PARAMETER_COUNT, |row, col| match col {
        0 => 1.0,
        _ => features[row].as_array()[col - 1],
    })
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` when the design matrix is rank deficient.
fn solve_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let largest = svd.singular_values.max();
    let eps = largest * RANK_TOLERANCE;
    if largest <= 0.0 || svd.rank(eps) < x.ncols() {
        return None;
    }

    svd.solve(y, eps)
        .ok()
        .filter(|beta| beta.iter().all(|v| v.is_finite()))
}

/// Fit the price model to `records`.
///
/// # Errors
///
/// - [`TrainError::InsufficientData`] with fewer rows than parameters
/// - [`TrainError::Singular`] when a feature is constant or collinear
pub fn train(records: &[MarketRecord]) -> Result<TrainedModel, TrainError> {
    let n = records.len();
    if n < PARAMETER_COUNT {
        return Err(TrainError::InsufficientData {
            required: PARAMETER_COUNT,
            actual: n,
        });
    }

    let x = design_matrix(records);
    let y = DVector::from_iterator(n, records.iter().map(|r| r.price));

    let beta = solve_least_squares(&x, &y).ok_or(TrainError::Singular)?;

    let mut coefficients = [0.0; FEATURE_COUNT];
    coefficients.copy_from_slice(&beta.as_slice()[1..]);
    let model = LinearRegressionModel::new(beta[0], coefficients);

    let fitted = &x * &beta;
    let ss_res = (&y - fitted).norm_squared();
    let mean = y.mean();
    let ss_tot = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    debug!(intercept = model.intercept, coefficients = ?model.coefficients, "least squares solution");
    info!(samples = n, r_squared, "price model trained");

    Ok(TrainedModel {
        model,
        sample_count: n,
        r_squared,
    })
}
