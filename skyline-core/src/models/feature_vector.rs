use serde::{Deserialize, Serialize};

/// Number of features the price model consumes.
pub const FEATURE_COUNT: usize = 4;

/// Column order shared by the engine, the trainer and the model artifact.
///
/// The model is order-sensitive: coefficient `i` multiplies feature `i`.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["area", "bedrooms", "age", "distance"];

/// Ordered model input: `[area, bedrooms, age, distance]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(
        area: f64,
        bedrooms: f64,
        age: f64,
        distance: f64,
    ) -> Self {
        Self([area, bedrooms, age, distance])
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn area(&self) -> f64 {
        self.0[0]
    }

    pub fn bedrooms(&self) -> f64 {
        self.0[1]
    }

    pub fn age(&self) -> f64 {
        self.0[2]
    }

    pub fn distance(&self) -> f64 {
        self.0[3]
    }

    /// Pairs each value with its column name, in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
