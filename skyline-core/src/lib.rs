pub mod calculations;
pub mod error;
pub mod model;
pub mod models;

pub use error::ValuationError;
pub use model::{LinearRegressionModel, ModelConfig, ModelLoader, ModelRegistry, PredictionModel};
pub use models::*;
