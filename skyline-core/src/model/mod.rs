pub mod linear;
pub mod predictor;
pub mod registry;

pub use linear::LinearRegressionModel;
pub use predictor::PredictionModel;
pub use registry::{ModelConfig, ModelLoader, ModelRegistry};
