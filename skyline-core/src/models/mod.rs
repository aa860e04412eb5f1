mod amortization_result;
mod construction_material;
mod feature_vector;
mod loan_input;
mod prediction_result;
mod projection_result;
mod property_input;

pub use amortization_result::{AmortizationPeriod, AmortizationResult, PrincipalInterestSplit};
pub use construction_material::ConstructionMaterial;
pub use feature_vector::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use loan_input::LoanInput;
pub use prediction_result::{LAKH, PredictionResult};
pub use projection_result::ProjectionResult;
pub use property_input::{PropertyDimensions, PropertyInput, PropertyType};
