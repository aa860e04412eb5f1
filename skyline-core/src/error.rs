use thiserror::Error;

/// Errors surfaced by the valuation core.
///
/// The core never swallows or retries a failure; every variant is returned
/// to the caller, which decides whether to show a message or disable the
/// affected section.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValuationError {
    /// No trained model is available, or the artifact could not be loaded.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// An input violated its numeric contract.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// The model was invoked but did not produce a usable price.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

impl ValuationError {
    pub(crate) fn invalid(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
