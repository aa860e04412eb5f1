use skyline_core::model::{ModelConfig, ModelLoader, PredictionModel};
use skyline_core::ValuationError;
use tracing::info;

use crate::artifact::read_artifact;

/// [`ModelLoader`] for JSON artifacts written by [`crate::write_artifact`].
///
/// Register this with a [`skyline_core::ModelRegistry`] to make the `"json"`
/// format available:
///
/// ```rust,no_run
/// use skyline_core::ModelRegistry;
/// use skyline_model_json::JsonModelLoader;
///
/// let mut registry = ModelRegistry::new();
/// registry.register(Box::new(JsonModelLoader));
/// ```
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn format_name(&self) -> &'static str {
        "json"
    }

    /// Reads `config.artifact_path`.
    ///
    /// A missing file, malformed JSON, an unsupported version or a feature
    /// order that differs from the engine's are all reported as
    /// [`ValuationError::ModelUnavailable`].
    fn load(
        &self,
        config: &ModelConfig,
    ) -> Result<Box<dyn PredictionModel>, ValuationError> {
        let path = &config.artifact_path;
        if !path.is_file() {
            return Err(ValuationError::ModelUnavailable(format!(
                "model artifact '{}' not found",
                path.display()
            )));
        }

        let artifact =
            read_artifact(path).map_err(|e| ValuationError::ModelUnavailable(e.to_string()))?;
        let model = artifact
            .to_model()
            .map_err(|e| ValuationError::ModelUnavailable(e.to_string()))?;

        info!(
            path = %path.display(),
            samples = artifact.metadata.sample_count,
            r_squared = artifact.metadata.r_squared,
            "loaded price model"
        );
        Ok(Box::new(model))
    }
}
