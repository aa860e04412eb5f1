use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use super::predictor::PredictionModel;
use crate::ValuationError;

/// Where to find the fitted model and how it is serialized.
///
/// `format` must match the [`ModelLoader::format_name`] of a registered
/// loader. `artifact_path` is passed through to that loader unchanged.
///
/// | format | artifact_path example |
/// |--------|-----------------------|
/// | `json` | `house_model.json`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Lowercase identifier matching a registered loader (e.g. `"json"`).
    pub format: String,
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            artifact_path: PathBuf::from("house_model.json"),
        }
    }
}

/// One implementation per artifact format. Each backend crate exports a unit
/// struct implementing this trait, registered with a [`ModelRegistry`] at
/// startup.
pub trait ModelLoader: Send + Sync {
    /// Unique, lowercase identifier for this format.
    fn format_name(&self) -> &'static str;

    /// Read the artifact and return a ready-to-use model.
    ///
    /// A missing or unreadable artifact is reported as
    /// [`ValuationError::ModelUnavailable`].
    fn load(
        &self,
        config: &ModelConfig,
    ) -> Result<Box<dyn PredictionModel>, ValuationError>;
}

/// Registry of [`ModelLoader`] instances, keyed by format name.
///
/// Typical lifetime:
/// 1. Create with `ModelRegistry::new()`.
/// 2. Call `register` once per known format.
/// 3. Call `load` once at startup and share the returned model.
pub struct ModelRegistry {
    loaders: HashMap<&'static str, Box<dyn ModelLoader>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register a loader. A loader with the same format name is replaced.
    pub fn register(
        &mut self,
        loader: Box<dyn ModelLoader>,
    ) {
        self.loaders.insert(loader.format_name(), loader);
    }

    /// Names of every registered format, sorted alphabetically.
    pub fn available_formats(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.loaders.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the loader matching `config.format`.
    ///
    /// # Errors
    /// * [`ValuationError::ModelUnavailable`]: no loader is registered for
    ///   the requested format.
    /// * Any error the chosen loader returns.
    pub fn load(
        &self,
        config: &ModelConfig,
    ) -> Result<Box<dyn PredictionModel>, ValuationError> {
        let loader = self.loaders.get(config.format.as_str()).ok_or_else(|| {
            ValuationError::ModelUnavailable(format!(
                "unknown model format '{}'; available: {:?}",
                config.format,
                self.available_formats()
            ))
        })?;

        debug!(
            format = loader.format_name(),
            path = %config.artifact_path.display(),
            "loading model artifact"
        );
        loader.load(config)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{ModelConfig, ModelLoader, ModelRegistry, PredictionModel, ValuationError};
    use crate::model::LinearRegressionModel;
    use crate::models::FeatureVector;

    // ── stub loader ──────────────────────────────────────────────────────
    /// Returns a constant-price model and flips `called` so tests can prove
    /// the registry reached it.
    struct StubLoader {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    impl ModelLoader for StubLoader {
        fn format_name(&self) -> &'static str {
            self.name
        }

        fn load(
            &self,
            _config: &ModelConfig,
        ) -> Result<Box<dyn PredictionModel>, ValuationError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(LinearRegressionModel::new(42.0, [0.0; 4])))
        }
    }

    /// Always reports a missing artifact.
    struct MissingArtifactLoader;

    impl ModelLoader for MissingArtifactLoader {
        fn format_name(&self) -> &'static str {
            "missing"
        }

        fn load(
            &self,
            config: &ModelConfig,
        ) -> Result<Box<dyn PredictionModel>, ValuationError> {
            Err(ValuationError::ModelUnavailable(format!(
                "{} not found",
                config.artifact_path.display()
            )))
        }
    }

    fn stub_loader(name: &'static str) -> (Box<dyn ModelLoader>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubLoader {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(format: &str) -> ModelConfig {
        ModelConfig {
            format: format.to_string(),
            artifact_path: "model.bin".into(),
        }
    }

    // ── ModelConfig ──────────────────────────────────────────────────────
    #[test]
    fn model_config_default_is_json_house_model() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.format, "json");
        assert_eq!(cfg.artifact_path, std::path::PathBuf::from("house_model.json"));
    }

    // ── registration ─────────────────────────────────────────────────────
    #[test]
    fn new_registry_has_no_formats() {
        assert!(ModelRegistry::new().available_formats().is_empty());
        assert!(ModelRegistry::default().available_formats().is_empty());
    }

    #[test]
    fn available_formats_is_sorted() {
        let mut reg = ModelRegistry::new();
        let (f1, _) = stub_loader("toml");
        let (f2, _) = stub_loader("json");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_formats(), vec!["json", "toml"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = ModelRegistry::new();
        let (old, old_called) = stub_loader("json");
        let (new, new_called) = stub_loader("json");
        reg.register(old);
        reg.register(new);

        assert_eq!(reg.available_formats(), vec!["json"]);

        reg.load(&config("json")).unwrap();
        assert!(!old_called.load(Ordering::SeqCst));
        assert!(new_called.load(Ordering::SeqCst));
    }

    // ── dispatch ─────────────────────────────────────────────────────────
    #[test]
    fn load_calls_matching_loader_only() {
        let mut reg = ModelRegistry::new();
        let (json, json_called) = stub_loader("json");
        let (toml, toml_called) = stub_loader("toml");
        reg.register(json);
        reg.register(toml);

        let model = reg.load(&config("json")).expect("json loader should succeed");

        assert!(json_called.load(Ordering::SeqCst));
        assert!(!toml_called.load(Ordering::SeqCst));
        assert_eq!(model.predict(&FeatureVector::new(1.0, 1.0, 1.0, 1.0)), Ok(42.0));
    }

    #[test]
    fn unknown_format_names_requested_and_available() {
        let mut reg = ModelRegistry::new();
        let (f, _) = stub_loader("json");
        reg.register(f);

        match reg.load(&config("pickle")) {
            Err(ValuationError::ModelUnavailable(msg)) => {
                assert!(msg.contains("pickle"), "error should name the requested format");
                assert!(msg.contains("json"), "error should list available formats");
            }
            Err(other) => panic!("expected ModelUnavailable, got {other:#?}"),
            Ok(model) => panic!("expected an error, got model {}", model.name()),
        }
    }

    #[test]
    fn load_propagates_loader_error() {
        let mut reg = ModelRegistry::new();
        reg.register(Box::new(MissingArtifactLoader));

        let result = reg.load(&config("missing"));

        assert!(matches!(
            result,
            Err(ValuationError::ModelUnavailable(msg)) if msg.contains("model.bin")
        ));
    }
}
