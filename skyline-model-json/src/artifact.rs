use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyline_core::{FEATURE_COUNT, FEATURE_NAMES, LinearRegressionModel};
use thiserror::Error;

/// Current on-disk layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Model kind recorded in every artifact this crate writes.
pub const LINEAR_REGRESSION: &str = "linear_regression";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model artifact '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model artifact: {0}")]
    Unsupported(String),
}

/// Fit statistics stored next to the coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub sample_count: usize,
    pub r_squared: f64,
    pub trained_at: DateTime<Utc>,
}

/// Serialized form of a fitted linear price model.
///
/// `feature_names` pins the coefficient order; an artifact whose names differ
/// from [`FEATURE_NAMES`] is refused on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub kind: String,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(flatten)]
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    pub fn from_model(
        model: &LinearRegressionModel,
        metadata: ArtifactMetadata,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            kind: LINEAR_REGRESSION.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            intercept: model.intercept,
            coefficients: model.coefficients.to_vec(),
            metadata,
        }
    }

    /// Checks version, kind, feature order and coefficients, then rebuilds
    /// the model.
    pub fn to_model(&self) -> Result<LinearRegressionModel, ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Unsupported(format!(
                "format version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.kind != LINEAR_REGRESSION {
            return Err(ArtifactError::Unsupported(format!("model kind '{}'", self.kind)));
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(ArtifactError::Unsupported(format!(
                "feature order {:?} (expected {:?})",
                self.feature_names, FEATURE_NAMES
            )));
        }

        let coefficients: [f64; FEATURE_COUNT] =
            self.coefficients.as_slice().try_into().map_err(|_| {
                ArtifactError::Unsupported(format!(
                    "{} coefficients (expected {FEATURE_COUNT})",
                    self.coefficients.len()
                ))
            })?;

        let model = LinearRegressionModel::new(self.intercept, coefficients);
        if !model.is_finite() {
            return Err(ArtifactError::Unsupported("non-finite coefficients".to_string()));
        }
        Ok(model)
    }
}

/// Writes `artifact` to `path` as pretty-printed JSON, replacing any
/// existing file.
pub fn write_artifact(
    path: &Path,
    artifact: &ModelArtifact,
) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifact).map_err(|source| ArtifactError::Json {
        path: path.display().to_string(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Reads and parses an artifact without validating it.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            sample_count: 120,
            r_squared: 0.93,
            trained_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    fn artifact() -> ModelArtifact {
        let model = LinearRegressionModel::new(4.5, [0.03, 6.0, -0.8, -1.2]);
        ModelArtifact::from_model(&model, metadata())
    }

    #[test]
    fn from_model_records_feature_order() {
        let artifact = artifact();

        assert_eq!(artifact.format_version, FORMAT_VERSION);
        assert_eq!(artifact.kind, "linear_regression");
        assert_eq!(artifact.feature_names, vec!["area", "bedrooms", "age", "distance"]);
        assert_eq!(artifact.coefficients, vec![0.03, 6.0, -0.8, -1.2]);
    }

    #[test]
    fn to_model_rebuilds_coefficients() {
        let model = artifact().to_model().unwrap();

        assert_eq!(model, LinearRegressionModel::new(4.5, [0.03, 6.0, -0.8, -1.2]));
    }

    #[test]
    fn to_model_rejects_reordered_features() {
        let mut artifact = artifact();
        artifact.feature_names.swap(0, 1);

        assert!(matches!(artifact.to_model(), Err(ArtifactError::Unsupported(msg)) if msg.contains("feature order")));
    }

    #[test]
    fn to_model_rejects_wrong_coefficient_count() {
        let mut artifact = artifact();
        artifact.coefficients.pop();

        assert!(matches!(artifact.to_model(), Err(ArtifactError::Unsupported(_))));
    }

    #[test]
    fn to_model_rejects_unknown_kind_and_version() {
        let mut wrong_kind = artifact();
        wrong_kind.kind = "random_forest".to_string();
        let mut wrong_version = artifact();
        wrong_version.format_version = 99;

        assert!(wrong_kind.to_model().is_err());
        assert!(wrong_version.to_model().is_err());
    }

    #[test]
    fn metadata_is_flattened_into_the_document() {
        let json = serde_json::to_value(artifact()).unwrap();

        assert_eq!(json["sample_count"], 120);
        assert_eq!(json["kind"], "linear_regression");
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn write_then_read_preserves_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house_model.json");

        write_artifact(&path, &artifact()).unwrap();
        let loaded = read_artifact(&path).unwrap();

        assert_eq!(loaded, artifact());
    }

    #[test]
    fn read_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_artifact(&path), Err(ArtifactError::Json { .. })));
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let result = read_artifact(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }
}
