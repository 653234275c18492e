//! Loading of the serialized model and its feature-name list from disk.
//!
//! Both files are read exactly once, at process startup. A missing file is
//! fatal: no request is served without a valid model.

use crate::model::PriceModel;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub const MODEL_FILE: &str = "model.json";
pub const FEATURES_FILE: &str = "features.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact file not found: {path}")]
    Missing { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Directory holding the trained artifacts, `MODEL_DIR` or the default.
pub fn artifact_dir() -> PathBuf {
    std::env::var("MODEL_DIR")
        .unwrap_or_else(|_| crate::defaults::DEFAULT_MODEL_DIR.to_string())
        .into()
}

pub fn load_model(path: &Path) -> Result<PriceModel, ArtifactError> {
    read_json(path)
}

/// Load the ordered feature-name list recorded at training time.
pub fn load_features(path: &Path) -> Result<Vec<String>, ArtifactError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_artifact_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODEL_FILE);
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
        assert!(err.to_string().contains("model.json"));
    }

    #[test]
    fn test_load_features_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FEATURES_FILE);
        std::fs::write(
            &path,
            serde_json::to_vec(&json!(["carat", "cut", "color", "clarity", "table", "volume"]))
                .unwrap(),
        )
        .unwrap();

        let cols = load_features(&path).unwrap();
        assert_eq!(
            cols,
            vec!["carat", "cut", "color", "clarity", "table", "volume"]
        );
    }

    #[test]
    fn test_load_model_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODEL_FILE);
        std::fs::write(
            &path,
            serde_json::to_vec(&json!({
                "kind": "linear",
                "intercept": 0.5,
                "coefficients": [2.0]
            }))
            .unwrap(),
        )
        .unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.predict(&[3.0]).unwrap(), 6.5);
    }

    #[test]
    fn test_garbage_artifact_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODEL_FILE);
        std::fs::write(&path, b"not json").unwrap();
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }
}
