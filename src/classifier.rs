use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::ClinicalDataset;
use crate::error::DashError;

// ---------------------------------------------------------------------------
// Persisted classifier
// ---------------------------------------------------------------------------

/// A previously trained tree-ensemble classifier, as exported for the
/// dashboard. Only the attributes the charts read are kept.
///
/// ```json
/// {
///   "model_type": "random_forest",
///   "n_estimators": 100,
///   "feature_names": ["Age", "Gender", ...],
///   "feature_importances": [0.081, 0.094, ...]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    #[serde(default)]
    pub n_estimators: Option<usize>,
    /// Names the model was trained on, when the exporter recorded them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Impurity-based importances aligned positionally with the feature columns.
    pub feature_importances: Vec<f64>,
}

/// Deserialize the model artifact. The file is closed before returning.
pub fn load_model(path: &Path) -> Result<ModelArtifact> {
    let file = File::open(path)
        .with_context(|| format!("opening model artifact {}", path.display()))?;
    let model: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing model artifact {}", path.display()))?;

    log::info!(
        "Loaded {} model ({} trees, {} features)",
        model.model_type,
        model
            .n_estimators
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".into()),
        model.feature_importances.len()
    );
    Ok(model)
}

impl ModelArtifact {
    /// Pair each feature column of `dataset` with its importance score.
    ///
    /// The label column is excluded; the score count has to equal the number of
    /// remaining columns, and recorded feature names must agree in order.
    pub fn importance_pairs(&self, dataset: &ClinicalDataset) -> Result<Vec<(String, f64)>, DashError> {
        let features = dataset.feature_columns();
        if features.len() != self.feature_importances.len() {
            return Err(DashError::FeatureMismatch {
                importances: self.feature_importances.len(),
                features: features.len(),
            });
        }

        if let Some(names) = &self.feature_names {
            if names.len() != features.len() {
                return Err(DashError::FeatureMismatch {
                    importances: names.len(),
                    features: features.len(),
                });
            }
            if let Some((position, (model, column))) = names
                .iter()
                .zip(features)
                .enumerate()
                .find(|(_, (m, c))| m != c)
            {
                return Err(DashError::FeatureNameMismatch {
                    position,
                    model: model.clone(),
                    dataset: column.clone(),
                });
            }
        }

        Ok(features
            .iter()
            .cloned()
            .zip(self.feature_importances.iter().copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::CellValue;

    fn dataset() -> ClinicalDataset {
        ClinicalDataset::from_rows(
            vec!["Age".into(), "Polyuria".into(), "class".into()],
            vec![vec![CellValue::Integer(40), CellValue::Bool(true), CellValue::Bool(true)]],
        )
        .unwrap()
    }

    fn model(importances: Vec<f64>, names: Option<Vec<&str>>) -> ModelArtifact {
        ModelArtifact {
            model_type: "random_forest".into(),
            n_estimators: Some(10),
            feature_names: names.map(|n| n.into_iter().map(String::from).collect()),
            feature_importances: importances,
        }
    }

    #[test]
    fn loads_artifact_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_type": "random_forest", "feature_importances": [0.25, 0.75]}}"#
        )
        .unwrap();
        let model = load_model(file.path()).unwrap();
        assert_eq!(model.model_type, "random_forest");
        assert_eq!(model.n_estimators, None);
        assert_eq!(model.feature_importances, vec![0.25, 0.75]);
    }

    #[test]
    fn missing_artifact_is_an_error() {
        assert!(load_model(Path::new("/nonexistent/rf_model.json")).is_err());
    }

    #[test]
    fn pairs_exclude_label_column() {
        let pairs = model(vec![0.3, 0.7], None).importance_pairs(&dataset()).unwrap();
        assert_eq!(pairs, vec![("Age".to_string(), 0.3), ("Polyuria".to_string(), 0.7)]);
    }

    #[test]
    fn score_count_must_match_features() {
        let err = model(vec![0.2, 0.3, 0.5], None)
            .importance_pairs(&dataset())
            .unwrap_err();
        assert!(matches!(err, DashError::FeatureMismatch { importances: 3, features: 2 }));
    }

    #[test]
    fn recorded_names_must_match_in_order() {
        let err = model(vec![0.3, 0.7], Some(vec!["Polyuria", "Age"]))
            .importance_pairs(&dataset())
            .unwrap_err();
        assert!(matches!(err, DashError::FeatureNameMismatch { position: 0, .. }));

        assert!(model(vec![0.3, 0.7], Some(vec!["Age", "Polyuria"]))
            .importance_pairs(&dataset())
            .is_ok());
    }
}
