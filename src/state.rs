use anyhow::{Context, Result};

use crate::charts::heatmap::feature_heatmap;
use crate::charts::importance::feature_importance;
use crate::charts::scatter::age_distribution;
use crate::classifier::{self, ModelArtifact};
use crate::config::DashConfig;
use crate::data::loader;
use crate::data::model::ClinicalDataset;
use crate::page::{self, Graph};
use crate::table::DataTable;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The rendered dashboard page, computed once at startup and read-only
/// afterwards. Figures and table travel inside the page's config block.
#[derive(Debug)]
pub struct Dashboard {
    html: String,
}

impl Dashboard {
    /// Load the model and dataset named by `config` and render the page.
    pub fn build(config: &DashConfig) -> Result<Self> {
        let model = classifier::load_model(&config.model_path)?;
        let dataset = loader::load_file(&config.data_path)?;
        Self::from_parts(&dataset, &model, config)
    }

    pub fn from_parts(
        dataset: &ClinicalDataset,
        model: &ModelArtifact,
        config: &DashConfig,
    ) -> Result<Self> {
        if dataset.is_empty() {
            log::warn!("Dataset has no records; charts will be empty");
        }
        let heatmap = feature_heatmap(dataset).context("building correlation heatmap")?;
        let importance =
            feature_importance(dataset, model).context("building feature importance chart")?;
        let age_scatter =
            age_distribution(dataset, &config.scatter).context("building age distribution chart")?;
        let table = DataTable::from_dataset(dataset, config.page_size);

        let html = page::compose(
            page::LAYOUT,
            &[
                Graph {
                    id: "feature-heatmap",
                    heading: "Feature Heatmap",
                    figure: &heatmap,
                },
                Graph {
                    id: "feature-importance",
                    heading: "Machine Learning Feature Importance",
                    figure: &importance,
                },
                Graph {
                    id: "age-distribution",
                    heading: "Age Distribution",
                    figure: &age_scatter,
                },
            ],
            &table,
        )?;

        log::info!(
            "Dashboard ready: {} records across {} page(s), {} bytes of HTML",
            table.data.len(),
            table.page_count(),
            html.len()
        );

        Ok(Self { html })
    }

    /// The composed page.
    pub fn html(&self) -> &str {
        &self.html
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::Value;

    use super::*;

    fn sample_config() -> DashConfig {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        DashConfig {
            data_path: root.join("data/diabetes_clean.csv"),
            model_path: root.join("data/rf_model.json"),
            ..Default::default()
        }
    }

    /// The JSON the browser receives in the `_dash-config` script element.
    fn client_config(html: &str) -> Value {
        let open = "<script id=\"_dash-config\" type=\"application/json\">";
        let start = html.find(open).expect("config block") + open.len();
        let end = start + html[start..].find("</script>").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn builds_from_shipped_sample() {
        let config = sample_config();
        let dataset = loader::load_file(&config.data_path).unwrap();
        let dashboard = Dashboard::build(&config).unwrap();
        let client = client_config(dashboard.html());
        let figures = &client["figures"];

        let bars = &figures["feature-importance"]["data"][0];
        assert_eq!(bars["type"], "bar");
        assert_eq!(bars["x"].as_array().unwrap().len(), dataset.columns.len() - 1);

        let heat = &figures["feature-heatmap"]["data"][0];
        assert_eq!(heat["type"], "heatmap");
        let z = heat["z"].as_array().unwrap();
        assert_eq!(z.len(), dataset.numeric_columns().len());
        for (i, row) in z.iter().enumerate() {
            let row = row.as_array().unwrap();
            assert_eq!(row.len(), z.len());
            assert_eq!(row[i], 1.0);
        }

        let series = figures["age-distribution"]["data"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        for (trace, column) in series.iter().zip(["class", "Polyuria"]) {
            assert_eq!(trace["type"], "scatter");
            let total: u64 = trace["y"].as_array().unwrap().iter().filter_map(Value::as_u64).sum();
            let positives = dataset.column(column).unwrap().filter(|v| v.is_true()).count();
            assert_eq!(total as usize, positives);
        }

        let table = &client["table"];
        assert_eq!(table["data"].as_array().unwrap().len(), dataset.len());
        assert_eq!(table["columns"].as_array().unwrap().len(), dataset.columns.len());
        assert!(dashboard.html().contains("Dataset Browser"));
    }

    #[test]
    fn missing_model_fails_build() {
        let config = DashConfig {
            model_path: PathBuf::from("/nonexistent/rf_model.json"),
            ..sample_config()
        };
        assert!(Dashboard::build(&config).is_err());
    }
}
