use thiserror::Error;

/// Failures raised while assembling the dashboard.
///
/// I/O and parse failures from the loaders travel as `anyhow` errors with
/// context attached; this enum covers the checks the dashboard itself makes.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("dataset needs a label column and at least one feature, found {0} column(s)")]
    TooFewColumns(usize),

    #[error("row {row}: expected {expected} cells, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("model has {importances} importance scores but dataset has {features} feature columns")]
    FeatureMismatch { importances: usize, features: usize },

    #[error("model feature '{model}' does not match dataset column '{dataset}' at position {position}")]
    FeatureNameMismatch {
        position: usize,
        model: String,
        dataset: String,
    },

    #[error("invalid colour '{0}'")]
    InvalidColor(String),

    #[error("layout template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("statistics: {0}")]
    Stats(#[from] polars::prelude::PolarsError),

    #[error("serializing page config: {0}")]
    PageConfig(#[from] serde_json::Error),
}
