use serde::Deserialize;

use crate::color;
use crate::data::model::ClinicalDataset;
use crate::data::stats::value_counts_where;
use crate::error::DashError;

use super::figure::{Axis, Figure, Layout, Legend, Marker, ScatterTrace, Title, Trace};

const MARKER_SIZE: u32 = 12;

/// One marker series: patients of each age among rows where `column` is true.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesSpec {
    pub column: String,
    pub name: String,
    pub color: String,
}

/// Which columns the age-distribution chart plots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScatterSpec {
    pub age_column: String,
    pub series: Vec<SeriesSpec>,
}

impl Default for ScatterSpec {
    fn default() -> Self {
        Self {
            age_column: "Age".to_string(),
            series: vec![
                SeriesSpec {
                    column: "class".to_string(),
                    name: "Diabetes".to_string(),
                    color: "orange".to_string(),
                },
                SeriesSpec {
                    column: "Polyuria".to_string(),
                    name: "Polyuria".to_string(),
                    color: "MediumPurple".to_string(),
                },
            ],
        }
    }
}

/// Age distribution of the positive rows of each configured boolean column,
/// one labelled marker series per column on shared axes.
pub fn age_distribution(dataset: &ClinicalDataset, spec: &ScatterSpec) -> Result<Figure, DashError> {
    let mut data = Vec::with_capacity(spec.series.len());
    for series in &spec.series {
        let counts = value_counts_where(dataset, &spec.age_column, &series.column)?;
        log::debug!(
            "{}: {} distinct ages, {} patients",
            series.name,
            counts.len(),
            counts.iter().map(|(_, c)| c).sum::<usize>()
        );

        let (x, y) = counts.into_iter().unzip();
        data.push(Trace::Scatter(ScatterTrace {
            name: series.name.clone(),
            x,
            y,
            mode: "markers",
            marker: Marker {
                color: color::resolve(&series.color)?,
                size: Some(MARKER_SIZE),
            },
        }));
    }

    Ok(Figure {
        data,
        layout: Layout {
            xaxis: Some(Axis::titled("Age")),
            yaxis: Some(Axis::titled("Number of Patients")),
            legend: Some(Legend {
                title: Title::new("Condition"),
            }),
            ..Default::default()
        },
    })
}
