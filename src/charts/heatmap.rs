use crate::color::ColorScale;
use crate::data::model::ClinicalDataset;
use crate::data::stats::correlation_matrix;
use crate::error::DashError;

use super::figure::{Axis, Figure, HeatmapTrace, Layout, Trace};

/// Correlation heatmap across every numeric column, Plasma colour scale,
/// drawn image-style (first column top-left, square cells).
pub fn feature_heatmap(dataset: &ClinicalDataset) -> Result<Figure, DashError> {
    let corr = correlation_matrix(dataset)?;
    log::debug!("Correlation matrix over {} numeric columns", corr.dim());

    Ok(Figure {
        data: vec![Trace::Heatmap(HeatmapTrace {
            x: corr.labels.clone(),
            y: corr.labels,
            z: corr.values,
            colorscale: ColorScale::plasma(),
            hovertemplate: "x: %{x}<br>y: %{y}<br>color: %{z}<extra></extra>".to_string(),
        })],
        layout: Layout {
            xaxis: Some(Axis {
                constrain: Some("domain"),
                ..Default::default()
            }),
            yaxis: Some(Axis {
                autorange: Some("reversed"),
                scaleanchor: Some("x"),
                constrain: Some("domain"),
                ..Default::default()
            }),
            ..Default::default()
        },
    })
}
