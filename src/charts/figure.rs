use serde::Serialize;

use crate::color::ColorScale;
use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Plotly figure description
// ---------------------------------------------------------------------------

/// A chart as plotly.js consumes it: `Plotly.newPlot(div, fig.data, fig.layout)`.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Heatmap(HeatmapTrace),
    Bar(BarTrace),
    Scatter(ScatterTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    pub x: Vec<String>,
    pub y: Vec<String>,
    /// Row-major values; NaN serializes as `null` and renders as a gap.
    pub z: Vec<Vec<f64>>,
    pub colorscale: ColorScale,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub orientation: &'static str,
    pub marker: Marker,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Vec<CellValue>,
    pub y: Vec<usize>,
    pub mode: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// `"reversed"` flips the axis, as image plots do for the y axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<&'static str>,
    /// Locks this axis' scale to another axis (`"x"`) for square cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaleanchor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constrain: Option<&'static str>,
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: Some(Title::new(text)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}
