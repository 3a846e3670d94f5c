use crate::classifier::ModelArtifact;
use crate::color;
use crate::data::model::ClinicalDataset;
use crate::error::DashError;

use super::figure::{Axis, BarTrace, Figure, Layout, Marker, Trace};

/// Bar colour for the importance chart.
pub const BAR_COLOR: &str = "brown";

/// Feature importances as percentages, largest first, one bar per feature
/// column. The legend is hidden since there is a single series.
pub fn feature_importance(dataset: &ClinicalDataset, model: &ModelArtifact) -> Result<Figure, DashError> {
    let mut ranked = model.importance_pairs(dataset)?;
    for (_, score) in &mut ranked {
        *score *= 100.0;
    }
    // stable, so equal scores keep column order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    if let Some((top, score)) = ranked.first() {
        log::debug!("Most important feature: {top} ({score:.2}%)");
    }

    let (x, y): (Vec<String>, Vec<f64>) = ranked.into_iter().unzip();
    Ok(Figure {
        data: vec![Trace::Bar(BarTrace {
            x,
            y,
            orientation: "v",
            marker: Marker {
                color: color::resolve(BAR_COLOR)?,
                size: None,
            },
            hovertemplate: "Features=%{x}<br>Importance=%{y}<extra></extra>".to_string(),
        })],
        layout: Layout {
            xaxis: Some(Axis::titled("Features")),
            yaxis: Some(Axis::titled("Importance")),
            showlegend: Some(false),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn dataset() -> ClinicalDataset {
        ClinicalDataset::from_rows(
            vec!["Age".into(), "Gender".into(), "Polyuria".into(), "class".into()],
            vec![vec![
                CellValue::Integer(40),
                CellValue::Integer(1),
                CellValue::Bool(true),
                CellValue::Bool(true),
            ]],
        )
        .unwrap()
    }

    fn model(importances: Vec<f64>) -> ModelArtifact {
        ModelArtifact {
            model_type: "random_forest".into(),
            n_estimators: None,
            feature_names: None,
            feature_importances: importances,
        }
    }

    #[test]
    fn bars_are_sorted_percentages() {
        let ds = dataset();
        let fig = feature_importance(&ds, &model(vec![0.2, 0.05, 0.75])).unwrap();
        let Trace::Bar(bar) = &fig.data[0] else {
            panic!("expected a bar trace");
        };
        assert_eq!(bar.x, vec!["Polyuria", "Age", "Gender"]);
        assert_eq!(bar.x.len(), ds.columns.len() - 1);
        assert!((bar.y[0] - 75.0).abs() < 1e-9);
        assert!((bar.y[1] - 20.0).abs() < 1e-9);
        assert!((bar.y[2] - 5.0).abs() < 1e-9);
        assert_eq!(bar.marker.color, "#a52a2a");
        assert_eq!(fig.layout.showlegend, Some(false));
    }

    #[test]
    fn ties_keep_column_order() {
        let fig = feature_importance(&dataset(), &model(vec![0.25, 0.5, 0.25])).unwrap();
        let Trace::Bar(bar) = &fig.data[0] else {
            panic!("expected a bar trace");
        };
        assert_eq!(bar.x, vec!["Gender", "Age", "Polyuria"]);
    }

    #[test]
    fn misaligned_model_is_rejected() {
        assert!(matches!(
            feature_importance(&dataset(), &model(vec![0.5, 0.5])),
            Err(DashError::FeatureMismatch { importances: 2, features: 3 })
        ));
    }
}
