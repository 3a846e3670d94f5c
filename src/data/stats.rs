use polars::prelude::*;

use super::model::{CellValue, ClinicalDataset};
use crate::error::DashError;

// ---------------------------------------------------------------------------
// Pairwise correlation
// ---------------------------------------------------------------------------

/// Square matrix of Pearson coefficients between the numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Column names, one per row/column of `values`.
    pub labels: Vec<String>,
    /// `values[i][j]` is the coefficient between `labels[i]` and `labels[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn dim(&self) -> usize {
        self.labels.len()
    }
}

/// Pearson correlation across every numeric column, using pairwise complete
/// observations (a row counts for a pair only when both cells are non-null).
///
/// The diagonal is always 1. An off-diagonal entry is NaN when either column
/// is constant over the shared rows or fewer than two rows are shared.
pub fn correlation_matrix(dataset: &ClinicalDataset) -> Result<CorrelationMatrix, DashError> {
    let numeric = dataset.numeric_columns();
    let series: Vec<Float64Chunked> = numeric
        .iter()
        .map(|&idx| dataset.rows.iter().map(|row| row[idx].as_f64()).collect())
        .collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pairwise_pearson(&series[i], &series[j])?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: numeric.iter().map(|&idx| dataset.columns[idx].clone()).collect(),
        values,
    })
}

fn pairwise_pearson(a: &Float64Chunked, b: &Float64Chunked) -> PolarsResult<f64> {
    let complete = &a.is_not_null() & &b.is_not_null();
    let a = a.filter(&complete)?;
    let b = b.filter(&complete)?;
    if a.len() < 2 {
        return Ok(f64::NAN);
    }
    Ok(cov::pearson_corr(&a, &b)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
        .unwrap_or(f64::NAN))
}

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

const KEY: &str = "key";
const COUNT: &str = "count";

/// Count each value of `key_column` among rows where `flag_column` is true.
///
/// Null keys are skipped. Result is ordered by count descending, ties broken
/// by key ascending.
pub fn value_counts_where(
    dataset: &ClinicalDataset,
    key_column: &str,
    flag_column: &str,
) -> Result<Vec<(CellValue, usize)>, DashError> {
    let keys: Vec<&CellValue> = dataset.column(key_column)?.collect();
    let flagged: BooleanChunked = dataset.column(flag_column)?.map(CellValue::is_true).collect();

    let counted = key_series(&keys)
        .filter(&flagged)?
        .drop_nulls()
        .value_counts(false, false, COUNT.into(), false)?;

    let key_col = counted.column(KEY)?.as_materialized_series();
    let counts = counted.column(COUNT)?.as_materialized_series().idx()?;
    let mut ranked = Vec::with_capacity(counted.height());
    for i in 0..counted.height() {
        let count = counts.get(i).unwrap_or_default() as usize;
        ranked.push((cell_from_any(key_col.get(i)?), count));
    }

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(ranked)
}

/// Typed series for a key column: integer, float or boolean when every
/// non-null key agrees, text otherwise.
fn key_series(cells: &[&CellValue]) -> Series {
    let present = || cells.iter().filter(|c| !c.is_null());

    if present().all(|c| matches!(c, CellValue::Integer(_))) {
        let ints: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        Series::new(KEY.into(), ints)
    } else if present().all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_))) {
        let floats: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
        Series::new(KEY.into(), floats)
    } else if present().all(|c| matches!(c, CellValue::Bool(_))) {
        let flags: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(KEY.into(), flags)
    } else {
        let text: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Null => None,
                CellValue::String(s) => Some(s.clone()),
                CellValue::Integer(i) => Some(i.to_string()),
                CellValue::Float(f) => Some(f.to_string()),
                CellValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            })
            .collect();
        Series::new(KEY.into(), text)
    }
}

fn cell_from_any(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::Int64(i) => CellValue::Integer(i),
        AnyValue::Float64(f) => CellValue::Float(f),
        AnyValue::String(s) => CellValue::String(s.to_string()),
        other => CellValue::String(other.to_string()),
    }
}
