use serde::Serialize;

use crate::error::DashError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the clinical table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a `BTreeMap` key for value counts, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Booleans count as 0/1, like a Pandas bool column
    /// inside `DataFrame.corr()`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Equality with `True` as Python compares it: `1` and `1.0` match too.
    pub fn is_true(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Integer(i) => *i == 1,
            CellValue::Float(v) => *v == 1.0,
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ClinicalDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Patient records held in memory for the lifetime of the process.
///
/// The last column is the outcome label, every prior column is a feature.
#[derive(Debug, Clone)]
pub struct ClinicalDataset {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// One entry per record, each aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

impl ClinicalDataset {
    /// Build the dataset from parsed rows, checking its shape.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, DashError> {
        if columns.len() < 2 {
            return Err(DashError::TooFewColumns(columns.len()));
        }
        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DashError::RaggedRow {
                    row: row_no,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(ClinicalDataset { columns, rows })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DashError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DashError::MissingColumn(name.to_string()))
    }

    /// All cells of one column, in record order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &CellValue> + '_, DashError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Name of the outcome column.
    pub fn label_column(&self) -> &str {
        // from_rows guarantees at least two columns
        &self.columns[self.columns.len() - 1]
    }

    /// Every column except the label, in source order.
    pub fn feature_columns(&self) -> &[String] {
        &self.columns[..self.columns.len() - 1]
    }

    /// Indices of columns whose non-null cells are all numeric or boolean.
    /// Columns without a single non-null cell are left out.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&idx| {
                let mut seen = false;
                for row in &self.rows {
                    let cell = &row[idx];
                    if cell.is_null() {
                        continue;
                    }
                    if cell.as_f64().is_none() {
                        return false;
                    }
                    seen = true;
                }
                seen
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClinicalDataset {
        ClinicalDataset::from_rows(
            vec!["Age".into(), "Gender".into(), "Polyuria".into(), "class".into()],
            vec![
                vec![
                    CellValue::Integer(40),
                    CellValue::String("Male".into()),
                    CellValue::Bool(false),
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::Integer(58),
                    CellValue::String("Female".into()),
                    CellValue::Bool(true),
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::Null,
                    CellValue::String("Male".into()),
                    CellValue::Bool(true),
                    CellValue::Bool(false),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn label_is_last_column() {
        let ds = sample();
        assert_eq!(ds.label_column(), "class");
        assert_eq!(ds.feature_columns(), &["Age", "Gender", "Polyuria"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn numeric_columns_skip_strings_and_nulls() {
        let ds = sample();
        assert_eq!(ds.numeric_columns(), vec![0, 2, 3]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = ClinicalDataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Integer(1)]],
        )
        .unwrap_err();
        assert!(matches!(err, DashError::RaggedRow { row: 0, expected: 2, found: 1 }));
    }

    #[test]
    fn single_column_is_rejected() {
        let err = ClinicalDataset::from_rows(vec!["class".into()], vec![]).unwrap_err();
        assert!(matches!(err, DashError::TooFewColumns(1)));
    }

    #[test]
    fn truthiness_matches_python_equality() {
        assert!(CellValue::Bool(true).is_true());
        assert!(CellValue::Integer(1).is_true());
        assert!(CellValue::Float(1.0).is_true());
        assert!(!CellValue::Integer(2).is_true());
        assert!(!CellValue::String("True".into()).is_true());
        assert!(!CellValue::Null.is_true());
    }

    #[test]
    fn cells_serialize_as_plain_json() {
        let row = vec![
            CellValue::Integer(3),
            CellValue::Float(0.5),
            CellValue::Bool(true),
            CellValue::String("x".into()),
            CellValue::Null,
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[3,0.5,true,"x",null]"#);
    }

    #[test]
    fn missing_column_is_reported() {
        let ds = sample();
        assert!(matches!(ds.column("Weight"), Err(DashError::MissingColumn(c)) if c == "Weight"));
    }
}
