use serde::Serialize;

use crate::data::model::{CellValue, ClinicalDataset};

pub const TABLE_ID: &str = "database-table";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Header entry of the data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub id: String,
}

/// Horizontal overflow so wide clinical tables scroll instead of wrapping.
#[derive(Debug, Clone, Serialize)]
pub struct TableStyle {
    #[serde(rename = "overflowX")]
    pub overflow_x: &'static str,
}

/// Description of the sortable, paginated grid. Paging and sorting happen in
/// the browser; this only carries the data and the settings.
#[derive(Debug, Clone, Serialize)]
pub struct DataTable {
    pub id: &'static str,
    pub columns: Vec<ColumnDescriptor>,
    /// One entry per record, cells aligned with `columns`.
    pub data: Vec<Vec<CellValue>>,
    pub page_size: usize,
    pub sort_action: &'static str,
    pub sort_mode: &'static str,
    pub style_table: TableStyle,
}

impl DataTable {
    pub fn from_dataset(dataset: &ClinicalDataset, page_size: usize) -> Self {
        DataTable {
            id: TABLE_ID,
            columns: dataset
                .columns
                .iter()
                .map(|c| ColumnDescriptor {
                    name: c.clone(),
                    id: c.clone(),
                })
                .collect(),
            data: dataset.rows.clone(),
            page_size: page_size.max(1),
            sort_action: "native",
            sort_mode: "native",
            style_table: TableStyle { overflow_x: "scroll" },
        }
    }

    /// Number of pages the browser will show.
    pub fn page_count(&self) -> usize {
        self.data.len().div_ceil(self.page_size).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> ClinicalDataset {
        ClinicalDataset::from_rows(
            vec!["Age".into(), "Polyuria".into(), "class".into()],
            (0..n)
                .map(|i| {
                    vec![
                        CellValue::Integer(30 + i as i64),
                        CellValue::Bool(i % 2 == 0),
                        CellValue::Bool(i % 3 == 0),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn one_row_per_record_and_column_per_column() {
        let ds = dataset(23);
        let table = DataTable::from_dataset(&ds, DEFAULT_PAGE_SIZE);
        assert_eq!(table.data.len(), ds.len());
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Age", "Polyuria", "class"]);
        assert!(table.columns.iter().all(|c| c.name == c.id));
        assert_eq!(table.page_count(), 3);
    }

    #[test]
    fn serializes_dash_table_settings() {
        let table = DataTable::from_dataset(&dataset(1), 10);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["id"], "database-table");
        assert_eq!(json["page_size"], 10);
        assert_eq!(json["sort_action"], "native");
        assert_eq!(json["style_table"]["overflowX"], "scroll");
        assert_eq!(json["columns"][0], serde_json::json!({"name": "Age", "id": "Age"}));
        assert_eq!(json["data"][0], serde_json::json!([30, true, true]));
    }

    #[test]
    fn empty_dataset_still_has_one_page() {
        let table = DataTable::from_dataset(&dataset(0), 0);
        assert_eq!(table.page_size, 1);
        assert_eq!(table.page_count(), 1);
    }
}
