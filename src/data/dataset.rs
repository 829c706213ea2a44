//! Dataset Module
//! Read-only table produced by the loader, with its numeric column view.

use polars::prelude::*;

/// A decoded upload. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    numeric_columns: Vec<String>,
    source_name: Option<String>,
}

/// First rows of a dataset, rendered as display strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub(crate) fn new(df: DataFrame, source_name: Option<String>) -> Self {
        let numeric_columns = Self::detect_numeric_columns(&df);
        Self {
            df,
            numeric_columns,
            source_name,
        }
    }

    fn detect_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// All column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Names of the integer and floating point columns, in file order.
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn has_numeric_columns(&self) -> bool {
        !self.numeric_columns.is_empty()
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Values of a numeric column as f64, nulls kept in place so rows stay aligned.
    /// Returns `None` if the column is not numeric.
    pub fn numeric_cells(&self, column: &str) -> Option<Vec<Option<f64>>> {
        if !self.is_numeric(column) {
            return None;
        }
        let series = self.df.column(column).ok()?.cast(&DataType::Float64).ok()?;
        let values = series
            .f64()
            .ok()?
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect();
        Some(values)
    }

    /// Non-null, finite values of a numeric column.
    pub fn numeric_values(&self, column: &str) -> Option<Vec<f64>> {
        self.numeric_cells(column)
            .map(|cells| cells.into_iter().flatten().collect())
    }

    /// Build a preview of the first `rows` rows.
    pub fn preview(&self, rows: usize) -> DatasetPreview {
        let head = self.df.head(Some(rows));
        let columns = head.get_columns();

        let rows = (0..head.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .map(|val| val.to_string().trim_matches('"').to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        DatasetPreview {
            headers: self.column_names(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::data::DatasetLoader;

    #[test]
    fn null_cells_stay_aligned() {
        let dataset = DatasetLoader::default()
            .load(b"a,b\n1,\n2,3\n4,5\n", None)
            .unwrap();

        assert_eq!(
            dataset.numeric_cells("b").unwrap(),
            vec![None, Some(3.0), Some(5.0)]
        );
        assert_eq!(dataset.numeric_values("b").unwrap(), vec![3.0, 5.0]);
        assert_eq!(dataset.numeric_values("a").unwrap(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn non_numeric_columns_have_no_values() {
        let dataset = DatasetLoader::default()
            .load(b"name,age\nann,3\nben,4\n", None)
            .unwrap();

        assert!(dataset.numeric_values("name").is_none());
        assert!(dataset.numeric_values("nope").is_none());
    }

    #[test]
    fn preview_takes_head_rows() {
        let dataset = DatasetLoader::default()
            .load(b"name,age\nann,3\nben,4\ncat,5\n", None)
            .unwrap();
        let preview = dataset.preview(2);

        assert_eq!(preview.headers, vec!["name", "age"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0], vec!["ann", "3"]);
        assert_eq!(preview.rows[1], vec!["ben", "4"]);
    }
}
