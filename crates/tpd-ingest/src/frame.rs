//! View rows to DataFrame conversion.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde_json::Value;

use crate::view::ViewRow;

/// Build a string-typed DataFrame from view rows with a fixed column order.
///
/// Every requested column is present in the output even when no row carries
/// it; cells missing from a row become nulls. Non-string JSON scalars are
/// stringified, so downstream stages see one uniform dtype per column.
pub fn rows_to_frame(rows: &[ViewRow], columns: &[&str]) -> Result<DataFrame> {
    let mut built: Vec<Column> = Vec::with_capacity(columns.len());
    for name in columns {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| row.get(*name).and_then(cell_to_string))
            .collect();
        built.push(Series::new((*name).into(), values).into_column());
    }
    DataFrame::new(built).context("assemble view frame")
}

fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> ViewRow {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn columns_keep_requested_order() {
        let rows = vec![row(&[("b", json!("2")), ("a", json!("1"))])];
        let frame = rows_to_frame(&rows, &["a", "b"]).unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn missing_cells_become_null() {
        let rows = vec![
            row(&[("a", json!("1"))]),
            row(&[("a", json!("2")), ("b", json!("x"))]),
        ];
        let frame = rows_to_frame(&rows, &["a", "b"]).unwrap();
        assert_eq!(frame.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn scalars_are_stringified() {
        let rows = vec![row(&[("n", json!(7)), ("f", json!(true))])];
        let frame = rows_to_frame(&rows, &["n", "f"]).unwrap();
        let n = frame.column("n").unwrap().str().unwrap().get(0);
        let f = frame.column("f").unwrap().str().unwrap().get(0);
        assert_eq!(n, Some("7"));
        assert_eq!(f, Some("true"));
    }

    #[test]
    fn empty_row_set_builds_empty_columns() {
        let frame = rows_to_frame(&[], &["a", "b"]).unwrap();
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), 2);
    }
}
