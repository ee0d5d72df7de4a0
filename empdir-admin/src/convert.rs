//! JSON to CSV conversion
//!
//! Input is a JSON array of objects or a single object. The header row is the
//! key list of the first object, in document order. Every row is checked
//! before the output file is created, so a failed conversion leaves no file.

use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_INPUT: &str = "employees.json";
pub const DEFAULT_OUTPUT: &str = "employees.csv";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error: JSON file not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Error: could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error: Invalid JSON format in '{}'", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error: JSON file is empty.")]
    Empty,

    #[error("Error: JSON data should be a list of objects or an object.")]
    NotObjects,

    #[error("An error occurred while writing to the CSV file: {0}")]
    Write(String),
}

impl From<csv::Error> for ConvertError {
    fn from(e: csv::Error) -> Self {
        ConvertError::Write(e.to_string())
    }
}

impl From<io::Error> for ConvertError {
    fn from(e: io::Error) -> Self {
        ConvertError::Write(e.to_string())
    }
}

/// Convert `json_path` into `csv_path`, returning the number of data rows
pub fn convert_json_to_csv(json_path: &Path, csv_path: &Path) -> Result<usize, ConvertError> {
    let text = std::fs::read_to_string(json_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::NotFound(json_path.to_path_buf()),
        _ => ConvertError::Read {
            path: json_path.to_path_buf(),
            source: e,
        },
    })?;

    let data: Value = serde_json::from_str(&text).map_err(|e| ConvertError::InvalidJson {
        path: json_path.to_path_buf(),
        source: e,
    })?;

    let rows = to_rows(data)?;
    let written = write_csv(csv_path, &rows)?;
    info!("Wrote {} rows to {}", written, csv_path.display());
    Ok(written)
}

/// Header plus one cell list per object
#[derive(Debug, PartialEq, Eq)]
struct Rows {
    header: Vec<String>,
    records: Vec<Vec<String>>,
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn to_rows(data: Value) -> Result<Rows, ConvertError> {
    if is_empty(&data) {
        return Err(ConvertError::Empty);
    }

    let items = match data {
        Value::Object(object) => vec![Value::Object(object)],
        Value::Array(items) => items,
        _ => return Err(ConvertError::NotObjects),
    };

    let header: Vec<String> = match items.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return Err(ConvertError::Write("row 1 is not an object".to_string())),
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(object) => record(&header, object, i + 1),
            _ => Err(ConvertError::Write(format!("row {} is not an object", i + 1))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rows { header, records })
}

/// Cells of one object in header order; missing keys give empty cells
fn record(header: &[String], object: &Map<String, Value>, row: usize) -> Result<Vec<String>, ConvertError> {
    if let Some(extra) = object.keys().find(|k| !header.contains(k)) {
        return Err(ConvertError::Write(format!(
            "row {} contains fields not in the header: '{}'",
            row, extra
        )));
    }

    Ok(header
        .iter()
        .map(|key| object.get(key).map(cell).unwrap_or_default())
        .collect())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_csv(path: &Path, rows: &Rows) -> Result<usize, ConvertError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&rows.header)?;
    for record in &rows.records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(rows.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_object_is_one_row() {
        let rows = to_rows(json!({"fname": "Gil", "ext": "1234"})).unwrap();
        assert_eq!(rows.header, ["fname", "ext"]);
        assert_eq!(rows.records, [["Gil", "1234"]]);
    }

    #[test]
    fn test_header_keeps_document_order() {
        let data: Value = serde_json::from_str(r#"[{"lname": "Name", "fname": "Maya", "id": 1}]"#).unwrap();
        let rows = to_rows(data).unwrap();
        assert_eq!(rows.header, ["lname", "fname", "id"]);
    }

    #[test]
    fn test_missing_keys_are_empty_cells() {
        let rows = to_rows(json!([
            {"fname": "Gil", "lname": "Flangeworm"},
            {"fname": "Wil"}
        ]))
        .unwrap();
        assert_eq!(rows.records[1], ["Wil", ""]);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!("a,b")), "a,b");
        assert_eq!(cell(&json!(42)), "42");
        assert_eq!(cell(&json!(true)), "true");
        assert_eq!(cell(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_empty_documents() {
        for data in [json!([]), json!({}), json!(null), json!(""), json!(0)] {
            assert!(matches!(to_rows(data), Err(ConvertError::Empty)));
        }
    }

    #[test]
    fn test_scalar_top_level_rejected() {
        assert!(matches!(to_rows(json!("text")), Err(ConvertError::NotObjects)));
        assert!(matches!(to_rows(json!(7)), Err(ConvertError::NotObjects)));
    }

    #[test]
    fn test_extra_key_is_write_error() {
        let err = to_rows(json!([{"a": 1}, {"a": 2, "b": 3}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred while writing to the CSV file: row 2 contains fields not in the header: 'b'"
        );
    }

    #[test]
    fn test_non_object_item_is_write_error() {
        assert!(matches!(to_rows(json!([{"a": 1}, 5])), Err(ConvertError::Write(_))));
        assert!(matches!(to_rows(json!([1, 2])), Err(ConvertError::Write(_))));
    }
}
