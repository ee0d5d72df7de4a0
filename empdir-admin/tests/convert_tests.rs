//! Integration tests for the JSON to CSV converter

use empdir_admin::convert::{convert_json_to_csv, ConvertError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_json(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("employees.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_converts_list_of_objects() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(
        &dir,
        r#"[
            {"fname": "Gil", "lname": "Flangeworm", "dept": "HR", "ext": "1234"},
            {"fname": "Maya", "lname": "Name, Jr.", "dept": "IT", "ext": "3234"}
        ]"#,
    );
    let output = dir.path().join("employees.csv");

    let rows = convert_json_to_csv(&input, &output).unwrap();

    assert_eq!(rows, 2);
    assert_eq!(
        read(&output),
        "fname,lname,dept,ext\nGil,Flangeworm,HR,1234\nMaya,\"Name, Jr.\",IT,3234\n"
    );
}

#[test]
fn test_converts_single_object() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(&dir, r#"{"id": 7, "active": true, "note": null}"#);
    let output = dir.path().join("out.csv");

    assert_eq!(convert_json_to_csv(&input, &output).unwrap(), 1);
    assert_eq!(read(&output), "id,active,note\n7,true,\n");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.json");
    let output = dir.path().join("out.csv");

    let err = convert_json_to_csv(&input, &output).unwrap_err();

    assert!(matches!(err, ConvertError::NotFound(_)));
    assert_eq!(
        err.to_string(),
        format!("Error: JSON file not found at '{}'", input.display())
    );
    assert!(!output.exists());
}

#[test]
fn test_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(&dir, "[{\"fname\": ");
    let output = dir.path().join("out.csv");

    let err = convert_json_to_csv(&input, &output).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Error: Invalid JSON format in '{}'", input.display())
    );
    assert!(!output.exists());
}

#[test]
fn test_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(&dir, "[]");
    let output = dir.path().join("out.csv");

    let err = convert_json_to_csv(&input, &output).unwrap_err();

    assert_eq!(err.to_string(), "Error: JSON file is empty.");
    assert!(!output.exists());
}

#[test]
fn test_scalar_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(&dir, "\"employees\"");
    let output = dir.path().join("out.csv");

    let err = convert_json_to_csv(&input, &output).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error: JSON data should be a list of objects or an object."
    );
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(&dir, r#"[{"a": 1}]"#);
    let output = dir.path().join("no_such_dir").join("out.csv");

    let err = convert_json_to_csv(&input, &output).unwrap_err();

    assert!(matches!(err, ConvertError::Write(_)));
    assert!(err
        .to_string()
        .starts_with("An error occurred while writing to the CSV file: "));
}
