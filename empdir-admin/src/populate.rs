//! Bulk import of CSV rows into a table of the live schema
//!
//! Table and column names come from the operator, so they are checked against
//! `sqlite_master` and `PRAGMA table_info` before anything is written. Rows are
//! inserted in one transaction, each under its own savepoint: a row that is
//! missing a requested field or fails to insert is skipped and the import
//! carries on. The transaction is committed once at the end.

use crate::{AdminError, AdminResult};
use empdir_common::db::{introspect::quote_identifier, SchemaIntrospector};
use sqlx::{Connection, SqlitePool};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to import, as entered by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateRequest {
    pub csv_path: PathBuf,
    pub table: String,
    pub fields: Vec<String>,
}

/// Outcome of a completed import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateReport {
    /// Table name as stored in the schema
    pub table: String,
    pub inserted: usize,
    pub skipped: usize,
}

/// Split a space-separated field list, dropping repeats
pub fn parse_fields(input: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for name in input.split_whitespace() {
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

/// Fail unless the CSV file exists
pub fn check_csv_file(path: &Path) -> AdminResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AdminError::FileNotFound(path.to_path_buf()))
    }
}

/// Match `name` case-insensitively against the live tables
///
/// Returns the name as stored in the schema.
pub async fn resolve_table(pool: &SqlitePool, name: &str) -> AdminResult<String> {
    let tables = SchemaIntrospector::list_tables(pool).await?;
    tables
        .into_iter()
        .find(|t| t.eq_ignore_ascii_case(name))
        .ok_or_else(|| AdminError::UnknownTable(name.to_string()))
}

/// Fail unless every field is a column of `table`
///
/// The error carries the actual column set, and the subset an insert must
/// supply, so both can be shown to the operator.
pub async fn check_fields(pool: &SqlitePool, table: &str, fields: &[String]) -> AdminResult<()> {
    if fields.is_empty() {
        return Err(AdminError::NoFields);
    }

    let columns = SchemaIntrospector::table_columns(pool, table).await?;
    if fields.iter().all(|f| columns.iter().any(|c| &c.name == f)) {
        Ok(())
    } else {
        Err(AdminError::InvalidFields {
            table: table.to_string(),
            required: columns
                .iter()
                .filter(|c| c.is_required())
                .map(|c| c.name.clone())
                .collect(),
            expected: columns.into_iter().map(|c| c.name).collect(),
        })
    }
}

/// Validate the request against the live schema, then import
pub async fn populate(pool: &SqlitePool, request: &PopulateRequest) -> AdminResult<PopulateReport> {
    check_csv_file(&request.csv_path)?;
    let table = resolve_table(pool, &request.table).await?;
    check_fields(pool, &table, &request.fields).await?;
    import_rows(pool, &request.csv_path, &table, &request.fields).await
}

/// Insert the CSV rows into an already validated table and column list
///
/// The CSV must have a header row; fields are looked up by header name.
/// A CSV read error aborts the import and nothing is committed.
pub async fn import_rows(
    pool: &SqlitePool,
    csv_path: &Path,
    table: &str,
    fields: &[String],
) -> AdminResult<PopulateReport> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)?;

    let positions: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let sql = insert_statement(table, fields);
    let mut report = PopulateReport {
        table: table.to_string(),
        inserted: 0,
        skipped: 0,
    };

    let mut tx = pool.begin().await?;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Line 1 is the header
        let line = index + 2;

        let values: Option<Vec<String>> = fields
            .iter()
            .map(|f| positions.get(f).and_then(|&i| record.get(i)).map(str::to_string))
            .collect();

        let Some(values) = values else {
            debug!(line, "Skipping row with missing fields");
            report.skipped += 1;
            continue;
        };

        let mut savepoint = Connection::begin(&mut *tx).await?;
        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }

        match query.execute(&mut *savepoint).await {
            Ok(_) => {
                savepoint.commit().await?;
                report.inserted += 1;
            }
            Err(e) => {
                debug!(line, "Skipping row: {}", e);
                savepoint.rollback().await?;
                report.skipped += 1;
            }
        }
    }

    tx.commit().await?;

    info!(
        "Populated '{}' from {}: {} inserted, {} skipped",
        report.table,
        csv_path.display(),
        report.inserted,
        report.skipped
    );
    Ok(report)
}

fn insert_statement(table: &str, fields: &[String]) -> String {
    let columns: Vec<String> = fields.iter().map(|f| quote_identifier(f)).collect();
    let placeholders = vec!["?"; fields.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        assert_eq!(parse_fields("  fname lname\tdept ext  "), ["fname", "lname", "dept", "ext"]);
        assert_eq!(parse_fields("fname fname ext"), ["fname", "ext"]);
        assert!(parse_fields("   ").is_empty());
    }

    #[test]
    fn test_insert_statement_quotes_identifiers() {
        let sql = insert_statement("employee", &["fname".to_string(), "ext".to_string()]);
        assert_eq!(sql, r#"INSERT INTO "employee" ("fname", "ext") VALUES (?, ?)"#);
    }

    #[test]
    fn test_check_csv_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(check_csv_file(&missing), Err(AdminError::FileNotFound(_))));
        // A directory is not a CSV file either
        assert!(check_csv_file(dir.path()).is_err());
    }
}
