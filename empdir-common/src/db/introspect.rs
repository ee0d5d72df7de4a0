//! Schema introspection
//!
//! Reads the live schema from `sqlite_master` and `PRAGMA table_info`. Used by
//! the admin tool to check user-supplied table and column names before import.

use crate::Result;
use sqlx::{Row, SqlitePool};

/// Actual column from database introspection (PRAGMA table_info result)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualColumn {
    /// Column ID (position in table)
    pub cid: i64,
    /// Column name
    pub name: String,
    /// NOT NULL constraint
    pub not_null: bool,
    /// DEFAULT value
    pub default_value: Option<String>,
    /// PRIMARY KEY flag
    pub pk: bool,
}

impl ActualColumn {
    /// An insert must supply this column: NOT NULL with no default and not the rowid key
    pub fn is_required(&self) -> bool {
        self.not_null && self.default_value.is_none() && !self.pk
    }
}

pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// User tables in alphabetical order, excluding SQLite internal tables
    pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
        let tables = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tables)
    }

    /// Check if table exists
    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = ?
            )
            "#,
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Columns of a table in declaration order (empty if the table is missing)
    pub async fn table_columns(pool: &SqlitePool, table_name: &str) -> Result<Vec<ActualColumn>> {
        let query = format!("PRAGMA table_info({})", quote_identifier(table_name));
        let rows = sqlx::query(&query).fetch_all(pool).await?;

        let mut columns: Vec<ActualColumn> = rows
            .iter()
            .map(|row| ActualColumn {
                cid: row.get("cid"),
                name: row.get("name"),
                not_null: row.get::<i64, _>("notnull") != 0,
                default_value: row.get("dflt_value"),
                pk: row.get::<i64, _>("pk") != 0,
            })
            .collect();

        columns.sort_by_key(|c| c.cid);
        Ok(columns)
    }

    /// Column names of a table in declaration order
    pub async fn column_names(pool: &SqlitePool, table_name: &str) -> Result<Vec<String>> {
        Ok(Self::table_columns(pool, table_name)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }
}

/// Quote an identifier for interpolation into SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
