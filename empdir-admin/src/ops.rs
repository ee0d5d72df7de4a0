//! Admin operations and their result messages
//!
//! Each operation returns an [`Outcome`]: a titled message that the menu shows
//! in a panel and the subcommands print. Failures are reported, never raised,
//! so the menu keeps running after a failed operation.

use crate::populate::{self, PopulateReport, PopulateRequest};
use crate::AdminError;
use empdir_common::db;
use sqlx::SqlitePool;
use tracing::error;

pub const CREATE_TITLE: &str = "Create Database";
pub const DROP_TITLE: &str = "Drop Database Tables";
pub const POPULATE_TITLE: &str = "Populate Database";
pub const RESET_TITLE: &str = "Reset Database";
pub const EXIT_TITLE: &str = "Exit Application";

/// How an outcome is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Info,
    Failure,
}

/// Titled result message of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub title: &'static str,
    pub tone: Tone,
    pub lines: Vec<String>,
}

impl Outcome {
    pub fn new(title: &'static str, tone: Tone, line: impl Into<String>) -> Self {
        Self {
            title,
            tone,
            lines: vec![line.into()],
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.tone == Tone::Failure
    }

    /// Failure outcome for an operation that could not complete
    pub fn failure(title: &'static str, err: &AdminError) -> Self {
        match err {
            AdminError::InvalidFields {
                table,
                expected,
                required,
            } => {
                let outcome = Outcome::new(
                    title,
                    Tone::Failure,
                    format!("Invalid field names for table '{}'.", table),
                )
                .with_line(format!("Expected: {}", expected.join(" ")));
                if required.is_empty() {
                    outcome
                } else {
                    outcome.with_line(format!("Required: {}", required.join(" ")))
                }
            }
            AdminError::Database(_) | AdminError::Common(_) => {
                Outcome::new(title, Tone::Failure, "Database error:").with_line(err.to_string())
            }
            other => Outcome::new(title, Tone::Failure, other.to_string()),
        }
    }
}

pub async fn create_database(pool: &SqlitePool) -> Outcome {
    match db::create_schema(pool).await {
        Ok(()) => Outcome::new(CREATE_TITLE, Tone::Success, "✅ Database created successfully."),
        Err(e) => {
            error!("Create failed: {}", e);
            Outcome::failure(CREATE_TITLE, &e.into())
        }
    }
}

pub async fn drop_database(pool: &SqlitePool) -> Outcome {
    match db::drop_schema(pool).await {
        Ok(()) => Outcome::new(DROP_TITLE, Tone::Warning, "⚠️  Database tables dropped."),
        Err(e) => {
            error!("Drop failed: {}", e);
            Outcome::failure(DROP_TITLE, &e.into())
        }
    }
}

pub async fn reset_database(pool: &SqlitePool) -> Outcome {
    match db::reset_schema(pool).await {
        Ok(()) => Outcome::new(RESET_TITLE, Tone::Info, "🔄 Database reset successfully."),
        Err(e) => {
            error!("Reset failed: {}", e);
            Outcome::failure(RESET_TITLE, &e.into())
        }
    }
}

/// Summary panel for a finished import
pub fn populated(report: &PopulateReport) -> Outcome {
    Outcome::new(
        POPULATE_TITLE,
        Tone::Success,
        format!("✅ Table '{}' populated successfully.", report.table),
    )
    .with_line(format!(
        "{} rows inserted, {} rows skipped.",
        report.inserted, report.skipped
    ))
}

pub async fn populate_database(pool: &SqlitePool, request: &PopulateRequest) -> Outcome {
    match populate::populate(pool, request).await {
        Ok(report) => populated(&report),
        Err(e) => {
            error!("Populate failed: {}", e);
            Outcome::failure(POPULATE_TITLE, &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fields_outcome_lists_columns() {
        let err = AdminError::InvalidFields {
            table: "employee".to_string(),
            expected: vec!["id".to_string(), "fname".to_string()],
            required: vec!["fname".to_string()],
        };
        let outcome = Outcome::failure(POPULATE_TITLE, &err);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.lines,
            [
                "Invalid field names for table 'employee'.",
                "Expected: id fname",
                "Required: fname"
            ]
        );
    }

    #[test]
    fn test_invalid_fields_outcome_without_required_columns() {
        let err = AdminError::InvalidFields {
            table: "tag".to_string(),
            expected: vec!["id".to_string(), "label".to_string()],
            required: Vec::new(),
        };
        assert_eq!(Outcome::failure(POPULATE_TITLE, &err).lines.len(), 2);
    }

    #[test]
    fn test_populated_summary() {
        let outcome = populated(&PopulateReport {
            table: "employee".to_string(),
            inserted: 3,
            skipped: 1,
        });
        assert_eq!(outcome.title, POPULATE_TITLE);
        assert_eq!(outcome.lines[0], "✅ Table 'employee' populated successfully.");
        assert_eq!(outcome.lines[1], "3 rows inserted, 1 rows skipped.");
    }

    #[tokio::test]
    async fn test_reset_empties_table() {
        let dir = tempfile::tempdir().unwrap();
        let pool = db::init_database(&dir.path().join("app.db")).await.unwrap();
        sqlx::query(
            "INSERT INTO employee (fname, lname, dept, ext, email) VALUES ('A', 'B', 'HR', '1234', 'a_b@abnor.com')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let outcome = reset_database(&pool).await;
        assert_eq!(outcome.tone, Tone::Info);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_drop_then_create() {
        let dir = tempfile::tempdir().unwrap();
        let pool = db::init_database(&dir.path().join("app.db")).await.unwrap();

        assert_eq!(drop_database(&pool).await.tone, Tone::Warning);
        assert!(!db::SchemaIntrospector::table_exists(&pool, "employee").await.unwrap());

        assert_eq!(create_database(&pool).await.tone, Tone::Success);
        assert!(db::SchemaIntrospector::table_exists(&pool, "employee").await.unwrap());
    }
}
