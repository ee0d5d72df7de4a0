//! Database initialization and schema management
//!
//! The web server opens the database with [`init_database`], which creates the
//! file and the schema when missing. The admin tool uses [`open_database`] and
//! manages the schema explicitly with [`create_schema`], [`drop_schema`] and
//! [`reset_schema`].

use crate::models::EMPLOYEE_TABLE;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every connection
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating the file if needed) without touching the schema
pub async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Open the database and make sure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let pool = open_database(db_path).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create the employee table and its email index (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fname VARCHAR(20) NOT NULL,
            lname VARCHAR(20) NOT NULL,
            dept VARCHAR(20) NOT NULL,
            ext VARCHAR(4) NOT NULL,
            email VARCHAR(50) NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS ix_employee_email ON employee (email)")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("Schema ready (table '{}')", EMPLOYEE_TABLE);
    Ok(())
}

/// Drop every application table (idempotent)
pub async fn drop_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS employee")
        .execute(pool)
        .await?;
    info!("Dropped table '{}'", EMPLOYEE_TABLE);
    Ok(())
}

/// Drop then recreate the schema
pub async fn reset_schema(pool: &SqlitePool) -> Result<()> {
    drop_schema(pool).await?;
    create_schema(pool).await
}
