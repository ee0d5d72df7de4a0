//! Employee queries
//!
//! Every function takes a connection so callers decide the transactional
//! scope; handlers pass `&mut *tx` from one transaction per request.

use crate::models::{Employee, EmployeeFields};
use crate::{Error, Result};
use sqlx::SqliteConnection;

/// Total number of stored employees
pub async fn count(conn: &mut SqliteConnection) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(conn)
        .await?;
    Ok(total)
}

/// One slice of the listing, ordered by last name (id breaks ties)
pub async fn list_page(conn: &mut SqliteConnection, limit: i64, offset: i64) -> Result<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, fname, lname, dept, ext, email
        FROM employee
        ORDER BY lname ASC, id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

/// Look up one employee
pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Employee>> {
    let emp = sqlx::query_as::<_, Employee>(
        "SELECT id, fname, lname, dept, ext, email FROM employee WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(emp)
}

/// Look up one employee, failing with [`Error::NotFound`]
pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Employee> {
    find(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Employee {}", id)))
}

/// Insert a new employee with its derived email
///
/// Fails with a UNIQUE violation if another employee already owns the email.
pub async fn insert(conn: &mut SqliteConnection, fields: &EmployeeFields) -> Result<Employee> {
    let email = fields.derived_email();

    let result = sqlx::query(
        "INSERT INTO employee (fname, lname, dept, ext, email) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&fields.fname)
    .bind(&fields.lname)
    .bind(fields.dept.code())
    .bind(&fields.ext)
    .bind(&email)
    .execute(conn)
    .await?;

    Ok(Employee {
        id: result.last_insert_rowid(),
        fname: fields.fname.clone(),
        lname: fields.lname.clone(),
        dept: fields.dept.code().to_string(),
        ext: fields.ext.clone(),
        email,
    })
}

/// Overwrite the mutable fields of an employee; the email is left as stored
pub async fn update(conn: &mut SqliteConnection, id: i64, fields: &EmployeeFields) -> Result<Employee> {
    let result = sqlx::query("UPDATE employee SET fname = ?, lname = ?, dept = ?, ext = ? WHERE id = ?")
        .bind(&fields.fname)
        .bind(&fields.lname)
        .bind(fields.dept.code())
        .bind(&fields.ext)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Employee {}", id)));
    }

    get(conn, id).await
}

/// Hard-delete an employee, returning the removed row
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<Employee> {
    let emp = get(&mut *conn, id).await?;

    sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(emp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::Department;
    use sqlx::SqlitePool;

    async fn setup_test_db() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("app.db")).await.unwrap();
        (dir, pool)
    }

    fn fields(fname: &str, lname: &str, dept: Department, ext: &str) -> EmployeeFields {
        EmployeeFields {
            fname: fname.to_string(),
            lname: lname.to_string(),
            dept,
            ext: ext.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_derives_email() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let emp = insert(&mut conn, &fields("Megan", "Wolfgrill", Department::InformationTechnology, "3999"))
            .await
            .unwrap();

        assert_eq!(emp.email, "megan_wolfgrill@abnor.com");
        assert_eq!(emp.dept, "IT");

        let stored = get(&mut conn, emp.id).await.unwrap();
        assert_eq!(stored, emp);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, &fields("Gil", "Flangeworm", Department::HumanResources, "1234"))
            .await
            .unwrap();
        let err = insert(&mut conn, &fields("GIL", "FLANGEWORM", Department::Sales, "9999"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation(), "Unexpected error: {:?}", err);
        assert_eq!(count(&mut conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_email() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let emp = insert(&mut conn, &fields("Maya", "Name", Department::InformationTechnology, "3234"))
            .await
            .unwrap();
        let updated = update(&mut conn, emp.id, &fields("Mia", "Other", Department::Sales, "4000"))
            .await
            .unwrap();

        assert_eq!(updated.fname, "Mia");
        assert_eq!(updated.lname, "Other");
        assert_eq!(updated.dept, "SAL");
        assert_eq!(updated.ext, "4000");
        assert_eq!(updated.email, "maya_name@abnor.com");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = update(&mut conn, 99, &fields("A", "B", Department::Sales, "1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let emp = insert(&mut conn, &fields("Wil", "Manglefrog", Department::Sales, "2234"))
            .await
            .unwrap();

        let err = delete(&mut conn, emp.id + 1).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(count(&mut conn).await.unwrap(), 1);

        let removed = delete(&mut conn, emp.id).await.unwrap();
        assert_eq!(removed.full_name(), "Wil Manglefrog");
        assert_eq!(count(&mut conn).await.unwrap(), 0);
        assert!(find(&mut conn, emp.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_page_orders_by_last_name() {
        let (_dir, pool) = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        for (fname, lname) in [("E", "Evans"), ("B", "Baker"), ("D", "Davis"), ("A", "Adams"), ("C", "Clark")] {
            insert(&mut conn, &fields(fname, lname, Department::Engineering, "1000"))
                .await
                .unwrap();
        }

        let first: Vec<_> = list_page(&mut conn, 3, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.lname)
            .collect();
        assert_eq!(first, ["Adams", "Baker", "Clark"]);

        let second: Vec<_> = list_page(&mut conn, 3, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.lname)
            .collect();
        assert_eq!(second, ["Davis", "Evans"]);

        assert!(list_page(&mut conn, 3, 6).await.unwrap().is_empty());
    }
}
