//! HTTP handlers for empdir-web

pub mod employees;
pub mod health;
pub mod listing;

pub use employees::{
    delete_employee, show_add_form, show_update_form, submit_add_form, submit_update_form,
};
pub use health::health_routes;
pub use listing::list_employees;

use crate::WebError;

/// Parse an `:id` path segment; anything that is not an integer is a 404
pub(crate) fn parse_employee_id(raw: &str) -> Result<i64, WebError> {
    raw.parse::<i64>()
        .map_err(|_| WebError::NotFound(format!("Employee {}", raw)))
}
