//! Page templates
//!
//! Templates live as standalone files under `templates/` and are embedded at
//! compile time. They are minijinja based; `.html` names get auto-escaping, so
//! every value from the database or the request is escaped on output.

use crate::flash::FlashMessage;
use crate::WebResult;
use axum::response::Html;
use empdir_common::forms::{EmployeeForm, FieldErrors, FormKind};
use empdir_common::{Department, Employee};
use minijinja::{context, Environment};
use serde::Serialize;
use std::collections::BTreeMap;

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
pub const EMPLOYEE_FORM_TEMPLATE: &str = include_str!("../templates/employee_form.html");

/// Compile all page templates
pub fn environment() -> WebResult<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE_TEMPLATE)?;
    env.add_template("index.html", INDEX_TEMPLATE)?;
    env.add_template("employee_form.html", EMPLOYEE_FORM_TEMPLATE)?;
    Ok(env)
}

#[derive(Debug, Serialize)]
struct DepartmentOption {
    code: &'static str,
    label: &'static str,
}

fn department_options() -> Vec<DepartmentOption> {
    Department::ALL
        .into_iter()
        .map(|d| DepartmentOption {
            code: d.code(),
            label: d.label(),
        })
        .collect()
}

/// Listing page data
pub struct IndexPage<'a> {
    pub employees: &'a [Employee],
    pub current_page: i64,
    pub total_pages: i64,
    pub flashes: &'a [FlashMessage],
    /// Rendered into each delete button's form
    pub csrf_token: &'a str,
}

/// Add/update form page data
pub struct FormPage<'a> {
    pub kind: FormKind,
    /// Employee being edited; `None` posts to `/add_emp/`
    pub employee_id: Option<i64>,
    pub form: &'a EmployeeForm,
    pub errors: &'a FieldErrors,
    pub flashes: &'a [FlashMessage],
    pub csrf_token: &'a str,
}

pub fn render_index(env: &Environment<'static>, page: IndexPage<'_>) -> WebResult<Html<String>> {
    let tmpl = env.get_template("index.html")?;
    let html = tmpl.render(context! {
        head_title => "Home",
        page_title => "Employees",
        emps => page.employees,
        current_page => page.current_page,
        total_pages => page.total_pages,
        flashes => page.flashes,
        csrf_token => page.csrf_token,
    })?;
    Ok(Html(html))
}

pub fn render_form(env: &Environment<'static>, page: FormPage<'_>) -> WebResult<Html<String>> {
    let (head_title, page_title) = match page.kind {
        FormKind::Add => ("Add", "Add Employee"),
        FormKind::Update => ("Update", "Update Employee"),
    };

    let errors: BTreeMap<&str, &[String]> = page
        .errors
        .iter()
        .map(|e| (e.field, e.messages.as_slice()))
        .collect();

    let tmpl = env.get_template("employee_form.html")?;
    let html = tmpl.render(context! {
        head_title => head_title,
        page_title => page_title,
        emp_id => page.employee_id,
        form => page.form,
        errors => errors,
        departments => department_options(),
        submit_label => page.kind.submit_label(),
        flashes => page.flashes,
        csrf_token => page.csrf_token,
    })?;
    Ok(Html(html))
}
