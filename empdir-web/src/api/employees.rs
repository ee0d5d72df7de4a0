//! Add, update and delete handlers
//!
//! Each handler runs inside one transaction: committed on success, rolled
//! back (by drop) on any failure. Every POST must carry the CSRF token; it is
//! checked before validation. Validation happens before any write and a
//! failing form is re-rendered with the submitted values.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use empdir_common::db::employees;
use empdir_common::forms::{EmployeeForm, FieldErrors, FormKind};
use empdir_common::models::EmployeeFields;
use empdir_common::Employee;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::parse_employee_id;
use crate::csrf::{self, TokenOnly};
use crate::flash::{self, FlashMessage};
use crate::templates::{render_form, FormPage};
use crate::{AppState, WebError, WebResult};

/// Where successful writes send the browser
const LISTING_URL: &str = "/index/";

/// Add/update form body: the employee fields plus the CSRF token
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeSubmission {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(flatten)]
    pub form: EmployeeForm,
}

/// Render the add/update form with pending flashes plus `extra`
fn form_response(
    state: &AppState,
    jar: SignedCookieJar,
    kind: FormKind,
    employee_id: Option<i64>,
    form: &EmployeeForm,
    errors: &FieldErrors,
    extra: Option<FlashMessage>,
) -> WebResult<Response> {
    let (jar, mut flashes) = flash::take(jar);
    flashes.extend(extra);
    let (jar, csrf_token) = csrf::issue(jar);

    let page = render_form(
        &state.templates,
        FormPage {
            kind,
            employee_id,
            form,
            errors,
            flashes: &flashes,
            csrf_token: &csrf_token,
        },
    )?;
    Ok((jar, page).into_response())
}

/// Flash `message` and send the browser back to the listing
fn redirect_to_listing(jar: SignedCookieJar, message: FlashMessage) -> Response {
    let jar = flash::push(jar, message);
    (jar, Redirect::to(LISTING_URL)).into_response()
}

/// User-facing text for a failed write; the detail goes to the log only
fn storage_failure(action: &str, err: &empdir_common::Error) -> FlashMessage {
    if err.is_unique_violation() {
        FlashMessage::error("Database error: an employee with this email address already exists.")
    } else {
        FlashMessage::error(format!("Database error: the employee could not be {}.", action))
    }
}

// =============================================================================
// Add
// =============================================================================

/// GET /add_emp/
pub async fn show_add_form(State(state): State<AppState>, jar: SignedCookieJar) -> WebResult<Response> {
    form_response(
        &state,
        jar,
        FormKind::Add,
        None,
        &EmployeeForm::default(),
        &FieldErrors::default(),
        None,
    )
}

/// POST /add_emp/
pub async fn submit_add_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    submission: Option<Form<EmployeeSubmission>>,
) -> WebResult<Response> {
    let EmployeeSubmission { csrf_token, form } = submission.map(|Form(s)| s).unwrap_or_default();
    csrf::verify(&jar, &csrf_token)?;

    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return form_response(&state, jar, FormKind::Add, None, &form, &errors, None);
        }
    };

    match insert_employee(&state, &fields).await {
        Ok(emp) => {
            info!(id = emp.id, email = %emp.email, "Employee added");
            Ok(redirect_to_listing(
                jar,
                FlashMessage::success(format!("{} added to database", emp.full_name())),
            ))
        }
        Err(e) => {
            error!(email = %fields.derived_email(), "Failed to add employee: {}", e);
            let message = storage_failure("saved", &e);
            form_response(
                &state,
                jar,
                FormKind::Add,
                None,
                &form,
                &FieldErrors::default(),
                Some(message),
            )
        }
    }
}

async fn insert_employee(state: &AppState, fields: &EmployeeFields) -> empdir_common::Result<Employee> {
    let mut tx = state.db.begin().await?;
    let emp = employees::insert(&mut *tx, fields).await?;
    tx.commit().await?;
    Ok(emp)
}

// =============================================================================
// Update
// =============================================================================

/// GET /update_emp/:id/
///
/// Pre-populates the form with the stored values.
pub async fn show_update_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    jar: SignedCookieJar,
) -> WebResult<Response> {
    let id = parse_employee_id(&raw_id)?;

    let mut conn = state.db.acquire().await.map_err(empdir_common::Error::from)?;
    let emp = employees::find(&mut conn, id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("Employee {}", id)))?;

    form_response(
        &state,
        jar,
        FormKind::Update,
        Some(emp.id),
        &EmployeeForm::from_employee(&emp),
        &FieldErrors::default(),
        None,
    )
}

/// POST /update_emp/:id/
///
/// The stored email is never recomputed, even when the names change.
pub async fn submit_update_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    jar: SignedCookieJar,
    submission: Option<Form<EmployeeSubmission>>,
) -> WebResult<Response> {
    let id = parse_employee_id(&raw_id)?;
    let EmployeeSubmission { csrf_token, form } = submission.map(|Form(s)| s).unwrap_or_default();
    csrf::verify(&jar, &csrf_token)?;

    let mut tx = state.db.begin().await.map_err(empdir_common::Error::from)?;

    if employees::find(&mut *tx, id).await?.is_none() {
        return Err(WebError::NotFound(format!("Employee {}", id)));
    }

    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return form_response(&state, jar, FormKind::Update, Some(id), &form, &errors, None);
        }
    };

    let result = match employees::update(&mut *tx, id, &fields).await {
        Ok(emp) => tx.commit().await.map(|_| emp).map_err(empdir_common::Error::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(emp) => {
            info!(id = emp.id, "Employee updated");
            Ok(redirect_to_listing(
                jar,
                FlashMessage::success(format!("{} updated in database", emp.full_name())),
            ))
        }
        Err(empdir_common::Error::NotFound(what)) => Err(WebError::NotFound(what)),
        Err(e) => {
            error!(id, "Failed to update employee: {}", e);
            let message = storage_failure("updated", &e);
            form_response(
                &state,
                jar,
                FormKind::Update,
                Some(id),
                &form,
                &FieldErrors::default(),
                Some(message),
            )
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// POST /delete_emp/:id/
///
/// Unknown ids are a 404, distinct from storage failures, which are flashed
/// on the listing.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    jar: SignedCookieJar,
    body: Option<Form<TokenOnly>>,
) -> WebResult<Response> {
    let id = parse_employee_id(&raw_id)?;
    let TokenOnly { csrf_token } = body.map(|Form(b)| b).unwrap_or_default();
    csrf::verify(&jar, &csrf_token)?;

    match remove_employee(&state, id).await {
        Ok(emp) => {
            info!(id = emp.id, email = %emp.email, "Employee deleted");
            Ok(redirect_to_listing(
                jar,
                FlashMessage::success(format!("{} deleted from database", emp.full_name())),
            ))
        }
        Err(empdir_common::Error::NotFound(what)) => {
            warn!(id, "Delete requested for unknown employee");
            Err(WebError::NotFound(what))
        }
        Err(e) => {
            error!(id, "Failed to delete employee: {}", e);
            Ok(redirect_to_listing(jar, storage_failure("deleted", &e)))
        }
    }
}

async fn remove_employee(state: &AppState, id: i64) -> empdir_common::Result<Employee> {
    let mut tx = state.db.begin().await?;
    let emp = employees::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(emp)
}
