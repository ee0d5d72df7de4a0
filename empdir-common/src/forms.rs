//! Employee form and its validation rules
//!
//! Add and update share one rule set; the only difference between the two
//! forms is the submit label.

use crate::models::{Department, Employee, EmployeeFields};
use serde::{Deserialize, Serialize};

/// Maximum length of first and last names (column width)
pub const NAME_MAX_LEN: usize = 20;

/// Required extension length
pub const EXT_LEN: usize = 4;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NAME_TOO_LONG: &str = "Field cannot be longer than 20 characters.";
pub const MSG_INVALID_CHOICE: &str = "Not a valid choice.";
pub const MSG_EXT_LENGTH: &str = "Extension must be 4 numbers long";
pub const MSG_EXT_NUMERIC: &str = "Only numeric characters are allowed.";

/// Which flow a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Update,
}

impl FormKind {
    pub fn submit_label(self) -> &'static str {
        match self {
            FormKind::Add => "Add Employee",
            FormKind::Update => "Update Employee",
        }
    }
}

/// Raw submitted values
///
/// Missing fields deserialize to empty strings so that validation, not the
/// extractor, decides what is wrong with a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub fname: String,
    pub lname: String,
    pub dept: String,
    pub ext: String,
}

/// One field's validation failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub messages: Vec<String>,
}

/// Validation failures in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: &str) {
        match self.0.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.messages.push(message.to_string()),
            None => self.0.push(FieldError {
                field,
                messages: vec![message.to_string()],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field (empty when the field is valid)
    pub fn for_field(&self, field: &str) -> &[String] {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl EmployeeForm {
    /// Pre-populate from a stored employee (update GET)
    pub fn from_employee(emp: &Employee) -> Self {
        Self {
            fname: emp.fname.clone(),
            lname: emp.lname.clone(),
            dept: emp.dept.clone(),
            ext: emp.ext.clone(),
        }
    }

    /// Apply the shared rule set
    pub fn validate(&self) -> Result<EmployeeFields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let fname = validate_name(&self.fname, "fname", &mut errors);
        let lname = validate_name(&self.lname, "lname", &mut errors);

        let dept = if self.dept.trim().is_empty() {
            errors.push("dept", MSG_REQUIRED);
            None
        } else {
            match self.dept.trim().parse::<Department>() {
                Ok(dept) => Some(dept),
                Err(_) => {
                    errors.push("dept", MSG_INVALID_CHOICE);
                    None
                }
            }
        };

        let ext = self.ext.trim();
        if ext.is_empty() {
            errors.push("ext", MSG_REQUIRED);
        } else {
            if ext.chars().count() != EXT_LEN {
                errors.push("ext", MSG_EXT_LENGTH);
            }
            if !ext.chars().all(|c| c.is_ascii_digit()) {
                errors.push("ext", MSG_EXT_NUMERIC);
            }
        }

        match (fname, lname, dept) {
            (Some(fname), Some(lname), Some(dept)) if errors.is_empty() => Ok(EmployeeFields {
                fname,
                lname,
                dept,
                ext: ext.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

fn validate_name(raw: &str, field: &'static str, errors: &mut FieldErrors) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(field, MSG_REQUIRED);
        return None;
    }
    if value.chars().count() > NAME_MAX_LEN {
        errors.push(field, MSG_NAME_TOO_LONG);
        return None;
    }
    Some(value.to_string())
}

/// True when `ext` would pass form validation
pub fn is_valid_extension(ext: &str) -> bool {
    ext.chars().count() == EXT_LEN && ext.chars().all(|c| c.is_ascii_digit())
}
