//! Employee model and department set

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain appended to every derived email address
pub const EMAIL_DOMAIN: &str = "abnor.com";

/// Name of the only application table
pub const EMPLOYEE_TABLE: &str = "employee";

/// Stored employee row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub fname: String,
    pub lname: String,
    /// Department code (see [`Department::code`])
    pub dept: String,
    pub ext: String,
    pub email: String,
}

impl Employee {
    /// "First Last", as used in confirmation messages
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }
}

/// Validated, mutable employee fields
///
/// Produced only by [`crate::forms::EmployeeForm::validate`]; email is not part
/// of it because updates never touch the stored address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub fname: String,
    pub lname: String,
    pub dept: Department,
    pub ext: String,
}

impl EmployeeFields {
    /// Email derived from the names at creation time
    pub fn derived_email(&self) -> String {
        derive_email(&self.fname, &self.lname)
    }
}

/// `lowercase(fname)_lowercase(lname)@abnor.com`
pub fn derive_email(fname: &str, lname: &str) -> String {
    format!(
        "{}_{}@{}",
        fname.to_lowercase(),
        lname.to_lowercase(),
        EMAIL_DOMAIN
    )
}

/// Fixed department set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    HumanResources,
    InformationTechnology,
    Manufacturing,
    Sales,
}

impl Department {
    /// All departments in display order
    pub const ALL: [Department; 5] = [
        Department::Engineering,
        Department::HumanResources,
        Department::InformationTechnology,
        Department::Manufacturing,
        Department::Sales,
    ];

    /// Short code stored in the `dept` column and submitted by forms
    pub fn code(self) -> &'static str {
        match self {
            Department::Engineering => "ENG",
            Department::HumanResources => "HR",
            Department::InformationTechnology => "IT",
            Department::Manufacturing => "MAN",
            Department::Sales => "SAL",
        }
    }

    /// Human readable label shown in the select
    pub fn label(self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::HumanResources => "Human Resources",
            Department::InformationTechnology => "Information Technology",
            Department::Manufacturing => "Manufacturing",
            Department::Sales => "Sales",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.code() == s)
            .ok_or_else(|| format!("Unknown department code: {}", s))
    }
}
