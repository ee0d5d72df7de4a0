//! # Employee Directory Common Library
//!
//! Shared code for the directory web server and the admin tooling:
//! - Error type
//! - Configuration resolution
//! - Database initialization, schema and introspection
//! - Employee model, department set and form validation
//! - Employee repository queries

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;

pub use error::{Error, Result};
pub use models::{Department, Employee, EMAIL_DOMAIN};
