//! empdir-admin library - Operator tooling for the employee directory
//!
//! - Schema operations (create, drop, reset) and CSV population, shared by
//!   the interactive menu and the one-shot subcommands
//! - JSON to CSV conversion used by the `json-to-csv` binary

pub mod convert;
pub mod error;
pub mod menu;
pub mod ops;
pub mod populate;

pub use error::{AdminError, AdminResult};
