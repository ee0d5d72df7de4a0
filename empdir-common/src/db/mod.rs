//! Database access: initialization, schema, introspection and employee queries

pub mod employees;
pub mod init;
pub mod introspect;

pub use init::*;
pub use introspect::{ActualColumn, SchemaIntrospector};
