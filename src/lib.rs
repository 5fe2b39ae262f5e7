//! Declarative lakehouse table and view reconciliation into Spark-style DDL.
//!
//! `lakeddl` takes a desired description of a catalog table or view and, on
//! update, the previously recorded one, and computes the minimal ordered
//! sequence of DDL statements that transforms the existing object into the
//! desired one, or creates/drops it outright.
//!
//! # Architecture
//!
//! The engine consists of several components:
//!
//! - **Schema** - [`schema::TableDescription`] and its columns: pure value
//!   objects describing desired or observed state.
//! - **Statement builder** - [`statement::build_create_statement`]: entity
//!   description to full `CREATE` statement text.
//! - **Diff engine** - [`diff::diff`]: desired vs. previous description to an
//!   ordered list of `ALTER`/`COMMENT` statements expressing only the
//!   necessary changes.
//! - **Validators** - [`validate`]: reject unsupported change shapes (type
//!   changes, mixed membership/attribute edits) before anything executes.
//! - **Managed-property classifier** - [`managed::ManagedProperties`]: keeps
//!   server-managed metadata keys out of generated clauses and out of drift.
//! - **Lifecycle** - [`lifecycle::TableLifecycle`]: sequences statements
//!   through the execution collaborator, one at a time.
//!
//! # Example
//!
//! ```rust
//! use lakeddl::prelude::*;
//!
//! let desired = TableDescription::new("main", "sales", "orders", TableKind::Managed)
//!     .column(ColumnDescription::new("id", "bigint").not_null())
//!     .column(ColumnDescription::new("amount", "decimal(12,2)"))
//!     .data_source_format("DELTA")
//!     .comment("orders ledger");
//!
//! let sql = build_create_statement(&desired, &ManagedProperties::new());
//! assert!(sql.starts_with("CREATE TABLE `main`.`sales`.`orders`"));
//!
//! let previous = desired.clone();
//! let plan = diff(&desired, &previous, &ManagedProperties::new()).unwrap();
//! assert!(plan.is_empty());
//! ```

pub mod diff;
pub mod error;
pub mod executor;
pub mod format;
pub mod lifecycle;
pub mod managed;
pub mod schema;
pub mod statement;
pub mod validate;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::diff::diff;
    pub use crate::error::{DdlError, Result};
    pub use crate::executor::{
        CommandExecutor, CommandOutput, ComputeBoundExecutor, ComputeProvisioner, ComputeRequest,
        StatementExecutor, StatementStatus, MAX_EXEC_WAIT,
    };
    pub use crate::lifecycle::{CatalogClient, TableLifecycle};
    pub use crate::managed::ManagedProperties;
    pub use crate::schema::{ColumnDescription, TableDescription, TableKind};
    pub use crate::statement::{build_create_statement, build_drop_statement, location_clause};
    pub use crate::validate::{
        normalize_column_type, validate_no_mixed_membership_change, validate_no_type_change,
    };
}
