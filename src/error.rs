//! Error types for the reconciliation engine.

/// Errors that can occur while planning or applying DDL.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// An existing column's type would change, which cannot be expressed as an
    /// in-place ALTER.
    #[error(
        "changing the type of an existing column is not supported \
         (column '{column}': '{from}' -> '{to}')"
    )]
    TypeChange {
        /// The offending column name.
        column: String,
        /// Previously recorded type (normalized).
        from: String,
        /// Desired type (normalized).
        to: String,
    },

    /// Columns are being added or removed in the same update that edits
    /// attributes of a surviving column.
    #[error(
        "detected changes in both the set of columns and existing column \
         attributes (column '{column}'); apply them as separate updates"
    )]
    MixedColumnChange {
        /// A surviving column whose attributes changed.
        column: String,
    },

    /// A generated statement failed remotely.
    #[error("cannot execute {statement}: {detail}")]
    Execution {
        /// The statement that failed.
        statement: String,
        /// Error detail reported by the execution collaborator.
        detail: String,
    },

    /// The wait timeout elapsed and the in-flight statement was cancelled.
    #[error("statement timed out after {waited_secs}s and was cancelled: {statement}")]
    Timeout {
        /// The statement that was cancelled.
        statement: String,
        /// How long we waited before cancelling.
        waited_secs: u64,
    },

    /// The compute target could not be resolved or started.
    #[error("compute provisioning failed: {0}")]
    Provisioning(String),

    /// The catalog metadata collaborator failed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, DdlError>;
