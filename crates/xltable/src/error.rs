//! Error types for xltable

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by fallible accessor functions
pub type AccessorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a table
///
/// Everything except [`Error::Accessor`] is a configuration error, reported
/// before any record is read.
#[derive(Debug, Error)]
pub enum Error {
    /// The column spec declares no columns
    #[error("A table needs at least one column")]
    EmptyColumnSpec,

    /// Two columns share a header
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Column header is empty
    #[error("Column names must not be empty")]
    EmptyColumnName,

    /// Malformed formula template
    #[error("Invalid formula for column '{column}': {message}")]
    InvalidFormula { column: String, message: String },

    /// Formula placeholder names a column that is not declared
    #[error("Formula for column '{column}' references undeclared column '{reference}'")]
    UnknownFormulaColumn { column: String, reference: String },

    /// Table name breaks worksheet naming rules
    #[error("Invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: &'static str },

    /// Table does not fit on the worksheet
    #[error("Table does not fit on the worksheet: {0}")]
    Layout(#[from] xltable_core::Error),

    /// An accessor function failed; its error is kept as the source
    #[error("Accessor for column '{column}' failed on record {row}")]
    Accessor {
        column: String,
        row: usize,
        #[source]
        source: AccessorError,
    },
}
