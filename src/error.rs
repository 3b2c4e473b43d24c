//! Structured error types for rowbook.
//!
//! Contract violations on the write path (`EmptyInput`,
//! `ConfigurationMismatch`, `InvariantViolation`) are raised before any
//! workbook mutation. Per-sheet failures inside whole-document aggregation
//! are handled by the reader itself (logged and skipped) and never surface
//! through this type.

/// All errors that can occur while marshalling rows to and from workbooks.
#[derive(Debug, thiserror::Error)]
pub enum RowbookError {
    /// Input/output path extension is neither `.xls` nor `.xlsx`.
    #[error("unsupported workbook format: {path} (expected .xls or .xlsx)")]
    UnsupportedFormat {
        /// The offending path, as given by the caller.
        path: String,
    },

    /// Requested sheet name/index is absent from the workbook.
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// A write operation was given no records.
    #[error("no records to write")]
    EmptyInput,

    /// Per-sheet header map does not line up with the data map.
    #[error("headers do not match data sheets: {0}")]
    ConfigurationMismatch(String),

    /// A caller bug: an engine handle used against the wrong or an already
    /// closed workbook.
    #[error("engine contract violated: {0}")]
    InvariantViolation(String),

    /// The engine could not decode an input byte source.
    #[error("corrupted workbook source: {0}")]
    Corrupted(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RowbookError>;
