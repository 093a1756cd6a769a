//! Error types for the grid engine and the adapter layer.
//!
//! Structural errors are raised to the immediate caller (the business panel)
//! and never silently swallowed. A superseded repaint is *not* an error and
//! produces nothing here. The grid guarantees its collections stay mutually
//! consistent even when an operation fails.

/// Result type alias for grid operations.
pub type GridResult<T> = std::result::Result<T, GridError>;

/// Result type alias for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Errors raised by [`GridController`](crate::grid::GridController)
/// operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    /// A row operation referenced an index outside current bounds.
    ///
    /// The operation is aborted with no partial mutation.
    #[error("row index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A selection operation referenced indices outside view bounds.
    ///
    /// The whole call is rejected atomically; the selection is unchanged.
    #[error("selection index {index} out of range (view len {len})")]
    InvalidSelection { index: usize, len: usize },

    /// A row carried a key that no column defines.
    #[error("row has no matching column for key '{key}'")]
    ColumnMismatch { key: String },

    /// A row is missing a value for a defined column.
    #[error("row is missing a value for column '{key}'")]
    MissingColumn { key: String },

    /// Two columns were declared with the same key.
    #[error("duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// A cell operation referenced a column key the grid does not define.
    #[error("unknown column '{key}'")]
    UnknownColumn { key: String },
}

/// Errors raised by the widget and event adapters.
///
/// A missing mapping is fatal to the creation or binding call; there is no
/// implicit fallback to a default widget, because that would mask
/// integration bugs between the abstract descriptions and the active
/// toolkit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdapterError {
    /// No native mapping exists for the requested abstract widget kind.
    #[error("no native widget mapping for kind '{kind}'")]
    UnmappedWidget { kind: String },

    /// No native mapping exists for the requested abstract event name.
    #[error("no native event mapping for '{name}'")]
    UnmappedEvent { name: String },

    /// The referenced widget does not exist (already destroyed, or from
    /// another backend).
    #[error("unknown widget handle")]
    UnknownWidget,
}
