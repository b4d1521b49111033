use std::path::PathBuf;

/// Error type for all board operations.
///
/// Every domain failure carries a stable symbolic code (see [`BoardError::code`])
/// so callers can branch programmatically without matching on message text.
/// OS-level failures (permissions, disk full) flow through the `Io` variant.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid name: {0:?} (use letters, digits, '-' or '_')")]
    InvalidName(String),
    #[error("path escapes board root: {}", .0.display())]
    PathTraversal(PathBuf),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("cannot derive a card id from title {0:?}")]
    InvalidTitle(String),
    #[error("card already exists: {0}")]
    CardExists(String),
    #[error("card not found: {0}")]
    CardNotFound(String),
    #[error("card {id} is already in column {column}")]
    AlreadyInColumn { id: String, column: String },
    #[error("invalid position: {0} (positions start at 1)")]
    InvalidPosition(usize),
    #[error("checklist index {index} out of range (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Stable symbolic code for this error, independent of the message.
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::InvalidName(_) => "InvalidName",
            BoardError::PathTraversal(_) => "PathTraversal",
            BoardError::ColumnNotFound(_) => "ColumnNotFound",
            BoardError::InvalidTitle(_) => "InvalidTitle",
            BoardError::CardExists(_) => "CardExists",
            BoardError::CardNotFound(_) => "CardNotFound",
            BoardError::AlreadyInColumn { .. } => "AlreadyInColumn",
            BoardError::InvalidPosition(_) => "InvalidPosition",
            BoardError::IndexOutOfRange { .. } => "IndexOutOfRange",
            BoardError::Io(_) => "Error",
        }
    }
}
