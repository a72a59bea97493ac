//! Reader and writer errors (§10.1 "Error handling").

use std::fmt;

use trtl_core::Status;

/// A syntax or I/O error produced while reading, with the position it was
/// detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ReaderError {
    pub status: Status,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ReaderError {
    #[must_use]
    pub fn new(status: Status, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            status,
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} ({})", self.line, self.column, self.message, self.status)
    }
}

/// An error produced while writing: either the target sink failed, or an
/// event was delivered the writer cannot accept (`Status::BadEvent`, e.g.
/// an `End` with no matching open context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{status}")]
pub struct WriterError {
    pub status: Status,
}

impl WriterError {
    #[must_use]
    pub const fn new(status: Status) -> Self {
        Self { status }
    }
}
