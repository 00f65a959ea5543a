//! Custom error types for the avt-tools crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum AvtError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A slot was declared by the layout but the file ended before it.
    #[error("Truncated file: {section} slot {slot} extends past end of file")]
    Truncated { section: &'static str, slot: usize },

    /// An enum field held a byte with no entry in its lookup table.
    /// Fatal for the file being processed; rule/action kinds are exempt
    /// and degrade to an "unknown" display instead.
    #[error("Unknown {field} value {value:#04x} in {record}")]
    UnknownEnum {
        field: &'static str,
        record: String,
        value: u8,
    },

    /// A verb reference of 0, or one past the decoded verb count.
    /// Verb references are 1-based indexes into the verb section.
    #[error("Invalid verb reference {index} in {record} ({field}): {count} verbs decoded")]
    InvalidVerb {
        field: &'static str,
        record: String,
        index: u8,
        count: usize,
    },

    /// The file is structurally invalid, or a schema does not fit its slot.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A convenience `Result` type alias using the crate's `AvtError` type.
pub type Result<T> = std::result::Result<T, AvtError>;
