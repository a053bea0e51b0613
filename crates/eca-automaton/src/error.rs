//! Error types for the automaton engine.

use thiserror::Error;

/// Result type alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Errors that can occur during automaton operations.
#[derive(Debug, Error, PartialEq)]
pub enum AutomatonError {
    /// A cell write targeted an index outside the row.
    #[error("cell index {index} out of range for row of {size} cells")]
    OutOfRange { index: i64, size: usize },

    /// Rule numbers are 8-bit; anything above 255 is rejected.
    #[error("invalid rule number: {rule} (must be 0..=255)")]
    InvalidRule { rule: u32 },

    /// Cell and neighborhood values must be exactly 0 or 1.
    #[error("invalid cell state: {state} (must be 0 or 1)")]
    InvalidState { state: u8 },

    /// The row must hold at least one cell.
    #[error("invalid row size: {size} (must be >= 1)")]
    InvalidSize { size: usize },

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {message}")]
    Config { message: String },
}
