//! Error types for dyndiff.
//!
//! Low scores and shape mismatches are verdicts, not errors. Only parser
//! failures and invalid configuration surface here.

use thiserror::Error;

/// The parser could not interpret a raw document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error: {message}{}", format_position(.position))]
pub struct ParseError {
    /// Human readable description from the parser
    pub message: String,
    /// Byte offset of the failure, when the parser knows it
    pub position: Option<usize>,
}

fn format_position(position: &Option<usize>) -> String {
    match position {
        Some(pos) => format!(" at {pos}"),
        None => String::new(),
    }
}

impl ParseError {
    /// Create a parse error without position information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Attach the byte offset where parsing failed.
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Errors that can occur while building or running a differ.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Baseline or candidate could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Match threshold outside `(0, 1]`
    #[error("match threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    /// Every element weight is zero, so no score can be normalized
    #[error("element weights must not all be zero")]
    InvalidWeights,

    /// Missing-key penalty is negative or not a finite number
    #[error("missing key penalty must be finite and >= 0, got {0}")]
    InvalidPenalty(f64),

    /// An inferred or user supplied pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] Box<regex::Error>),
}

/// Result type alias for differ operations.
pub type DiffResult<T> = Result<T, DiffError>;

impl From<regex::Error> for DiffError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(Box::new(err))
    }
}
