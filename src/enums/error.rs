//! # Error Module - Custom *Minops* Error Type
//!
//! Defines the unified error type for operator application.
//!
//! ## Features
//! - Covers invalid arguments, unsupported operator capabilities,
//! broadcast shape mismatches, length mismatches and out-of-range indices.
//! - Implements `Display` for readable output and `Error` for integration
//! with standard Rust error handling.

use std::error::Error;
use std::fmt;

/// Catch all error type for `Minops`
#[derive(Debug, Clone, PartialEq)]
pub enum OpError {
    /// A caller supplied argument is outside its contract, e.g. a negative start.
    InvalidArgument {
        message: String,
    },
    /// The operator does not provide the requested capability.
    Unsupported {
        op: String,
        what: &'static str,
    },
    /// The source cannot be broadcast to the target shape.
    ShapeMismatch {
        source: Vec<usize>,
        target: Vec<usize>,
    },
    LengthMismatch {
        expected: usize,
        found: usize,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
}

impl OpError {
    /// Shorthand for an `InvalidArgument` error
    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        OpError::InvalidArgument {
            message: message.into(),
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            OpError::Unsupported { op, what } => {
                write!(f, "Unsupported operation: {} not defined for operator '{}'.", what, op)
            }
            OpError::ShapeMismatch { source, target } => {
                write!(
                    f,
                    "Shape mismatch: cannot broadcast shape {:?} to {:?}.",
                    source, target
                )
            }
            OpError::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {}, found {}.", expected, found)
            }
            OpError::IndexOutOfBounds { index, len } => {
                write!(f, "Index out of bounds: index {} for length {}.", index, len)
            }
        }
    }
}

impl Error for OpError {}

/// Result type for operator application.
pub type Result<T> = std::result::Result<T, OpError>;
