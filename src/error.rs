//! Error type shared by the whole pipeline.

use std::fmt;
use std::io;

use crate::types::Point;

/// Error type for synthesis, I/O and validation.
#[derive(Debug)]
pub enum Error {
    /// File or process I/O error.
    Io(io::Error),
    /// Malformed truth-table input.
    Parse { line: usize, message: String },
    /// A "don't care" input bit, which is not supported.
    DontCare { line: usize },
    /// An `Xor` node without children has no defined value.
    EmptyXor,
    /// An external oracle reported a failure.
    Oracle(String),
    /// The top-level synthesis call exceeded its size budget.
    BudgetExhausted { budget: usize },
    /// The rendered formula disagrees with the truth table.
    Mismatch { point: Point, expected: bool, actual: bool },
    /// Points are bit-packed into `u64`, so at most 64 variables are supported.
    TooManyVariables { n: usize },
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Parse { line, message } => write!(f, "Parse error at line {}: {}", line, message),
            Error::DontCare { line } => {
                write!(f, "Found don't care bit at line {}, this is currently not supported", line)
            }
            Error::EmptyXor => write!(f, "Xor node without children has no value"),
            Error::Oracle(msg) => write!(f, "Oracle error: {}", msg),
            Error::BudgetExhausted { budget } => write!(f, "No formula found within size budget {}", budget),
            Error::Mismatch { point, expected, actual } => {
                write!(f, "formula({}) = {} != {}", point, *actual as u8, *expected as u8)
            }
            Error::TooManyVariables { n } => write!(f, "Too many variables: {} (at most 64 supported)", n),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
