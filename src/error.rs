//! Error types for TOON decoding and the serde bridge.
//!
//! Decode failures fall into three categories:
//!
//! - **Input structure**: unterminated quoted strings, invalid escapes,
//!   missing colons
//! - **Count mismatch**: declared array/tabular lengths inconsistent with
//!   the elements actually present
//! - **Indentation**: strict-mode violations (tab in indentation, columns
//!   not a multiple of the configured indent, blank line inside an array)
//!
//! Every decode error carries a human-readable message and, where the
//! failing line is known, a 1-based line number. Encoding never fails;
//! value coercion during normalization is silent.

use std::fmt;
use thiserror::Error;

/// Represents all errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input: unterminated string, invalid escape, missing colon.
    #[error("syntax error at line {line}: {msg}")]
    InputStructure { line: usize, msg: String },

    /// Declared length does not match the elements present.
    #[error("count mismatch at line {line}: {msg}")]
    CountMismatch { line: usize, msg: String },

    /// Strict-mode indentation violation.
    #[error("indentation error at line {line}: {msg}")]
    Indentation { line: usize, msg: String },

    /// Error raised by a `Serialize`/`Deserialize` implementation.
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn structure(line: usize, msg: impl Into<String>) -> Self {
        Error::InputStructure {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn count(line: usize, msg: impl Into<String>) -> Self {
        Error::CountMismatch {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn indentation(line: usize, msg: impl Into<String>) -> Self {
        Error::Indentation {
            line,
            msg: msg.into(),
        }
    }

    /// Creates an error from a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// The 1-based line number of the failing input line, when known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::InputStructure { line, .. }
            | Error::CountMismatch { line, .. }
            | Error::Indentation { line, .. } => Some(*line),
            Error::Message(_) => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
