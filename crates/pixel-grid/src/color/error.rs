//! Error type for color string parsing.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Input was empty or only whitespace
    Empty,
    /// Hex string has invalid length (must be 3 or 6 digits after `#`)
    InvalidLength,
    /// Invalid hexadecimal digit
    InvalidHex(ParseIntError),
    /// `rgb()`/`rgba()` with the wrong number of components
    ComponentCount {
        /// Number of components found
        found: usize,
    },
    /// A channel value is not an integer in 0..=255
    InvalidChannel(ParseIntError),
    /// Alpha is not a number in 0..=1
    InvalidAlpha(String),
    /// Not `transparent`, hex, `rgb()` or `rgba()`
    UnknownFormat(String),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl From<ParseFloatError> for ParseColorError {
    fn from(err: ParseFloatError) -> Self {
        ParseColorError::InvalidAlpha(err.to_string())
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::Empty => write!(f, "empty color string"),
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 digits)")
            }
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex digit: {}", err),
            ParseColorError::ComponentCount { found } => {
                write!(f, "expected 3 or 4 color components, found {}", found)
            }
            ParseColorError::InvalidChannel(err) => write!(f, "invalid channel value: {}", err),
            ParseColorError::InvalidAlpha(value) => write!(f, "invalid alpha value: {}", value),
            ParseColorError::UnknownFormat(input) => write!(f, "unrecognized color: {}", input),
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) | ParseColorError::InvalidChannel(err) => Some(err),
            _ => None,
        }
    }
}
