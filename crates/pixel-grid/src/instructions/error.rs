//! Diagnostics collected while decoding instruction text.

use std::fmt;

use crate::color::ParseColorError;
use crate::grid::GRID_SIZE;

/// A problem found in instruction text.
///
/// Decoding never aborts; each of these is reported alongside the result.
/// Line numbers are 1-based, counted after trimming the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Line is neither header, legend nor a 16-token grid row
    MalformedLine { line: usize },
    /// Legend line whose token is not a single character
    MalformedLegend { line: usize },
    /// Legend color could not be parsed; its token decodes as empty
    InvalidColor {
        line: usize,
        token: char,
        source: ParseColorError,
    },
    /// Legend line after the first grid row
    LegendAfterGrid { line: usize },
    /// Grid uses a token with no legend entry
    UnknownToken { token: char },
    /// Fewer than 16 grid rows; the rest are empty
    MissingRows { found: usize },
    /// More than 16 grid rows; extras ignored
    SurplusRows { extra: usize },
    /// Description block never closed with `"""`
    UnterminatedDescription,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedLine { line } => write!(f, "line {}: not a grid row", line),
            ParseError::MalformedLegend { line } => {
                write!(f, "line {}: legend token must be one character", line)
            }
            ParseError::InvalidColor {
                line,
                token,
                source,
            } => write!(f, "line {}: color for '{}': {}", line, token, source),
            ParseError::LegendAfterGrid { line } => {
                write!(f, "line {}: legend entry after grid rows", line)
            }
            ParseError::UnknownToken { token } => write!(f, "unknown token '{}'", token),
            ParseError::MissingRows { found } => {
                write!(f, "expected {} grid rows, found {}", GRID_SIZE, found)
            }
            ParseError::SurplusRows { extra } => {
                write!(f, "{} grid rows beyond the first {} ignored", extra, GRID_SIZE)
            }
            ParseError::UnterminatedDescription => {
                write!(f, "description block is missing its closing \"\"\"")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::InvalidColor { source, .. } => Some(source),
            _ => None,
        }
    }
}
