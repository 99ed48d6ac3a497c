//! Plain-text interchange format for a titled grid.
//!
//! ```text
//! Title: Heart
//!
//! Description: """
//! A small red heart.
//! """
//!
//! A: transparent
//! B: rgba(255,0,0,1)
//!
//! AAAAAAAAAAAAAAAA
//! AABBAAAAAAABBAAA
//! ...
//! ```
//!
//! Each distinct color gets a token in first-seen order, followed by 16
//! rows of 16 tokens. See [`tokens`] for the token alphabet.

mod error;
pub mod tokens;

use std::collections::HashMap;

pub use error::ParseError;

use crate::color::Color;
use crate::grid::{Grid, GRID_SIZE};

const TITLE_PREFIX: &str = "Title:";
const DESCRIPTION_OPEN: &str = "Description: \"\"\"";
const DESCRIPTION_CLOSE: &str = "\"\"\"";

/// Result of [`decode`]: the recovered document plus any diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub title: String,
    pub description: String,
    pub grid: Grid,
    pub warnings: Vec<ParseError>,
}

impl Decoded {
    /// True when the text decoded without any diagnostics.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Render a titled grid as instruction text.
///
/// A description line that would read as the closing `"""` is written
/// with one leading space, so it cannot end the block early.
pub fn encode(title: &str, description: &str, grid: &Grid) -> String {
    let palette: Vec<(Color, char)> = grid
        .distinct_colors()
        .into_iter()
        .zip(tokens::tokens())
        .collect();
    let token_of = |cell: &Color| {
        palette
            .iter()
            .find(|(color, _)| color == cell)
            .map(|(_, token)| *token)
            .unwrap_or('A')
    };

    let legend: Vec<String> = palette
        .iter()
        .map(|(color, token)| format!("{}: {}", token, color))
        .collect();
    let rows: Vec<String> = grid
        .rows()
        .map(|row| row.iter().map(token_of).collect())
        .collect();

    format!(
        "{} {}\n\n{}\n{}\n{}\n\n{}\n\n{}",
        TITLE_PREFIX,
        title,
        DESCRIPTION_OPEN,
        escape_description(description),
        DESCRIPTION_CLOSE,
        legend.join("\n"),
        rows.join("\n")
    )
}

fn escape_description(description: &str) -> String {
    description
        .split('\n')
        .map(|line| {
            if line.trim_end() == DESCRIPTION_CLOSE {
                format!(" {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse instruction text.
///
/// Never fails. Lines are classified in order:
/// - inside an open description block, every line belongs to the
///   description until a line that is exactly `"""`
/// - `Title:` sets the title (rest of line, trimmed)
/// - `Description: """` opens the description block
/// - blank lines are skipped
/// - a line with a colon is a legend entry `token: color`
/// - a line of exactly 16 characters is a grid row
///
/// Anything else is skipped and reported. Missing rows are filled with
/// [`Color::Empty`]; tokens without a legend entry decode as empty.
pub fn decode(input: &str) -> Decoded {
    let mut title = String::new();
    let mut description: Vec<&str> = Vec::new();
    let mut in_description = false;
    let mut legend: HashMap<char, Color> = HashMap::new();
    let mut rows: Vec<&str> = Vec::new();
    let mut surplus = 0;
    let mut warnings = Vec::new();

    for (number, line) in input.trim().lines().enumerate() {
        let number = number + 1;

        if in_description {
            if line.trim_end() == DESCRIPTION_CLOSE {
                in_description = false;
            } else {
                description.push(line);
            }
        } else if let Some(rest) = line.strip_prefix(TITLE_PREFIX) {
            title = rest.trim().to_string();
        } else if line.starts_with(DESCRIPTION_OPEN) {
            in_description = true;
            description.clear();
        } else if line.trim().is_empty() {
            continue;
        } else if let Some((token, color)) = line.split_once(':') {
            if !rows.is_empty() {
                warnings.push(ParseError::LegendAfterGrid { line: number });
                continue;
            }
            let mut chars = token.trim().chars();
            let (Some(token), None) = (chars.next(), chars.next()) else {
                warnings.push(ParseError::MalformedLegend { line: number });
                continue;
            };
            match color.parse::<Color>() {
                Ok(color) => {
                    legend.insert(token, color);
                }
                Err(source) => warnings.push(ParseError::InvalidColor {
                    line: number,
                    token,
                    source,
                }),
            }
        } else if line.chars().count() == GRID_SIZE {
            if rows.len() < GRID_SIZE {
                rows.push(line);
            } else {
                surplus += 1;
            }
        } else {
            warnings.push(ParseError::MalformedLine { line: number });
        }
    }

    if in_description {
        warnings.push(ParseError::UnterminatedDescription);
    }
    if rows.len() < GRID_SIZE {
        warnings.push(ParseError::MissingRows { found: rows.len() });
    }
    if surplus > 0 {
        warnings.push(ParseError::SurplusRows { extra: surplus });
    }

    let mut grid = Grid::empty();
    let mut unknown: Vec<char> = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, token) in line.chars().enumerate() {
            let cell = match legend.get(&token) {
                Some(&color) => color,
                None => {
                    if !unknown.contains(&token) {
                        unknown.push(token);
                    }
                    Color::Empty
                }
            };
            if let Some(index) = Grid::index_of(row, col) {
                grid.set(index, cell);
            }
        }
    }
    warnings.extend(unknown.into_iter().map(|token| ParseError::UnknownToken { token }));

    Decoded {
        title,
        description: description.join("\n"),
        grid,
        warnings,
    }
}
