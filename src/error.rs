//! Error handling types and utilities.

use std::fmt;

/// A specialized Result type for doxsearch operations outside the parser.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Location of a problem inside a search-index artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the artifact
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Position {
    pub(crate) const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error returned when a search-index artifact cannot be loaded.
///
/// Loading is all-or-nothing: when this is returned no store was built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input at {position}, expected {expected}")]
    UnexpectedEof {
        position: Position,
        expected: &'static str,
    },

    #[error("unexpected character {found:?} at {position}, expected {expected}")]
    UnexpectedChar {
        found: char,
        position: Position,
        expected: &'static str,
    },

    #[error("bracket opened at {opened} closed by {found:?} at {position}")]
    MismatchedBracket {
        opened: Position,
        found: char,
        position: Position,
    },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("invalid escape sequence at {position}")]
    InvalidEscape { position: Position },

    #[error("unexpected trailing input at {position}")]
    TrailingInput { position: Position },

    #[error("arrays nested too deeply at {position}")]
    NestingTooDeep { position: Position },

    #[error("expected an array of records, found {found}")]
    NotARecordList { found: &'static str },

    /// `record` is the 1-based position of the record in the artifact.
    #[error("record {record}: {reason}")]
    InvalidRecord { record: usize, reason: String },
}

impl ParseError {
    pub(crate) fn record(record: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            record,
            reason: reason.into(),
        }
    }

    /// Position in the artifact where the problem was detected, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedEof { position, .. }
            | Self::UnexpectedChar { position, .. }
            | Self::MismatchedBracket { position, .. }
            | Self::UnterminatedString { position }
            | Self::InvalidEscape { position }
            | Self::TrailingInput { position }
            | Self::NestingTooDeep { position } => Some(*position),
            Self::NotARecordList { .. } | Self::InvalidRecord { .. } => None,
        }
    }
}
