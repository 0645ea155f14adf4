//! Error types returned by the library.

/// Errors that can occur while choosing a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Every first-ply direction left the board unchanged, so there is nothing to choose.
    #[error("no move available: every direction leaves the board unchanged")]
    NoMoveAvailable,
}

/// Errors that can occur while parsing a board from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("Invalid number of rows. Expected at most {expected}, found {found}")]
    TooManyRows { expected: usize, found: usize },

    #[error("Row {row} is too long. Expected at most {expected} characters, found {found}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },
}
