use crate::engine::{Board, SIZE};
use crate::error::BoardParseError;

/// Parses an array of string slices into a `Board`.
///
/// Each string slice represents a row on the board, starting from row 0, and each
/// character is one cell's exponent:
/// - `'.'` or `'0'`: empty
/// - `'1'`..`'9'`: exponents 1 to 9
/// - `'a'`..`'f'` (either case): exponents 10 to 15
///
/// Missing rows and the tail of short rows are left empty.
///
/// # Errors
/// - [`BoardParseError::TooManyRows`] if more than `SIZE` rows are given.
/// - [`BoardParseError::RowTooLong`] if a row has more than `SIZE` characters.
/// - [`BoardParseError::UnrecognizedChar`] for any other character.
///
/// # Examples
/// ```
/// use tilesearch::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1.2", "..b"]).unwrap();
/// assert_eq!(board.get_tile(0, 0), 1);
/// assert_eq!(board.get_tile(0, 2), 2);
/// assert_eq!(board.get_tile(1, 2), 11);
/// assert_eq!(board.tile_value(1, 2), 2048);
/// assert_eq!(board.get_tile(3, 3), 0);
///
/// assert!(board_from_str_array(&["1x"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, BoardParseError> {
    if s.len() > SIZE {
        return Err(BoardParseError::TooManyRows {
            expected: SIZE,
            found: s.len(),
        });
    }

    let mut grid = [[0u8; SIZE]; SIZE];

    for (r, row_str) in s.iter().enumerate() {
        let len = row_str.chars().count();
        if len > SIZE {
            return Err(BoardParseError::RowTooLong {
                row: r,
                expected: SIZE,
                found: len,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            grid[r][c] = match ch {
                '.' => 0,
                _ => ch
                    .to_digit(16)
                    .ok_or(BoardParseError::UnrecognizedChar { ch, row: r, col: c })?
                    as u8,
            };
        }
    }
    Ok(Board::from_grid(grid))
}

/// Renders a board in the format read by [`board_from_str_array`], one string per row.
pub fn board_to_strings(board: &Board) -> Vec<String> {
    board
        .get_grid()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&exponent| match exponent {
                    0 => '.',
                    e => char::from_digit(e as u32, 16).unwrap_or('?'),
                })
                .collect()
        })
        .collect()
}
