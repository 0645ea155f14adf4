//! Core game engine for the sliding-tile puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Direction`: The four moves a player (or the solver) can make.
//! - `Board`: The square grid of tile exponents, with the slide-and-merge rule,
//!   random tile placement, empty-cell counting and terminal detection.
//! - `Game`: Manages the overall game state, including score, steps, history (for undo),
//!   and processing player moves.
use rand::Rng;
use std::fmt;

/// Defines the size of the game board (width and height).
/// The board is always square, so a `SIZE` of 4 means a 4x4 grid.
pub const SIZE: usize = 4;

/// Base of the displayed tile values. A cell holding exponent `e` shows `BASE^e`.
pub const BASE: u64 = 2;

/// A direction to slide and merge tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in the fixed enumeration order used by the solver.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Maps a keyboard character to a direction.
    ///
    /// Both the `wasd` and the vi-style `hjkl` layouts are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilesearch::engine::Direction;
    /// assert_eq!(Direction::from_key('a'), Some(Direction::Left));
    /// assert_eq!(Direction::from_key('j'), Some(Direction::Down));
    /// assert_eq!(Direction::from_key('x'), None);
    /// ```
    pub fn from_key(key: char) -> Option<Direction> {
        match key {
            'a' | 'h' => Some(Direction::Left),
            'd' | 'l' => Some(Direction::Right),
            'w' | 'k' => Some(Direction::Up),
            's' | 'j' => Some(Direction::Down),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Exponent 1 (90%) or exponent 2 (10%).
fn generate_random_exponent<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    if rng.gen_range(0..10u8) < 9 {
        1
    } else {
        2
    }
}

/// Represents the game board as a 2D grid of tile exponents.
///
/// A cell holds 0 when empty, otherwise the exponent `e` of the tile value `BASE^e`.
/// Boards are small plain values; every copy is independent of the original.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[u8; SIZE]; SIZE],
}

impl Board {
    /// Creates a new board with every cell empty.
    ///
    /// # Examples
    /// ```
    /// use tilesearch::engine::Board;
    /// let board = Board::new_empty();
    /// assert_eq!(board.get_tile(0, 0), 0);
    /// assert_eq!(board.count_empty(), 16);
    /// ```
    pub fn new_empty() -> Self {
        Board {
            grid: [[0; SIZE]; SIZE],
        }
    }

    /// Creates a new board from a predefined grid of exponents.
    pub fn from_grid(initial_grid: [[u8; SIZE]; SIZE]) -> Self {
        Board { grid: initial_grid }
    }

    /// Returns the exponent at row `r`, column `c` (0 for an empty cell).
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board dimensions.
    pub fn get_tile(&self, r: usize, c: usize) -> u8 {
        self.grid[r][c]
    }

    /// Sets the exponent at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board dimensions.
    pub fn set_tile(&mut self, r: usize, c: usize, exponent: u8) {
        self.grid[r][c] = exponent;
    }

    /// Returns an immutable reference to the underlying grid.
    pub fn get_grid(&self) -> &[[u8; SIZE]; SIZE] {
        &self.grid
    }

    /// Returns the displayed value of the tile at (`r`, `c`), or 0 when empty.
    pub fn tile_value(&self, r: usize, c: usize) -> u64 {
        exponent_value(self.grid[r][c])
    }

    /// Slides and merges every line of the board toward `dir`.
    ///
    /// Tiles move as far as they can; two equal neighbours merge into one tile
    /// of the next exponent, and a tile produced by a merge does not merge again
    /// in the same move. Each merge producing exponent `e` adds `BASE^e` to `score`.
    ///
    /// # Returns
    /// `true` if the board changed, `false` if the move was a no-op.
    ///
    /// # Examples
    /// ```
    /// use tilesearch::engine::{Board, Direction};
    /// let mut board = Board::new_empty();
    /// board.set_tile(0, 0, 1);
    /// board.set_tile(0, 3, 1);
    /// let mut score = 0;
    /// assert!(board.apply_move(&mut score, Direction::Left));
    /// assert_eq!(board.get_tile(0, 0), 2);
    /// assert_eq!(score, 4);
    /// assert!(!board.apply_move(&mut score, Direction::Left));
    /// ```
    pub fn apply_move(&mut self, score: &mut u64, dir: Direction) -> bool {
        let mut changed = false;
        for line_idx in 0..SIZE {
            let cells = line_cells(dir, line_idx);
            let mut line = [0u8; SIZE];
            for (slot, &(r, c)) in line.iter_mut().zip(cells.iter()) {
                *slot = self.grid[r][c];
            }

            let (slid, gained) = slide_line(&line);
            if slid != line {
                changed = true;
                for (&value, &(r, c)) in slid.iter().zip(cells.iter()) {
                    self.grid[r][c] = value;
                }
            }
            *score += gained;
        }
        changed
    }

    /// Places a new tile on a uniformly chosen empty cell.
    ///
    /// The new tile has exponent 1 nine times out of ten and exponent 2 otherwise.
    /// A full board is left untouched.
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let empty = self.count_empty();
        if empty == 0 {
            return;
        }
        let mut index = rng.gen_range(0..empty);
        let exponent = generate_random_exponent(rng);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.grid[r][c] == 0 {
                    if index == 0 {
                        self.grid[r][c] = exponent;
                        return;
                    }
                    index -= 1;
                }
            }
        }
    }

    /// Counts the empty cells on the board.
    pub fn count_empty(&self) -> u32 {
        self.grid
            .iter()
            .flatten()
            .filter(|&&exponent| exponent == 0)
            .count() as u32
    }

    /// Returns true if no direction changes the board.
    pub fn is_terminal(&self) -> bool {
        Direction::ALL.iter().all(|&dir| {
            let mut probe = *self;
            let mut ignored = 0;
            !probe.apply_move(&mut ignored, dir)
        })
    }

    /// Returns the largest exponent on the board (0 for an empty board).
    pub fn max_tile(&self) -> u8 {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Displayed value of an exponent; 0 stays 0.
pub fn exponent_value(exponent: u8) -> u64 {
    if exponent == 0 {
        0
    } else {
        BASE.pow(exponent as u32)
    }
}

// Cells of one line listed in the order tiles travel toward, nearest first.
fn line_cells(dir: Direction, line_idx: usize) -> [(usize, usize); SIZE] {
    let mut cells = [(0, 0); SIZE];
    for (i, cell) in cells.iter_mut().enumerate() {
        *cell = match dir {
            Direction::Left => (line_idx, i),
            Direction::Right => (line_idx, SIZE - 1 - i),
            Direction::Up => (i, line_idx),
            Direction::Down => (SIZE - 1 - i, line_idx),
        };
    }
    cells
}

// Slides one line toward index 0, returning the new line and the merge score.
fn slide_line(line: &[u8; SIZE]) -> ([u8; SIZE], u64) {
    let mut out = [0u8; SIZE];
    let mut len = 0;
    let mut last_merged = false;
    let mut gained = 0;

    for &exponent in line.iter().filter(|&&e| e != 0) {
        if len > 0 && !last_merged && out[len - 1] == exponent {
            out[len - 1] += 1;
            gained += exponent_value(out[len - 1]);
            last_merged = true;
        } else {
            out[len] = exponent;
            len += 1;
            last_merged = false;
        }
    }
    (out, gained)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..SIZE {
            write!(f, "{:>6}", c)?;
        }
        for r in 0..SIZE {
            write!(f, "\n{:<2}", r)?;
            for c in 0..SIZE {
                match self.grid[r][c] {
                    0 => write!(f, "{:>6}", '.')?,
                    e => write!(f, "{:>6}", exponent_value(e))?,
                }
            }
        }
        Ok(())
    }
}

/// Manages the state and progression of a game session.
///
/// This struct encapsulates the game board, current score, number of steps (moves) taken,
/// and a history of game states. The history allows for undoing moves.
///
/// # Examples
/// ```
/// use tilesearch::engine::{Direction, Game};
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let mut game = Game::new(&mut rng);
/// assert_eq!(game.board().count_empty(), 14);
///
/// for dir in Direction::ALL {
///     if game.process_move(dir, &mut rng) {
///         break;
///     }
/// }
/// assert_eq!(game.steps(), 1);
/// assert!(game.undo_last_move());
/// assert_eq!(game.steps(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current_score: u64,
    steps: u32,
    history: Vec<(Board, u64, u32)>, // (board, score, steps) after each move, for undo
}

impl Game {
    /// Creates a new game: an empty board with two random tiles, score 0.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut initial_board = Board::new_empty();
        initial_board.add_random_tile(rng);
        initial_board.add_random_tile(rng);
        Game::new_with_board(initial_board)
    }

    /// Creates a new game with a specified initial board state.
    pub fn new_with_board(initial_board: Board) -> Self {
        Game {
            board: initial_board,
            current_score: 0,
            steps: 0,
            history: vec![(initial_board, 0, 0)],
        }
    }

    /// Returns an immutable reference to the current game board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current score of the game.
    pub fn score(&self) -> u64 {
        self.current_score
    }

    /// Returns the number of moves (steps) taken so far in the game.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Processes a move in direction `dir`.
    ///
    /// If the move changes the board, the merge score is added, a random tile is
    /// placed, the step counter advances and the new state is saved for undo.
    ///
    /// # Returns
    /// `true` if the move changed the board, `false` if it was a no-op.
    pub fn process_move(&mut self, dir: Direction, rng: &mut impl Rng) -> bool {
        if !self.board.apply_move(&mut self.current_score, dir) {
            return false;
        }
        self.board.add_random_tile(rng);
        self.steps += 1;
        self.history
            .push((self.board, self.current_score, self.steps));
        true
    }

    /// Undoes the last move made in the game, reverting to the previous state.
    ///
    /// # Returns
    /// `false` if no moves have been made yet, meaning there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        if let Some(&(prev_board, prev_score, prev_steps)) = self.history.last() {
            self.board = prev_board;
            self.current_score = prev_score;
            self.steps = prev_steps;
        }
        true
    }

    /// The game is over when no direction changes the board.
    pub fn is_game_over(&self) -> bool {
        self.board.is_terminal()
    }
}
