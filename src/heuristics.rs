use crate::engine::{Board, Direction};

/// Bonus for keeping the board open: one point per empty cell.
///
/// # Examples
/// ```
/// use tilesearch::engine::Board;
/// use tilesearch::heuristics::empty_cell_bonus;
/// assert_eq!(empty_cell_bonus(&Board::new_empty()), 16);
/// ```
pub fn empty_cell_bonus(board: &Board) -> u64 {
    board.count_empty() as u64
}

/// Heuristic value of a search node: the running game score after the generating
/// move plus the empty-cell bonus of the resulting board.
pub fn node_score(move_score: u64, board: &Board) -> u64 {
    move_score + empty_cell_bonus(board)
}

/// Chooses a move by looking one move ahead without any random tile.
///
/// Each direction that changes the board is scored with [`node_score`] on the
/// merge score alone; the best one wins, earlier directions in
/// `Direction::ALL` winning ties.
///
/// # Returns
/// `None` if no direction changes the board.
pub fn choose_move_greedy(current_board: &Board) -> Option<Direction> {
    let mut best: Option<(u64, Direction)> = None;

    for dir in Direction::ALL {
        let mut next = *current_board;
        let mut merge_score = 0;
        if !next.apply_move(&mut merge_score, dir) {
            continue;
        }
        let value = node_score(merge_score, &next);
        if best.map_or(true, |(best_value, _)| value > best_value) {
            best = Some((value, dir));
        }
    }
    best.map(|(_, dir)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    #[test]
    fn test_node_score_adds_bonus() {
        let board = board_from_str_array(&["12..", "3..."]).unwrap();
        assert_eq!(empty_cell_bonus(&board), 13);
        assert_eq!(node_score(100, &board), 113);
    }

    #[test]
    fn test_greedy_prefers_merge() {
        // Left or right merges the pair; left comes first in enumeration order.
        let board = board_from_str_array(&["11..", "2...", "3...", "4..."]).unwrap();
        assert_eq!(choose_move_greedy(&board), Some(Direction::Left));
    }

    #[test]
    fn test_greedy_vertical_merge() {
        let board = board_from_str_array(&["1...", "1...", "....", "...."]).unwrap();
        // Left is a no-op, right only slides, up and down both merge.
        assert_eq!(choose_move_greedy(&board), Some(Direction::Up));
    }

    #[test]
    fn test_greedy_on_stuck_board() {
        let board = board_from_str_array(&["1212", "2121", "1212", "2121"]).unwrap();
        assert_eq!(choose_move_greedy(&board), None);
    }
}
