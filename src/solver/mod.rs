//! Depth-bounded move selection.
//!
//! The solver builds every board reachable from the current one within
//! `max_depth` moves, sampling a single random tile after each move. Nodes are
//! expanded in score order from a [`Worklist`] until it runs dry; every new node
//! folds its score into its first-ply ancestor according to the [`Propagation`]
//! policy, and the best first-ply candidate decides the move.
//!
//! Quick start
//! ```
//! use tilesearch::engine::Game;
//! use tilesearch::solver::{Propagation, SearchConfig, Solver};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let game = Game::new(&mut rng);
//!
//! let mut solver = Solver::with_config(SearchConfig {
//!     max_depth: 3,
//!     propagation: Propagation::Max,
//! });
//! let outcome = solver.get_next_move(game.board(), &mut rng).unwrap();
//! assert!(outcome.nodes_expanded <= outcome.nodes_generated + 1);
//! ```

use log::{debug, trace, warn};
use rand::Rng;

use crate::engine::{Board, Direction};
use crate::error::SearchError;
use crate::heuristics::node_score;

pub mod node;
pub mod propagation;
pub mod worklist;

#[cfg(test)]
mod tests;

pub use node::{Arena, Node, NodeId, DECISION_DEPTH};
pub use propagation::{propagate_score, Propagation};
pub use worklist::Worklist;

/// Search parameters. Defaults to a depth of 6 with max propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest node depth that is created. 0 picks a uniformly random move.
    pub max_depth: u32,
    pub propagation: Propagation,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            propagation: Propagation::Max,
        }
    }
}

/// Result of one move selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub direction: Direction,
    /// Moves attempted during expansion, including no-op ones.
    pub nodes_generated: u64,
    /// Nodes taken off the worklist, root included.
    pub nodes_expanded: u64,
}

/// Totals accumulated over every search a [`Solver`] has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub searches: u64,
    pub nodes_generated: u64,
    pub nodes_expanded: u64,
    /// Largest number of nodes held by a single search.
    pub peak_nodes: u64,
}

/// Every node created by one search, plus the bookkeeping needed to decide.
///
/// Dropping the tree releases all of its nodes at once.
#[derive(Debug)]
pub struct SearchTree {
    arena: Arena,
    root: NodeId,
    candidates: Vec<NodeId>,
    nodes_generated: u64,
    nodes_expanded: u64,
}

impl SearchTree {
    fn new(board: Board, max_depth: u32) -> Self {
        let mut arena = Arena::with_depth_hint(max_depth);
        let root = arena.add_root(board);
        SearchTree {
            arena,
            root,
            candidates: Vec::with_capacity(Direction::ALL.len()),
            nodes_generated: 0,
            nodes_expanded: 0,
        }
    }

    /// Returns the arena holding every node of this search, root included.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the id of the root node, built from the searched board.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// First-ply nodes in creation order.
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    /// Returns the number of moves attempted, four per expanded node shallower
    /// than the depth limit. The root is never counted here.
    pub fn nodes_generated(&self) -> u64 {
        self.nodes_generated
    }

    /// Returns the number of nodes popped from the worklist, root included.
    /// Always equal to `arena().len()`.
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Creates the children of `current`, one per direction that changes its board.
    ///
    /// Each attempted direction counts as a generated node. A child gets one random
    /// tile, the score `current.score + merge score + empty cells`, and is queued and
    /// propagated to its anchor straight away.
    fn expand<R: Rng + ?Sized>(
        &mut self,
        worklist: &mut Worklist,
        current: NodeId,
        propagation: Propagation,
        rng: &mut R,
    ) {
        // Read once: a first-ply score changes as its own children propagate.
        let (parent_board, parent_score) = {
            let node = self.arena.get(current);
            (node.board, node.score)
        };

        for dir in Direction::ALL {
            let mut board = parent_board;
            let mut score = parent_score;
            let moved = board.apply_move(&mut score, dir);
            self.nodes_generated += 1;
            if !moved {
                continue;
            }

            board.add_random_tile(rng);
            let child_score = node_score(score, &board);
            let child = self.arena.add_child(current, child_score, dir, board);
            self.arena.get_mut(current).children += 1;

            if self.arena.get(child).is_first_ply() {
                self.candidates.push(child);
            }
            worklist.push(child, child_score);
            propagate_score(&mut self.arena, child, propagation);
        }

        trace!(
            "expanded node {} at depth {}: {} children",
            current.index(),
            self.arena.get(current).depth,
            self.arena.get(current).children
        );
    }
}

/// Picks the direction of the highest-scoring candidate, breaking ties uniformly
/// at random.
///
/// # Errors
/// [`SearchError::NoMoveAvailable`] if `candidates` is empty.
pub fn best_action<R: Rng + ?Sized>(
    arena: &Arena,
    candidates: &[NodeId],
    rng: &mut R,
) -> Result<Direction, SearchError> {
    let max = candidates
        .iter()
        .map(|&id| arena.get(id).score)
        .max()
        .ok_or(SearchError::NoMoveAvailable)?;

    let ties: Vec<Direction> = candidates
        .iter()
        .map(|&id| arena.get(id))
        .filter(|node| node.score == max)
        .filter_map(|node| node.direction)
        .collect();
    if ties.is_empty() {
        return Err(SearchError::NoMoveAvailable);
    }
    Ok(ties[rng.gen_range(0..ties.len())])
}

/// Move selector holding the search configuration, the reusable worklist storage
/// and running statistics.
#[derive(Debug, Default)]
pub struct Solver {
    config: SearchConfig,
    worklist: Worklist,
    stats: SearchStats,
}

impl Solver {
    /// Creates a solver with the default [`SearchConfig`].
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Creates a solver with an explicit configuration and empty statistics.
    ///
    /// # Arguments
    /// * `config`: Depth limit and propagation policy used by every search.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            worklist: Worklist::new(),
            stats: SearchStats::default(),
        }
    }

    /// Returns the configuration this solver searches with.
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Returns the totals accumulated since creation or the last [`Solver::reset_stats`].
    ///
    /// # Returns
    /// A copy of the running [`SearchStats`]. Depth-0 moves are not counted.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Zeroes the accumulated statistics. The configuration is unchanged.
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// True when no node is pending; holds after every call.
    pub fn worklist_is_empty(&self) -> bool {
        self.worklist.is_empty()
    }

    /// Builds the full search tree below `board` without choosing a move.
    ///
    /// The root is queued first; nodes are popped highest score first and those
    /// shallower than `max_depth` are expanded, until the worklist is empty.
    pub fn search<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> SearchTree {
        let SearchConfig {
            max_depth,
            propagation,
        } = self.config;

        let mut tree = SearchTree::new(*board, max_depth);
        self.worklist.reset();
        self.worklist.push(tree.root, 0);

        while let Some(current) = self.worklist.pop_max() {
            tree.nodes_expanded += 1;
            if tree.arena.get(current).depth < max_depth {
                tree.expand(&mut self.worklist, current, propagation, rng);
            }
        }

        self.stats.searches += 1;
        self.stats.nodes_generated += tree.nodes_generated;
        self.stats.nodes_expanded += tree.nodes_expanded;
        self.stats.peak_nodes = self.stats.peak_nodes.max(tree.arena.len() as u64);
        tree
    }

    /// Chooses the next move for `board`.
    ///
    /// With `max_depth == 0` a uniformly random direction is returned without any
    /// search and both node counts are zero.
    ///
    /// # Errors
    /// [`SearchError::NoMoveAvailable`] if no direction changes the board.
    pub fn get_next_move<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        rng: &mut R,
    ) -> Result<SearchOutcome, SearchError> {
        if self.config.max_depth == 0 {
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            return Ok(SearchOutcome {
                direction,
                nodes_generated: 0,
                nodes_expanded: 0,
            });
        }

        let tree = self.search(board, rng);
        let direction = match best_action(&tree.arena, &tree.candidates, rng) {
            Ok(direction) => direction,
            Err(err) => {
                warn!("no candidate move after expanding the root: board is stuck");
                return Err(err);
            }
        };

        debug!(
            "depth {} ({}) chose {}: {} generated, {} expanded, {} candidates",
            self.config.max_depth,
            self.config.propagation,
            direction,
            tree.nodes_generated,
            tree.nodes_expanded,
            tree.candidates.len()
        );

        Ok(SearchOutcome {
            direction,
            nodes_generated: tree.nodes_generated,
            nodes_expanded: tree.nodes_expanded,
        })
    }
}

/// One-shot move selection with a fresh [`Solver`].
///
/// # Examples
/// ```
/// use tilesearch::engine::{Board, Direction};
/// use tilesearch::solver::{get_next_move, Propagation};
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut board = Board::new_empty();
/// board.set_tile(0, 0, 1);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let outcome = get_next_move(&board, 1, Propagation::Max, &mut rng).unwrap();
/// assert!(matches!(outcome.direction, Direction::Right | Direction::Down));
/// assert_eq!(outcome.nodes_generated, 4);
/// ```
pub fn get_next_move<R: Rng + ?Sized>(
    board: &Board,
    max_depth: u32,
    propagation: Propagation,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError> {
    Solver::with_config(SearchConfig {
        max_depth,
        propagation,
    })
    .get_next_move(board, rng)
}
