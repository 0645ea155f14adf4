//! # Tilesearch
//!
//! This library provides the core game logic for a sliding-tile merge puzzle
//! (the 2048 family) and a depth-bounded tree-search solver that picks the next move.
//!
//! It is used by three binaries:
//! - `human_player`: Allows interactive gameplay via the command line.
//! - `ai_solver`: Plays a whole game with the solver at a given depth and propagation
//!   mode, then writes the run statistics to a file.
//! - `depth_evaluator`: Compares search depths and propagation modes over seeded games.
//!
//! ## Modules
//! - `engine`: The board (`Board`), moves (`Direction`) and game state (`Game`),
//!   with the slide-and-merge rule, random tile placement and terminal detection.
//! - `solver`: The search itself: node arena, worklist, score propagation and
//!   `get_next_move`.
//! - `heuristics`: Node scoring and a one-move greedy baseline.
//! - `report`: The statistics written at the end of a solver-driven game.
//! - `utils`: Parsing boards from text.
//! - `error`: Error types.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod report;
pub mod solver;
pub mod utils;
