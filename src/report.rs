//! End-of-run statistics for solver-driven games.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::engine::exponent_value;

// Stand-in divisor when the measured search time rounds to zero.
const EPSILON: f64 = 1e-6;

/// Summary of one solver-driven game, written out when the game ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub max_depth: u32,
    pub nodes_generated: u64,
    pub nodes_expanded: u64,
    /// Total time spent choosing moves.
    pub search_time: Duration,
    /// Largest exponent on the final board.
    pub max_tile: u8,
    pub score: u64,
}

impl RunReport {
    /// Expanded nodes per second of search time.
    ///
    /// A time below one microsecond is treated as one microsecond, so the
    /// result is always finite.
    pub fn expanded_per_second(&self) -> f64 {
        let seconds = self.search_time.as_secs_f64();
        let divisor = if seconds.abs() < EPSILON { EPSILON } else { seconds };
        self.nodes_expanded as f64 / divisor
    }

    /// Writes the report to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MaxDepth = {}", self.max_depth)?;
        writeln!(f, "Generated = {}", self.nodes_generated)?;
        writeln!(f, "Expanded = {}", self.nodes_expanded)?;
        writeln!(f, "Time = {:.2} seconds", self.search_time.as_secs_f64())?;
        writeln!(f, "Expanded/Second = {:.2}", self.expanded_per_second())?;
        writeln!(f, "max_tile = {}", exponent_value(self.max_tile))?;
        writeln!(f, "Score = {}", self.score)
    }
}
