//! Folding descendant scores into their first-ply ancestor.

use std::fmt;

use super::node::{Arena, NodeId, DECISION_DEPTH};

/// How descendant scores are combined into a first-ply candidate's score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Propagation {
    /// Keep the best score seen anywhere in the subtree.
    #[default]
    Max,
    /// Keep the running integer mean of every descendant score.
    #[value(name = "avg", alias = "average")]
    Average,
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Propagation::Max => f.write_str("max"),
            Propagation::Average => f.write_str("avg"),
        }
    }
}

/// Folds the score of the freshly created node `id` into its first-ply anchor.
///
/// First-ply nodes are their own anchor and are left alone. Every deeper node
/// counts as one more sample for the anchor, then:
/// - `Max` raises the anchor's score to the node's score if it is higher;
/// - `Average` replaces it on the first sample and otherwise updates the
///   running mean `(score * (samples - 1) + new) / samples`, truncating.
pub fn propagate_score(arena: &mut Arena, id: NodeId, propagation: Propagation) {
    let node = arena.get(id);
    if node.depth <= DECISION_DEPTH {
        return;
    }
    let new_score = node.score;
    let Some(anchor_id) = node.anchor else {
        return;
    };

    let anchor = arena.get_mut(anchor_id);
    anchor.samples += 1;

    match propagation {
        Propagation::Max => {
            if new_score > anchor.score {
                anchor.score = new_score;
            }
        }
        Propagation::Average => {
            let samples = anchor.samples as u64;
            if samples == 1 {
                anchor.score = new_score;
            } else {
                anchor.score = (anchor.score * (samples - 1) + new_score) / samples;
            }
        }
    }
}
