//! Search nodes and the per-search arena that owns them.
//!
//! Nodes refer to each other by [`NodeId`], an index into the [`Arena`]. Each node
//! records the id of its first-ply ancestor (its anchor) when it is created, so
//! score propagation never walks parent links. The arena lives for exactly one
//! search and releases every node at once when it is dropped.

use crate::engine::{Board, Direction};

/// Depth of the first-ply candidates, the nodes the decision is made among.
pub const DECISION_DEPTH: u32 = 1;

/// Upper bound on the node capacity reserved up front.
const MAX_PREALLOCATED_NODES: usize = 1 << 20;

/// Stable index of a node inside an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation order; the root is 0.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Snapshot of one board state reached during the search.
#[derive(Clone, Debug)]
pub struct Node {
    /// Owned copy of the board after the generating move and random tile.
    pub board: Board,
    /// Heuristic score. Fixed at creation, except on first-ply nodes where
    /// propagation folds descendant scores into it.
    pub score: u64,
    /// 0 for the root, 1 for first-ply candidates.
    pub depth: u32,
    /// Move that produced this node; `None` for the root.
    pub direction: Option<Direction>,
    pub parent: Option<NodeId>,
    /// First-ply ancestor: the node itself at depth 1, `None` for the root.
    pub anchor: Option<NodeId>,
    /// Direct children generated from this node.
    pub children: u32,
    /// Descendant scores folded into this node (first-ply nodes only).
    pub samples: u32,
}

impl Node {
    /// True for the candidates directly below the root.
    pub fn is_first_ply(&self) -> bool {
        self.depth == DECISION_DEPTH
    }
}

/// Flat owner of every node created during one search.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    /// Creates an arena sized for a search of `max_depth` plies.
    pub fn with_depth_hint(max_depth: u32) -> Self {
        let capacity = expected_node_count(max_depth).min(MAX_PREALLOCATED_NODES);
        Arena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Adds the synthetic root wrapping `board`: depth 0, score 0, no parent.
    pub fn add_root(&mut self, board: Board) -> NodeId {
        self.insert(Node {
            board,
            score: 0,
            depth: 0,
            direction: None,
            parent: None,
            anchor: None,
            children: 0,
            samples: 0,
        })
    }

    /// Adds a child of `parent` and returns its id.
    ///
    /// The child's depth is one more than the parent's. Its anchor is itself when it
    /// lands on the decision depth and the parent's anchor otherwise. The parent's
    /// direct child count is not touched here.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        score: u64,
        direction: Direction,
        board: Board,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent_node = &self.nodes[parent.0];
        let depth = parent_node.depth + 1;
        let anchor = if depth == DECISION_DEPTH {
            Some(id)
        } else {
            parent_node.anchor
        };

        self.insert(Node {
            board,
            score,
            depth,
            direction: Some(direction),
            parent: Some(parent),
            anchor,
            children: 0,
            samples: 0,
        })
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Number of nodes created so far, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over `(id, node)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}

/// Nodes a full search of `max_depth` plies can create, root included:
/// `b * (b^d - 1) / (b - 1) + 1` for branching factor `b`.
///
/// Saturates instead of overflowing for very deep searches.
pub fn expected_node_count(max_depth: u32) -> usize {
    let b = Direction::ALL.len();
    let layers = b
        .checked_pow(max_depth)
        .map(|p| (p - 1) / (b - 1))
        .unwrap_or(usize::MAX);
    layers.saturating_mul(b).saturating_add(1)
}
