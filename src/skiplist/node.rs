use super::arena::NodeId;

/// One entry of a node's tower.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct Level {
    pub(crate) forward: Option<NodeId>,
    /// Level-0 steps covered by `forward`, counting the destination.
    pub(crate) span: u64,
}

/// A stored `(score, member)` entry.
#[derive(Debug)]
pub struct Node {
    score: f64,
    member: String,
    pub(crate) backward: Option<NodeId>,
    pub(crate) levels: Vec<Level>,
}

impl Node {
    pub(crate) fn new(score: f64, member: String, height: usize) -> Node {
        Node {
            score,
            member,
            backward: None,
            levels: vec![Level::default(); height],
        }
    }

    pub(crate) fn header(height: usize) -> Node {
        Node::new(0.0, String::new(), height)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    /// Number of levels this node participates in.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn forward(&self, level: usize) -> Option<NodeId> {
        self.levels[level].forward
    }

    pub(crate) fn span(&self, level: usize) -> u64 {
        self.levels[level].span
    }
}
