use std::iter::FusedIterator;

use super::{arena::Arena, level::LevelGenerator, node::Node, NodeId, RankedIndex};

/// Ascending iterator over a contiguous run of entries.
///
/// Walks level-0 forward links from the front and backward links from the back.
pub struct Iter<'a> {
    arena: &'a Arena,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(
        arena: &'a Arena,
        front: Option<NodeId>,
        back: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Iter {
            arena,
            front,
            back,
            remaining,
        }
    }

    pub(crate) fn empty(arena: &'a Arena) -> Self {
        Iter::new(arena, None, None, 0)
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let node = &arena[self.front?];
        self.front = node.forward(0);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let node = &arena[self.back?];
        self.back = node.backward;
        self.remaining -= 1;
        Some(node)
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

/// Seekable position in the index, in the style of a memtable iterator.
pub struct Cursor<'a, G: LevelGenerator> {
    index: &'a RankedIndex<G>,
    current: Option<NodeId>,
}

impl<'a, G: LevelGenerator> Cursor<'a, G> {
    pub(crate) fn new(index: &'a RankedIndex<G>) -> Self {
        Cursor {
            index,
            current: None,
        }
    }

    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    pub fn seek_to_first(&mut self) {
        self.current = self.index.first_id();
    }

    pub fn seek_to_last(&mut self) {
        self.current = self.index.tail_id();
    }

    /// Positions at the first entry `>= (score, member)`.
    pub fn seek(&mut self, score: f64, member: &str) {
        self.current = self.index.find_greater_or_equal(score, member);
    }

    /// # Panics
    ///
    /// Panics if the cursor is not valid.
    pub fn next(&mut self) {
        assert!(self.valid());
        self.current = self.current.and_then(|id| self.index.arena()[id].forward(0));
    }

    /// # Panics
    ///
    /// Panics if the cursor is not valid.
    pub fn prev(&mut self) {
        assert!(self.valid());
        self.current = self.current.and_then(|id| self.index.arena()[id].backward);
    }

    pub fn node(&self) -> Option<&'a Node> {
        let arena = self.index.arena();
        self.current.map(|id| &arena[id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> RankedIndex {
        let mut index = RankedIndex::with_seed(17);
        for (score, member) in [(1.0, "a"), (2.0, "b"), (2.0, "c"), (4.0, "d")] {
            index.insert(score, member);
        }
        index
    }

    #[test]
    fn test_iter_both_ends() {
        let index = build();
        let mut it = index.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next().unwrap().member(), "a");
        assert_eq!(it.next_back().unwrap().member(), "d");
        assert_eq!(it.len(), 2);
        assert_eq!(it.next().unwrap().member(), "b");
        assert_eq!(it.next_back().unwrap().member(), "c");
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
    }

    #[test]
    fn test_iter_empty() {
        let index = RankedIndex::new();
        assert_eq!(index.iter().count(), 0);
        assert!(index.iter().rev().next().is_none());
    }

    #[test]
    fn test_cursor() {
        let index = build();
        let mut c = index.cursor();
        assert!(!c.valid());
        assert!(c.node().is_none());

        c.seek_to_first();
        assert_eq!(c.node().unwrap().member(), "a");
        c.next();
        assert_eq!(c.node().unwrap().member(), "b");
        c.prev();
        assert_eq!(c.node().unwrap().member(), "a");
        c.prev();
        assert!(!c.valid());

        c.seek_to_last();
        assert_eq!(c.node().unwrap().member(), "d");
        c.next();
        assert!(!c.valid());

        c.seek(2.0, "bb");
        assert_eq!(c.node().unwrap().member(), "c");
        c.seek(2.0, "b");
        assert_eq!(c.node().unwrap().member(), "b");
        c.seek(0.0, "");
        assert_eq!(c.node().unwrap().member(), "a");
        c.seek(4.5, "");
        assert!(!c.valid());
    }

    #[test]
    #[should_panic]
    fn test_cursor_next_invalid() {
        let index = build();
        let mut c = index.cursor();
        c.next();
    }
}
