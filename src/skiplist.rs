//! Rank-queryable skiplist over `(score, member)` entries.
//!
//! Every node carries a tower of forward links. Each link also records its
//! span: how many level-0 steps it jumps. Summing the spans crossed on the
//! way down from the header gives an entry's 1-based rank, and walking the
//! spans down from a rank finds the entry, both in expected `O(log n)`.
//!
//! ```text
//! level 2: head ----------3---------> (300, c) ----> nil
//! level 1: head --1--> (100, a) --2--> (300, c) ----> nil
//! level 0: head --1--> (100, a) --1--> (200, b) --1--> (300, c) ----> nil
//! ```
//!
//! Nodes live in an arena and link to each other through [`NodeId`]
//! handles. The index is single-threaded; callers that share it must wrap it
//! in their own lock.

mod arena;
mod iter;
mod level;
mod node;

use std::{cmp::Ordering, collections::HashMap, fmt, sync::Arc};

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    cmp::{compare_entry, BitWiseComparator, Comparator},
    error::{Error, Result},
    options::{Options, MAX_LEVEL, MAX_LEVEL_LIMIT, P},
};

use arena::Arena;

pub use arena::NodeId;
pub use iter::{Cursor, Iter};
pub use level::{GeometricLevelGenerator, LevelGenerator};
pub use node::Node;

pub struct RankedIndex<G: LevelGenerator = GeometricLevelGenerator> {
    arena: Arena,
    header: NodeId,
    tail: Option<NodeId>,
    length: u64,
    height: usize,
    max_level: usize,
    comparator: Arc<dyn Comparator>,
    generator: G,
}

impl RankedIndex {
    /// Empty index with the default options and an entropy-seeded generator.
    pub fn new() -> Self {
        RankedIndex::with_generator(
            Arc::new(BitWiseComparator {}),
            GeometricLevelGenerator::new(MAX_LEVEL, P, StdRng::from_entropy()),
        )
    }

    /// Empty index whose tower heights are reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        RankedIndex::with_generator(
            Arc::new(BitWiseComparator {}),
            GeometricLevelGenerator::new(MAX_LEVEL, P, StdRng::seed_from_u64(seed)),
        )
    }

    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        debug!(
            "ranked index: max_level={} p={} seeded={} comparator={}",
            options.max_level,
            options.probability,
            options.seed.is_some(),
            options.comparator.name()
        );
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generator = GeometricLevelGenerator::new(options.max_level, options.probability, rng);
        Ok(RankedIndex::with_generator(options.comparator, generator))
    }
}

impl Default for RankedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: LevelGenerator> RankedIndex<G> {
    /// Empty index drawing tower heights from `generator`.
    ///
    /// The header tower is `generator.total()` levels tall, capped at 64.
    pub fn with_generator(comparator: Arc<dyn Comparator>, generator: G) -> Self {
        let max_level = generator.total().clamp(1, MAX_LEVEL_LIMIT);
        let mut arena = Arena::with_capacity(16);
        let header = arena.alloc(Node::header(max_level));
        RankedIndex {
            arena,
            header,
            tail: None,
            length: 0,
            height: 1,
            max_level,
            comparator,
            generator,
        }
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of levels currently in use, at least 1.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id == self.header {
            return None;
        }
        self.arena.get(id)
    }

    pub fn first(&self) -> Option<&Node> {
        self.arena[self.header]
            .forward(0)
            .map(|id| &self.arena[id])
    }

    pub fn last(&self) -> Option<&Node> {
        self.tail.map(|id| &self.arena[id])
    }

    pub fn contains(&self, score: f64, member: &str) -> bool {
        self.get_rank(score, member).is_some()
    }

    fn compare(&self, id: NodeId, score: f64, member: &str) -> Ordering {
        let node = &self.arena[id];
        compare_entry(
            self.comparator.as_ref(),
            (node.score(), node.member()),
            (score, member),
        )
    }

    /// Inserts `(score, member)` and returns a handle to the new node.
    ///
    /// Duplicates are not rejected; keeping pairs unique is up to the caller.
    pub fn insert(&mut self, score: f64, member: impl Into<String>) -> NodeId {
        let member = member.into();
        let mut update = vec![self.header; self.max_level];
        let mut rank = vec![0u64; self.max_level];

        let mut x = self.header;
        for i in (0..self.height).rev() {
            // Each level starts from the rank reached one level up.
            if i + 1 < self.height {
                rank[i] = rank[i + 1];
            }
            while let Some(next) = self.arena[x].forward(i) {
                if self.compare(next, score, &member) != Ordering::Less {
                    break;
                }
                rank[i] += self.arena[x].span(i);
                x = next;
            }
            update[i] = x;
        }

        let level = self.generator.random_level().clamp(1, self.max_level);
        if level > self.height {
            let header = self.header;
            for i in self.height..level {
                rank[i] = 0;
                update[i] = header;
                self.arena[header].levels[i].span = self.length;
            }
            trace!("height {} -> {}", self.height, level);
            self.height = level;
        }

        let id = self.arena.alloc(Node::new(score, member, level));
        for i in 0..level {
            let prev = &mut self.arena[update[i]].levels[i];
            let (forward, span) = (prev.forward, prev.span);
            prev.forward = Some(id);
            prev.span = rank[0] - rank[i] + 1;

            let new = &mut self.arena[id].levels[i];
            new.forward = forward;
            new.span = span - (rank[0] - rank[i]);
        }

        // Levels the new node does not reach still pass over it.
        for i in level..self.height {
            self.arena[update[i]].levels[i].span += 1;
        }

        self.arena[id].backward = if update[0] == self.header {
            None
        } else {
            Some(update[0])
        };
        match self.arena[id].forward(0) {
            Some(next) => self.arena[next].backward = Some(id),
            None => self.tail = Some(id),
        }

        self.length += 1;
        id
    }

    /// Removes the entry equal to `(score, member)`.
    ///
    /// Returns [`Error::NotFound`] and leaves the index untouched when no
    /// such entry exists. With duplicates, one of the equal nodes is removed.
    pub fn delete(&mut self, score: f64, member: &str) -> Result<()> {
        let mut update = vec![self.header; self.max_level];

        let mut x = self.header;
        for i in (0..self.height).rev() {
            while let Some(next) = self.arena[x].forward(i) {
                if self.compare(next, score, member) != Ordering::Less {
                    break;
                }
                x = next;
            }
            update[i] = x;
        }

        match self.arena[x].forward(0) {
            Some(candidate) if self.compare(candidate, score, member) == Ordering::Equal => {
                self.delete_node(candidate, &update);
                Ok(())
            }
            _ => {
                trace!("delete miss: score={} member={:?}", score, member);
                Err(Error::NotFound {
                    score,
                    member: member.to_owned(),
                })
            }
        }
    }

    fn delete_node(&mut self, id: NodeId, update: &[NodeId]) {
        for i in 0..self.height {
            let removed = if i < self.arena[id].height() {
                Some(self.arena[id].levels[i])
            } else {
                None
            };
            let prev = &mut self.arena[update[i]].levels[i];
            match removed {
                Some(level) if prev.forward == Some(id) => {
                    prev.forward = level.forward;
                    prev.span = prev.span + level.span - 1;
                }
                _ => prev.span -= 1,
            }
        }

        let backward = self.arena[id].backward;
        match self.arena[id].forward(0) {
            Some(next) => self.arena[next].backward = backward,
            None => self.tail = backward,
        }

        let before = self.height;
        while self.height > 1 && self.arena[self.header].forward(self.height - 1).is_none() {
            self.height -= 1;
        }
        if self.height != before {
            trace!("height {} -> {}", before, self.height);
        }

        self.length -= 1;
        self.arena.free(id);
    }

    /// 1-based rank of `(score, member)`, or `None` if it is not stored.
    pub fn get_rank(&self, score: f64, member: &str) -> Option<u64> {
        let mut rank = 0u64;
        let mut x = self.header;
        for i in (0..self.height).rev() {
            while let Some(next) = self.arena[x].forward(i) {
                if self.compare(next, score, member) == Ordering::Greater {
                    break;
                }
                rank += self.arena[x].span(i);
                x = next;
            }
            if x != self.header && self.compare(x, score, member) == Ordering::Equal {
                return Some(rank);
            }
        }
        None
    }

    /// The entry at 1-based `rank`, or `None` when `rank` is 0 or past the end.
    pub fn get_element_by_rank(&self, rank: u64) -> Option<&Node> {
        self.find_by_rank(rank).map(|id| &self.arena[id])
    }

    pub(crate) fn find_by_rank(&self, rank: u64) -> Option<NodeId> {
        if rank == 0 || rank > self.length {
            return None;
        }

        let mut remaining = rank;
        let mut x = self.header;
        for i in (0..self.height).rev() {
            loop {
                let level = self.arena[x].levels[i];
                match level.forward {
                    Some(next) if level.span <= remaining => {
                        remaining -= level.span;
                        x = next;
                    }
                    _ => break,
                }
            }
            if remaining == 0 {
                return Some(x);
            }
        }
        None
    }

    /// First node `>= (score, member)`.
    pub(crate) fn find_greater_or_equal(&self, score: f64, member: &str) -> Option<NodeId> {
        let mut x = self.header;
        for i in (0..self.height).rev() {
            while let Some(next) = self.arena[x].forward(i) {
                if self.compare(next, score, member) != Ordering::Less {
                    break;
                }
                x = next;
            }
        }
        self.arena[x].forward(0)
    }

    /// First node with a score `>= min`, with its rank.
    fn first_in_score_range(&self, min: f64) -> Option<(u64, NodeId)> {
        let mut rank = 0u64;
        let mut x = self.header;
        for i in (0..self.height).rev() {
            while let Some(next) = self.arena[x].forward(i) {
                if self.arena[next].score().total_cmp(&min) != Ordering::Less {
                    break;
                }
                rank += self.arena[x].span(i);
                x = next;
            }
        }
        self.arena[x].forward(0).map(|id| (rank + 1, id))
    }

    /// Last node with a score `<= max`, with its rank.
    fn last_in_score_range(&self, max: f64) -> Option<(u64, NodeId)> {
        let mut rank = 0u64;
        let mut x = self.header;
        for i in (0..self.height).rev() {
            while let Some(next) = self.arena[x].forward(i) {
                if self.arena[next].score().total_cmp(&max) == Ordering::Greater {
                    break;
                }
                rank += self.arena[x].span(i);
                x = next;
            }
        }
        if x == self.header {
            None
        } else {
            Some((rank, x))
        }
    }

    /// All entries in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(
            &self.arena,
            self.arena[self.header].forward(0),
            self.tail,
            self.length as usize,
        )
    }

    /// Entries ranked `start..=end` (1-based). `end` is clamped to `len()`.
    pub fn range_by_rank(&self, start: u64, end: u64) -> Iter<'_> {
        let end = end.min(self.length);
        if start == 0 || start > end {
            return Iter::empty(&self.arena);
        }
        match (self.find_by_rank(start), self.find_by_rank(end)) {
            (Some(front), Some(back)) => Iter::new(
                &self.arena,
                Some(front),
                Some(back),
                (end - start + 1) as usize,
            ),
            _ => Iter::empty(&self.arena),
        }
    }

    /// Entries whose score lies in `min..=max`, in ascending order.
    pub fn range_by_score(&self, min: f64, max: f64) -> Iter<'_> {
        if min.total_cmp(&max) == Ordering::Greater {
            return Iter::empty(&self.arena);
        }
        match (self.first_in_score_range(min), self.last_in_score_range(max)) {
            (Some((first, front)), Some((last, back))) if first <= last => Iter::new(
                &self.arena,
                Some(front),
                Some(back),
                (last - first + 1) as usize,
            ),
            _ => Iter::empty(&self.arena),
        }
    }

    pub fn cursor(&self) -> Cursor<'_, G> {
        Cursor::new(self)
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn first_id(&self) -> Option<NodeId> {
        self.arena[self.header].forward(0)
    }

    pub(crate) fn tail_id(&self) -> Option<NodeId> {
        self.tail
    }

    /// Drops every entry. Handles to the dropped nodes stop resolving.
    pub fn clear(&mut self) {
        let mut next = self.arena[self.header].forward(0);
        while let Some(id) = next {
            next = self.arena[id].forward(0);
            self.arena.free(id);
        }
        for level in self.arena[self.header].levels.iter_mut() {
            level.forward = None;
            level.span = 0;
        }
        self.tail = None;
        self.length = 0;
        self.height = 1;
    }

    /// Walks the whole structure and reports the first broken invariant.
    pub fn check_invariants(&self) -> Result<()> {
        let corrupt = |msg: String| Err(Error::Corruption(msg));

        if self.height == 0 || self.height > self.max_level {
            return corrupt(format!(
                "height {} outside 1..={}",
                self.height, self.max_level
            ));
        }

        // Level 0: order, backward chain, tail and length.
        let mut ranks = HashMap::new();
        let mut prev: Option<NodeId> = None;
        let mut x = self.header;
        let mut count = 0u64;
        while let Some(next) = self.arena[x].forward(0) {
            count += 1;
            if self.arena[x].span(0) != 1 {
                return corrupt(format!(
                    "level 0 span {} before rank {}",
                    self.arena[x].span(0),
                    count
                ));
            }
            if self.arena[next].backward != prev {
                return corrupt(format!("backward link broken at rank {}", count));
            }
            if let Some(p) = prev {
                let node = &self.arena[next];
                if self.compare(p, node.score(), node.member()) == Ordering::Greater {
                    return corrupt(format!("out of order at rank {}", count));
                }
            }
            ranks.insert(next, count);
            prev = Some(next);
            x = next;
        }
        if count != self.length {
            return corrupt(format!("{} nodes linked, length {}", count, self.length));
        }
        if self.tail != prev {
            return corrupt("tail is not the last node".to_string());
        }
        if self.arena.len() as u64 != self.length + 1 {
            return corrupt(format!(
                "arena holds {} nodes, length {}",
                self.arena.len(),
                self.length
            ));
        }

        // Upper levels: spans sum to ranks.
        for i in 1..self.height {
            let mut rank = 0u64;
            let mut x = self.header;
            while let Some(next) = self.arena[x].forward(i) {
                rank += self.arena[x].span(i);
                if ranks.get(&next) != Some(&rank) {
                    return corrupt(format!("level {} span sum {} is off", i, rank));
                }
                if self.arena[next].height() <= i {
                    return corrupt(format!(
                        "level {} links a node of height {}",
                        i,
                        self.arena[next].height()
                    ));
                }
                x = next;
            }
        }

        let header = &self.arena[self.header];
        if self.height > 1 && header.forward(self.height - 1).is_none() {
            return corrupt(format!("top level {} is empty", self.height - 1));
        }
        if let Some(i) = (self.height..self.max_level).find(|&i| header.forward(i).is_some()) {
            return corrupt(format!("level {} is linked above height {}", i, self.height));
        }
        Ok(())
    }
}

impl<G: LevelGenerator> fmt::Display for RankedIndex<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.height).rev() {
            write!(f, "level {}: head", i)?;
            let mut x = self.header;
            while let Some(next) = self.arena[x].forward(i) {
                let node = &self.arena[next];
                write!(
                    f,
                    " --{}--> ({}, {})",
                    self.arena[x].span(i),
                    node.score(),
                    node.member()
                )?;
                x = next;
            }
            writeln!(f, " ----> nil")?;
        }
        Ok(())
    }
}
