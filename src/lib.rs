//! An ordered, rank-queryable index of `(score, member)` entries backed by a
//! skiplist with per-link spans, the usual index under sorted sets and
//! leaderboards.
//!
//! ```
//! use rankskip::RankedIndex;
//!
//! let mut index = RankedIndex::with_seed(7);
//! index.insert(200.0, "b");
//! index.insert(100.0, "a");
//! assert_eq!(index.get_rank(200.0, "b"), Some(2));
//! assert_eq!(index.get_element_by_rank(1).map(|n| n.member()), Some("a"));
//! assert!(index.delete(300.0, "c").is_err());
//! ```

mod cmp;
#[cfg(test)]
mod datadriven;
mod error;
mod options;
mod skiplist;

pub use cmp::{BitWiseComparator, Comparator};
pub use error::{Error, Result};
pub use options::{Options, MAX_LEVEL, P};
pub use skiplist::{
    Cursor, GeometricLevelGenerator, Iter, LevelGenerator, Node, NodeId, RankedIndex,
};
