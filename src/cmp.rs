use std::cmp::Ordering;

/// Orders members that share a score.
pub trait Comparator: Send + Sync {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;

    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy, Default)]
pub struct BitWiseComparator {}

impl Comparator for BitWiseComparator {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        left.cmp(right)
    }

    fn name(&self) -> &'static str {
        "rankskip.BitwiseComparator"
    }
}

/// Total order of `(score, member)` entries: score first, member breaks ties.
///
/// Scores use the IEEE-754 total order, so NaN sorts after +inf and `-0.0`
/// sorts before `+0.0`.
pub fn compare_entry(
    comparator: &dyn Comparator,
    left: (f64, &str),
    right: (f64, &str),
) -> Ordering {
    left.0
        .total_cmp(&right.0)
        .then_with(|| comparator.compare(left.1.as_bytes(), right.1.as_bytes()))
}
