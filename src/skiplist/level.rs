use rand::{rngs::StdRng, Rng};

/// Draws the tower height of a freshly inserted node.
pub trait LevelGenerator {
    /// Highest level this generator can return; the header tower is this tall.
    fn total(&self) -> usize;

    /// A level in `[1, total]`.
    fn random_level(&mut self) -> usize;
}

/// Geometric tower heights: each extra level is kept with probability `p`.
pub struct GeometricLevelGenerator<R: Rng = StdRng> {
    total: usize,
    p: f64,
    rng: R,
}

impl<R: Rng> GeometricLevelGenerator<R> {
    /// # Panics
    ///
    /// `total` must be at least 1 and `p` must lie in `(0, 1)`.
    pub fn new(total: usize, p: f64, rng: R) -> Self {
        if total == 0 {
            panic!("total must be non-zero.");
        }
        if !(p > 0.0 && p < 1.0) {
            panic!("p must be in (0, 1).");
        }
        GeometricLevelGenerator { total, p, rng }
    }
}

impl<R: Rng> LevelGenerator for GeometricLevelGenerator<R> {
    fn total(&self) -> usize {
        self.total
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.total && self.rng.gen::<f64>() < self.p {
            level += 1;
        }
        level
    }
}
