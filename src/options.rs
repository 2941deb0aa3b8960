use std::sync::Arc;

use crate::{
    cmp::{BitWiseComparator, Comparator},
    error::{Error, Result},
};

/// Default height of the header tower.
pub const MAX_LEVEL: usize = 32;
/// Default probability that a tower grows by one more level.
pub const P: f64 = 0.25;

/// Hard cap on `max_level`; 64 levels at any useful `p` cover more entries than memory holds.
pub const MAX_LEVEL_LIMIT: usize = 64;

#[derive(Clone)]
pub struct Options {
    pub comparator: Arc<dyn Comparator>,

    pub max_level: usize,
    pub probability: f64,

    /// Seed for the level generator. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            comparator: Arc::new(BitWiseComparator {}),
            max_level: MAX_LEVEL,
            probability: P,
            seed: None,
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(Error::InvalidArgument(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL_LIMIT, self.max_level
            )));
        }
        if !self.probability.is_finite() || self.probability <= 0.0 || self.probability >= 1.0 {
            return Err(Error::InvalidArgument(format!(
                "probability must be in (0, 1), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
