//! Random number sources for the draw.
//!
//! The engine never touches a platform RNG directly. Everything flows through
//! [`RandomSource`], so draws can be replayed from a seed or a fixed script.

use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(test)]
use mockall::automock;

/// Uniform integer generator.
#[cfg_attr(test, automock)]
pub trait RandomSource {
    /// Integer in `[0, max)`. `max` must be non-zero.
    fn next(&mut self, max: u64) -> u64;

    /// Integer in `[min, max)`. `min` must be below `max`.
    fn next_range(&mut self, min: u64, max: u64) -> u64;
}

/// Adapter from any [`rand::Rng`] to [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RngRandomSource<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngRandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRandomSource<StdRng> {
    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source: the same seed replays the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngRandomSource<R> {
    fn next(&mut self, max: u64) -> u64 {
        self.rng.gen_range(0..max)
    }

    fn next_range(&mut self, min: u64, max: u64) -> u64 {
        self.rng.gen_range(min..max)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Each value is reduced into the requested range, so any script is valid for
/// any call. An empty script always yields the lower bound.
#[derive(Clone, Debug, Default)]
pub struct FixedRandomSource {
    values: Vec<u64>,
    index: usize,
}

impl FixedRandomSource {
    pub fn new(values: Vec<u64>) -> Self {
        Self { values, index: 0 }
    }

    /// Source that always returns the same raw value.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }

    fn next_raw(&mut self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

impl RandomSource for FixedRandomSource {
    fn next(&mut self, max: u64) -> u64 {
        debug_assert!(max > 0, "empty range");
        self.next_raw() % max.max(1)
    }

    fn next_range(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min < max, "empty range");
        min + self.next_raw() % max.saturating_sub(min).max(1)
    }
}
