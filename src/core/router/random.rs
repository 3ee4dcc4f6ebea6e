//! Injectable randomness.
//!
//! The `Random` tactic and the weighted-random fallback inside `Hybrid` both
//! need a uniform draw in `[0, 1)`. Routing it through a trait instead of
//! calling `rand::thread_rng()` directly lets tests pin the exact draw and
//! assert on the resulting pick instead of looping for statistical coverage.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform `[0, 1)` draws, shared behind `&self` so it can sit
/// behind an `Arc` alongside the rest of a rule's tactic state.
pub trait RandomSource: Send + Sync {
    /// Draw a uniform value in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source for tests: wraps a seeded `StdRng` behind a mutex so
/// the trait can stay `&self`.
#[derive(Debug)]
pub struct SeededRandomSource(Mutex<StdRng>);

impl SeededRandomSource {
    /// Build a source that always reproduces the same draw sequence for a
    /// given seed.
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl RandomSource for SeededRandomSource {
    fn next_f64(&self) -> f64 {
        self.0.lock().gen::<f64>()
    }
}

/// Source that always returns a fixed value, for pinning a tactic's branch
/// in a unit test without reasoning about an RNG sequence.
#[derive(Debug)]
pub struct FixedRandomSource(pub f64);

impl RandomSource for FixedRandomSource {
    fn next_f64(&self) -> f64 {
        self.0
    }
}
