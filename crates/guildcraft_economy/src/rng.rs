//! # Deterministic Randomness
//!
//! The engine never owns a global RNG. Every operation that shuffles or rolls
//! takes `&mut R where R: RandomSource`, so callers decide between a seeded
//! generator (tests, replays) and an entropy-backed one (live play).
//!
//! Any [`rand::Rng`] is a [`RandomSource`]. [`FixedRoll`] is a source that
//! always lands on the same offset, for forcing roll outcomes.
//!
//! Rolls are integer based: probabilities are stored in basis points
//! (10000 = 100%) and compared against a uniform draw in `0..10000`.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Basis points in one whole (100%).
pub const BASIS_POINTS: u32 = 10_000;

/// A source of uniform draws.
pub trait RandomSource {
    /// Returns a uniform draw in `0..bound`. `bound` is never zero.
    fn next_below(&mut self, bound: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_below(&mut self, bound: u32) -> u32 {
        self.gen_range(0..bound)
    }
}

/// A source whose every draw is `offset`, clamped into range.
///
/// `FixedRoll::LOW` makes every roll with a non-zero chance succeed;
/// `FixedRoll::HIGH` makes every roll below 100% fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRoll(pub u32);

impl FixedRoll {
    /// Always draws the lowest value.
    pub const LOW: Self = Self(0);
    /// Always draws the highest value.
    pub const HIGH: Self = Self(u32::MAX);
}

impl RandomSource for FixedRoll {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.0.min(bound.saturating_sub(1))
    }
}

/// Creates a reproducible generator from a 64-bit seed.
#[must_use]
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draws one Bernoulli trial that succeeds with `chance_bp / 10000`.
///
/// Chances at or above 10000 always succeed and zero never does; the draw is
/// still consumed in both cases so sequences stay aligned across configs.
#[inline]
pub fn roll_basis_points<R: RandomSource + ?Sized>(rng: &mut R, chance_bp: u32) -> bool {
    let roll = rng.next_below(BASIS_POINTS);
    let hit = roll < chance_bp;
    tracing::trace!("roll {} against {} bp -> {}", roll, chance_bp, hit);
    hit
}

/// Draws one Bernoulli trial that succeeds with `percent / 100`.
#[inline]
pub fn roll_percent<R: RandomSource + ?Sized>(rng: &mut R, percent: u32) -> bool {
    roll_basis_points(rng, percent.saturating_mul(100))
}

/// In-place Fisher–Yates shuffle driven by `rng`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let bound = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let j = rng.next_below(bound) as usize;
        items.swap(i, j);
    }
}
