//! RNG module - deterministic shuffling for board generation
//!
//! Boards are shuffled by a small LCG so the same seed always deals the same board.
//! The default shuffle samples the swap partner from the *whole* slice on every step
//! (`j in [0, len)`), which is what existing saves and replays were dealt with. It is
//! not a uniform permutation; [`Unbiased`] opts into the textbook `j in [0, i]` variant.

use crate::types::PairKey;

/// Something that can permute a freshly built pair-key sequence.
pub trait Shuffler {
    fn shuffle(&mut self, keys: &mut [PairKey]);
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock, for games started without an explicit seed.
    pub fn from_entropy() -> Self {
        Self::new(entropy_seed())
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Swap every index with a partner drawn from the full range.
    pub fn shuffle_full_range<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in 0..len {
            let j = self.next_range(len as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle_uniform<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current RNG state (re-seeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Shuffler for SimpleRng {
    fn shuffle(&mut self, keys: &mut [PairKey]) {
        self.shuffle_full_range(keys);
    }
}

/// Uniform Fisher-Yates over a [`SimpleRng`].
#[derive(Debug, Clone)]
pub struct Unbiased(pub SimpleRng);

impl Shuffler for Unbiased {
    fn shuffle(&mut self, keys: &mut [PairKey]) {
        self.0.shuffle_uniform(keys);
    }
}

/// Leaves the sequence in generation order (`0, 0, 1, 1, ...`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Shuffler for Identity {
    fn shuffle(&mut self, _keys: &mut [PairKey]) {}
}

fn entropy_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    (nanos as u32) ^ ((nanos >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_full_range_shuffle_is_seed_stable() {
        let mut a = [0u32, 0, 1, 1, 2, 2, 3, 3];
        let mut b = a;
        SimpleRng::new(77).shuffle_full_range(&mut a);
        SimpleRng::new(77).shuffle_full_range(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_range_shuffle_known_order() {
        let mut keys = [0u32, 0, 1, 1, 2, 2, 3, 3];
        SimpleRng::new(77).shuffle(&mut keys);
        assert_eq!(keys, [0, 1, 1, 2, 2, 0, 3, 3]);

        let mut keys = [0u32, 0, 1, 1, 2, 2, 3, 3];
        Unbiased(SimpleRng::new(77)).shuffle(&mut keys);
        assert_eq!(keys, [0, 1, 3, 2, 1, 3, 2, 0]);
    }

    #[test]
    fn test_full_range_shuffle_draws_one_value_per_element() {
        let mut keys = [0u32, 0, 1, 1, 2, 2];
        let mut rng = SimpleRng::new(9);
        rng.shuffle_full_range(&mut keys);

        let mut expected = SimpleRng::new(9);
        for _ in 0..keys.len() {
            expected.next_u32();
        }
        assert_eq!(rng.state(), expected.state());
    }

    #[test]
    fn test_shufflers_keep_multiset() {
        let original = [0u32, 0, 1, 1, 2, 2, 3, 3, 4, 4];

        let mut full = original;
        SimpleRng::new(3).shuffle(&mut full);
        let mut uniform = original;
        Unbiased(SimpleRng::new(3)).shuffle(&mut uniform);

        for shuffled in [full, uniform] {
            let mut sorted = shuffled;
            sorted.sort_unstable();
            assert_eq!(sorted, original);
        }
    }

    #[test]
    fn test_identity_leaves_order() {
        let mut keys = [0u32, 0, 1, 1];
        Identity.shuffle(&mut keys);
        assert_eq!(keys, [0, 0, 1, 1]);
    }
}
