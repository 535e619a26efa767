//! RNG module - deterministic colour generation
//!
//! New pairs draw both colours independently and uniformly from the first
//! `color_count` colours. A small LCG keeps every game reproducible from its seed,
//! which the tests and benchmarks rely on.

use crate::types::PuyoColor;

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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high half of the state: the low bits of a power-of-two LCG
    /// repeat with a tiny period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        (self.next_u32() >> 16) % max
    }

    /// Current internal state (continuing a game from here replays the same colours).
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Deals colours for new pairs.
#[derive(Debug, Clone)]
pub struct ColorDealer {
    rng: SimpleRng,
    seed: u32,
}

impl ColorDealer {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Draw one colour uniformly from the first `color_count` colours.
    ///
    /// `color_count` is expected to be clamped to `1..=MAX_COLORS` already.
    pub fn draw(&mut self, color_count: u8) -> PuyoColor {
        let n = color_count.clamp(1, crate::types::MAX_COLORS) as u32;
        let index = self.rng.next_range(n) as u8 + 1;
        PuyoColor::from_index(index).unwrap_or(PuyoColor::Red)
    }

    /// Draw the `(pivot, satellite)` colours of a new pair.
    pub fn draw_pair(&mut self, color_count: u8) -> (PuyoColor, PuyoColor) {
        let pivot = self.draw(color_count);
        let satellite = self.draw(color_count);
        (pivot, satellite)
    }

    /// Seed the dealer was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed that continues the current sequence in a fresh dealer.
    pub fn continuation_seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for ColorDealer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_dealer_stays_within_color_count() {
        let mut dealer = ColorDealer::new(7);
        for _ in 0..500 {
            let c = dealer.draw(3);
            assert!((1..=3).contains(&c.index()), "unexpected colour {:?}", c);
        }
    }

    #[test]
    fn test_dealer_single_color() {
        let mut dealer = ColorDealer::new(99);
        for _ in 0..50 {
            assert_eq!(dealer.draw_pair(1), (PuyoColor::Red, PuyoColor::Red));
        }
    }

    #[test]
    fn test_dealer_clamps_out_of_range_counts() {
        let mut dealer = ColorDealer::new(3);
        for _ in 0..50 {
            assert_eq!(dealer.draw(0), PuyoColor::Red);
            assert!(dealer.draw(200).index() <= 5);
        }
    }

    #[test]
    fn test_dealer_uses_every_color_eventually() {
        let mut dealer = ColorDealer::new(12345);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            seen[(dealer.draw(5).index() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "seen: {:?}", seen);
    }

    #[test]
    fn test_continuation_seed_replays_sequence() {
        let mut a = ColorDealer::new(42);
        a.draw_pair(4);
        let mut b = ColorDealer::new(a.continuation_seed());
        for _ in 0..20 {
            assert_eq!(a.draw_pair(4), b.draw_pair(4));
        }
    }
}
