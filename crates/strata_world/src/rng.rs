//! # Seeded RNG
//!
//! A small reproducible generator for procedural decisions that are not
//! spatial (loot rolls, feature picks, placement jitter).
//!
//! - 32-bit seed expanded to 128 bits of state with splitmix32, so seeds
//!   `n` and `n + 1` do not give correlated first outputs
//! - xoshiro128** core (xor / shift / rotate on four words)
//! - Implements `rand::RngCore` + `rand::SeedableRng`, so `rand::Rng`
//!   helpers work on it too

use rand::{RngCore, SeedableRng};

/// splitmix32 step: advances `state` and returns a mixed word.
#[inline]
fn splitmix32(state: &mut u32) -> u32 {
    *state = state.wrapping_add(0x9E37_79B9);
    let mut z = *state;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Deterministic xoshiro128** generator.
///
/// # Example
///
/// ```rust
/// use strata_world::SeededRng;
///
/// let mut a = SeededRng::new(42);
/// let mut b = SeededRng::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
///
/// let roll = a.next_int(1, 6);
/// assert!((1..=6).contains(&roll));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: [u32; 4],
}

impl SeededRng {
    /// Creates a generator from a 32-bit seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let mut sm = seed;
        let state = [
            splitmix32(&mut sm),
            splitmix32(&mut sm),
            splitmix32(&mut sm),
            splitmix32(&mut sm),
        ];
        Self::from_state(state)
    }

    /// Builds from raw state. An all-zero state would be a fixed point, so it
    /// is replaced by the expansion of seed 0.
    fn from_state(state: [u32; 4]) -> Self {
        if state == [0; 4] {
            Self::new(0)
        } else {
            Self { state }
        }
    }

    /// Advances the generator and returns the next raw word.
    #[inline]
    pub fn next_word(&mut self) -> u32 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 9;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(11);

        result
    }

    /// Returns a float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_word()) / 4_294_967_296.0
    }

    /// Returns an integer in the inclusive range `[min, max]`.
    ///
    /// Computed as `min + floor(next() * (max - min + 1))`. If `max < min`
    /// the bounds are swapped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if max < min { (max, min) } else { (min, max) };
        let span = f64::from(hi) - f64::from(lo) + 1.0;
        let offset = (self.next_f64() * span).floor();
        // offset < span, so the sum stays within [lo, hi]
        (f64::from(lo) + offset) as i32
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_word());
        let hi = u64::from(self.next_word());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut state = [0u32; 4];
        for (word, bytes) in state.iter_mut().zip(seed.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Self::from_state(state)
    }
}
