//! # Value Noise
//!
//! Deterministic coherent noise for terrain and ore placement.
//!
//! ## Why value noise?
//!
//! - Cheap: one integer hash per lattice corner, no gradient tables
//! - Stateless: every sample is a pure function of `(coords, seed)`, so a
//!   chunk generates identically no matter which neighbours exist
//! - Output is already in `[0, 1]`, which maps directly onto rarity thresholds
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, these functions produce **exactly** the same
//! values on any platform, any time. Only integer hashing and IEEE `f64`
//! arithmetic are involved.

/// Seed offset between fractal octaves.
const OCTAVE_SEED_STRIDE: u32 = 101;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u32);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the seed shifted by `delta` (wrapping).
    ///
    /// Used to give each noise layer (octave, ore tier) its own stream.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: u32) -> Self {
        Self(self.0.wrapping_add(delta))
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xCAFE_BABE)
    }
}

/// Seed-salted integer hash of a lattice point.
///
/// Murmur-style mixing with an fmix32 avalanche at the end, so neighbouring
/// lattice points and neighbouring seeds land far apart.
#[inline]
#[must_use]
pub const fn lattice_hash(x: i32, y: i32, z: i32, seed: WorldSeed) -> u32 {
    let mut h = seed.0.wrapping_mul(0x9E37_79B9);
    h ^= (x as u32).wrapping_mul(0x85EB_CA6B);
    h = h.rotate_left(13);
    h ^= (y as u32).wrapping_mul(0xC2B2_AE35);
    h = h.rotate_left(13);
    h ^= (z as u32).wrapping_mul(0x27D4_EB2F);

    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

/// Lattice value in `[0, 1]`.
#[inline]
fn lattice_value(x: i32, y: i32, z: i32, seed: WorldSeed) -> f64 {
    f64::from(lattice_hash(x, y, z, seed)) / f64::from(u32::MAX)
}

/// Smoothstep weight: `3t² − 2t³`.
#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Splits a coordinate into its lattice cell and the smoothed fraction.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn cell(v: f64) -> (i32, f64) {
    let floor = v.floor();
    (floor as i32, smoothstep(v - floor))
}

/// Samples 2D value noise.
///
/// # Returns
///
/// A value in the range [0, 1]. Identical inputs always give identical
/// outputs.
#[must_use]
pub fn noise2d(x: f64, y: f64, seed: WorldSeed) -> f64 {
    let (x0, tx) = cell(x);
    let (y0, ty) = cell(y);
    let x1 = x0.wrapping_add(1);
    let y1 = y0.wrapping_add(1);

    let a = lerp(lattice_value(x0, y0, 0, seed), lattice_value(x1, y0, 0, seed), tx);
    let b = lerp(lattice_value(x0, y1, 0, seed), lattice_value(x1, y1, 0, seed), tx);
    lerp(a, b, ty)
}

/// Samples 3D value noise.
///
/// Trilinear blend of the 8 surrounding lattice values with smoothstep
/// weights. Range [0, 1].
#[must_use]
pub fn noise3d(x: f64, y: f64, z: f64, seed: WorldSeed) -> f64 {
    let (x0, tx) = cell(x);
    let (y0, ty) = cell(y);
    let (z0, tz) = cell(z);
    let x1 = x0.wrapping_add(1);
    let y1 = y0.wrapping_add(1);
    let z1 = z0.wrapping_add(1);

    let near = {
        let a = lerp(lattice_value(x0, y0, z0, seed), lattice_value(x1, y0, z0, seed), tx);
        let b = lerp(lattice_value(x0, y1, z0, seed), lattice_value(x1, y1, z0, seed), tx);
        lerp(a, b, ty)
    };
    let far = {
        let a = lerp(lattice_value(x0, y0, z1, seed), lattice_value(x1, y0, z1, seed), tx);
        let b = lerp(lattice_value(x0, y1, z1, seed), lattice_value(x1, y1, z1, seed), tx);
        lerp(a, b, ty)
    };
    lerp(near, far, tz)
}

/// Generates fractal (fBm) noise.
///
/// Combines multiple layers of `noise2d` at different frequencies to get
/// natural-looking terrain.
///
/// # Arguments
///
/// * `x`, `y` - Coordinates
/// * `octaves` - Number of noise layers (0 is treated as 1)
/// * `lacunarity` - Frequency increase per octave (typically 2.0)
/// * `gain` - Amplitude decay per octave (typically 0.5)
///
/// # Returns
///
/// A value in the range [0, 1] (normalised by total amplitude).
#[must_use]
pub fn fbm2d(x: f64, y: f64, seed: WorldSeed, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for octave in 0..octaves.max(1) {
        let layer_seed = seed.offset(octave.wrapping_mul(OCTAVE_SEED_STRIDE));
        total += noise2d(x * frequency, y * frequency, layer_seed) * amplitude;
        max_amplitude += amplitude;
        amplitude *= gain;
        frequency *= lacunarity;
    }

    if max_amplitude > 0.0 {
        total / max_amplitude
    } else {
        0.0
    }
}
