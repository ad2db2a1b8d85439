//! Deterministic random number generation
//!
//! Every stream is keyed by a coordinate: the six-decimal text of the
//! coordinate is hashed with FNV-1a, mixed, and used to seed a fresh
//! ChaCha8 generator. Nothing is shared between calls.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geo::Coordinate;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Derive the seed for a coordinate.
pub fn coordinate_seed(coord: &Coordinate) -> u64 {
    let mut seed = fnv1a(coord.seed_key().as_bytes());
    // Spread the low-entropy tail of nearby keys across the whole word
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= seed >> 33;
    seed
}

/// Create the generator for a coordinate.
pub fn coordinate_rng(coord: &Coordinate) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(coordinate_seed(coord))
}

/// Helper functions for common random operations
pub trait RngExt {
    /// Uniform draw from the half-open range `[min, max)`; `min` when empty.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng> RngExt for R {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.gen_range(min..max)
        } else {
            min
        }
    }
}
