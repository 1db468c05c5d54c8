//! Row subsampling for boosting rounds.

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Samples rows without replacement for each boosting iteration.
///
/// Row indices are sorted after sampling for cache-friendly access.
/// Each round derives its own seed from the base seed, so runs with the
/// same seed sample identically.
#[derive(Debug, Clone)]
pub struct RowSampler {
    n_rows: u32,
    subsample: f32,
    seed: u64,
}

impl RowSampler {
    /// Create a new row sampler.
    ///
    /// # Panics
    ///
    /// Panics if `subsample` is not in (0, 1].
    pub fn new(n_rows: u32, subsample: f32, seed: u64) -> Self {
        assert!(
            subsample > 0.0 && subsample <= 1.0,
            "subsample must be in (0, 1], got {}",
            subsample
        );
        Self {
            n_rows,
            subsample,
            seed,
        }
    }

    /// Returns true if sampling is enabled (subsample < 1.0).
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.subsample < 1.0
    }

    /// Sample row indices for one boosting round.
    ///
    /// Returns all indices if `subsample == 1.0`. Otherwise samples
    /// without replacement via a partial Fisher-Yates shuffle and sorts
    /// the result.
    pub fn sample(&self, round: u32) -> Vec<u32> {
        if !self.is_enabled() {
            return (0..self.n_rows).collect();
        }

        // f64 keeps fractions like 100 * 0.3 from rounding up to 31.
        let sample_size = ((self.n_rows as f64 * self.subsample as f64).round() as usize)
            .clamp(1, self.n_rows as usize);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed.wrapping_add(round as u64));

        let mut indices: Vec<u32> = (0..self.n_rows).collect();
        for i in 0..sample_size {
            let j = rng.gen_range(i..self.n_rows as usize);
            indices.swap(i, j);
        }

        let mut sampled: Vec<u32> = indices[..sample_size].to_vec();
        sampled.sort_unstable();
        sampled
    }
}
