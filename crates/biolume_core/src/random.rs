//! Single-stream pseudo random number service.
//!
//! Every mutation and reproduction decision draws from one process-wide
//! stream owned by the population, so a fixed seed reproduces a run exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// The simulation's generator.
pub type SimRng = ChaCha8Rng;

/// Draw helpers used throughout the engine.
///
/// Blanket-implemented for every [`RngCore`], including `dyn RngCore`.
pub trait RandomSource: RngCore {
    /// Uniform integer in `[0, max_exclusive)`. Returns 0 when the range is empty.
    fn rand_int(&mut self, max_exclusive: usize) -> usize {
        if max_exclusive == 0 {
            return 0;
        }
        self.gen_range(0..max_exclusive)
    }

    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f32 {
        self.gen::<f32>()
    }

    /// Standard normal deviate (Box-Muller, polar rejection form).
    fn gaussian(&mut self) -> f32 {
        loop {
            let u1 = 2.0 * self.uniform() - 1.0;
            let u2 = 2.0 * self.uniform() - 1.0;
            let s = u1 * u1 + u2 * u2;
            // s == 0 would divide by zero
            if s < 1.0 && s > 0.0 {
                return u1 * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {}

/// Builds the simulation generator, returning it with the seed actually used.
///
/// Without an explicit seed, one is derived from the wall clock.
pub fn seeded_rng(seed: Option<u64>) -> (SimRng, u64) {
    let seed = seed.unwrap_or_else(time_seed);
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
