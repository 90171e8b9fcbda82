//! Collision jitter sources
//!
//! Paddle and brick hits nudge the ball's horizontal velocity by a random
//! amount in `[-1, 1]`. The source is passed into every tick so tests and
//! replays can pin the sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::JITTER_AMPLITUDE;

/// Supplies horizontal velocity perturbations
pub trait JitterSource {
    /// Next perturbation, always within `[-JITTER_AMPLITUDE, JITTER_AMPLITUDE]`
    fn jitter(&mut self) -> f32;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn jitter(&mut self) -> f32 {
        (**self).jitter()
    }
}

/// Uniform jitter from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct SeededJitter {
    seed: u64,
    rng: Pcg32,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl JitterSource for SeededJitter {
    fn jitter(&mut self) -> f32 {
        self.rng.random_range(-JITTER_AMPLITUDE..=JITTER_AMPLITUDE)
    }
}

/// Constant jitter, clamped into range
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedJitter(pub f32);

impl JitterSource for FixedJitter {
    fn jitter(&mut self) -> f32 {
        self.0.clamp(-JITTER_AMPLITUDE, JITTER_AMPLITUDE)
    }
}
