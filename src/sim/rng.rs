//! Random sources for piece generation
//!
//! Generation never touches a global RNG: the game owns a `RandomSource`,
//! so a seed (or a scripted sequence) fully determines the tower.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Uniform random values in [0, 1)
pub trait RandomSource {
    fn uniform01(&mut self) -> f32;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform01(&mut self) -> f32 {
        (**self).uniform01()
    }
}

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Seeded PCG source (same seed, same tower)
#[derive(Debug, Clone)]
pub struct PcgRandom {
    state: RngState,
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        let state = RngState::new(seed);
        Self {
            rng: state.to_rng(),
            state,
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.state.seed
    }
}

impl RandomSource for PcgRandom {
    fn uniform01(&mut self) -> f32 {
        // StandardUniform for f32 samples [0, 1)
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Useful for hosts that record runs and for tests that need an exact tower.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    index: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, index: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform01(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
