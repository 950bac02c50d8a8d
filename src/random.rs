//! Sources of randomness for palette initialisation.
//!
//! Clustering draws pixel indices at random. Production runs use an
//! OS-seeded [`StdRandom`]; seeded CLI runs and tests plug in a
//! reproducible or scripted source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PixelArtError;

/// Uniform index generator.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..len`. `len` is never 0.
    fn index(&mut self, len: usize) -> usize;
}

/// [`StdRng`] behind the [`RandomSource`] interface.
#[derive(Clone, Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Reproducible stream for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Seeded from the operating system.
    pub fn from_os() -> Result<Self, PixelArtError> {
        StdRng::try_from_os_rng()
            .map(Self)
            .map_err(|e| PixelArtError::Random(e.to_string()))
    }
}

impl RandomSource for StdRandom {
    #[inline]
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Values are reduced modulo the requested length. An empty script always
/// yields 0.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    script: Vec<usize>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(script: &[usize]) -> Self {
        Self {
            script: script.to_vec(),
            pos: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.pos % self.script.len()];
        self.pos += 1;
        value % len
    }
}
