use std::{num::NonZeroUsize, thread};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Seed for reproducible bootstrap resampling.
///
/// A 128-bit seed. Resample `i` draws from its own PCG stream derived from
/// the seed and `i`, so results do not depend on how resamples are spread
/// across threads.
///
/// # Example
///
/// ```
/// use methcomp::regression::{Bootstrap, BootstrapSeed};
/// use rand::Rng as _;
///
/// let seed: BootstrapSeed = rand::rng().random();
/// let a = Bootstrap::new(200).unwrap().with_seed(seed);
/// let b = Bootstrap::new(200).unwrap().with_seed(seed);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapSeed([u8; 16]);

impl BootstrapSeed {
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Generator for the resample with the given index.
    #[expect(clippy::cast_possible_truncation)]
    fn rng_for(self, index: usize) -> Pcg32 {
        let value = self.as_u128();
        let state = (value >> 64) as u64;
        let stream = (value as u64).wrapping_add(index as u64);
        Pcg32::new(state, stream)
    }
}

impl Serialize for BootstrapSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:032x}", self.as_u128()))
    }
}

impl<'de> Deserialize<'de> for BootstrapSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<BootstrapSeed> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> BootstrapSeed
    where
        R: Rng + ?Sized,
    {
        BootstrapSeed(rng.random())
    }
}

/// Bootstrap resampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bootstrap {
    resamples: usize,
    seed: BootstrapSeed,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            resamples: Self::DEFAULT_RESAMPLES,
            seed: rand::rng().random(),
        }
    }
}

impl Bootstrap {
    pub const DEFAULT_RESAMPLES: usize = 1000;

    /// Bootstrap with `resamples` draws and a random seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] if `resamples` is zero.
    pub fn new(resamples: usize) -> Result<Self, Error> {
        if resamples == 0 {
            return Err(Error::domain(
                "bootstrap resamples",
                "a positive integer",
                resamples,
            ));
        }
        Ok(Self {
            resamples,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_seed(self, seed: BootstrapSeed) -> Self {
        Self { seed, ..self }
    }

    #[must_use]
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    #[must_use]
    pub fn seed(&self) -> BootstrapSeed {
        self.seed
    }

    /// Evaluates `estimate` on each resample of `n` indices drawn with
    /// replacement from `0..n`.
    ///
    /// Resamples for which `estimate` returns `None` are left out. The output
    /// keeps resample order.
    pub(crate) fn run<T, F>(&self, n: usize, estimate: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&[usize]) -> Option<T> + Sync,
    {
        let mut results = (0..self.resamples).map(|_| None).collect::<Vec<Option<T>>>();
        let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_len = self.resamples.div_ceil(threads).max(1);
        let seed = self.seed;
        let estimate = &estimate;

        thread::scope(|s| {
            for (chunk_index, chunk) in results.chunks_mut(chunk_len).enumerate() {
                s.spawn(move || {
                    let mut indices = vec![0; n];
                    for (offset, slot) in chunk.iter_mut().enumerate() {
                        let mut rng = seed.rng_for(chunk_index * chunk_len + offset);
                        for index in &mut indices {
                            *index = rng.random_range(0..n);
                        }
                        *slot = estimate(&indices);
                    }
                });
            }
        });

        results.into_iter().flatten().collect()
    }
}
