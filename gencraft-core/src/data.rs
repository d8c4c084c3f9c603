//! Random source and run configuration.

use crate::error::{GencraftError, Result};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding an explicit run seed.
pub const SEED_ENV: &str = "GENCRAFT_SEED";

/// Environment variable holding the number of trials per property.
pub const TESTS_ENV: &str = "GENCRAFT_TESTS";

/// Splittable random seed for deterministic generation.
///
/// A `Seed` is an immutable cursor over a SplitMix64 stream. Drawing
/// returns the value together with the advanced seed, so the caller
/// threads the state explicitly and no draw ever touches shared
/// mutable randomness. Seeds can be split to create independent
/// streams for separate trials or worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(u64, u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Rebuild a seed from its state and gamma, as printed by `Display`.
    ///
    /// The gamma must be odd. An even gamma shortens the stream's period,
    /// and a zero gamma repeats one output forever.
    pub fn from_parts(state: u64, gamma: u64) -> Result<Self> {
        if gamma & 1 == 0 {
            return Err(GencraftError::InvalidConfig {
                message: format!("seed gamma {gamma:016x} must be odd"),
            });
        }
        Ok(Seed(state, gamma))
    }

    /// Split a seed into two independent seeds.
    pub fn split(self) -> (Self, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        let new_gamma = mix_gamma(output);

        (Seed(new_state, gamma), Seed(output, new_gamma))
    }

    /// Generate the next random value and advance the seed.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a uniform value in `[0, bound)`.
    ///
    /// Uses Lemire's multiply-and-reject method, so every value in the
    /// interval is equally likely. A bound of zero or one always yields
    /// zero without consuming randomness.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        if bound <= 1 {
            return (0, self);
        }

        let threshold = bound.wrapping_neg() % bound;
        let mut seed = self;
        loop {
            let (value, next) = seed.next_u64();
            let product = value as u128 * bound as u128;
            if (product as u64) >= threshold {
                return ((product >> 64) as u64, next);
            }
            seed = next;
        }
    }

    /// Generate a uniform value in `[0, span)` for spans up to `2^64`.
    pub fn next_below(self, span: u128) -> (u128, Self) {
        if span > u64::MAX as u128 {
            let (value, next) = self.next_u64();
            (value as u128, next)
        } else {
            let (value, next) = self.next_bounded(span as u64);
            (value as u128, next)
        }
    }

    /// Generate a random bool.
    pub fn next_bool(self) -> (bool, Self) {
        let (value, new_seed) = self.next_u64();
        (value & 1 == 1, new_seed)
    }

    /// Generate a random seed from system entropy.
    pub fn random() -> Self {
        Seed::from_u64(random_seed_value())
    }

    /// Endless sequence of independent seeds, one per trial.
    ///
    /// Each item is the left half of a split, and the right half becomes
    /// the source for the next item. The sequence is a pure function of
    /// `self`, which is what lets a parallel run reproduce a sequential one.
    pub fn splits(self) -> Splits {
        Splits { seed: self }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}:{:016x}", self.0, self.1)
    }
}

impl FromStr for Seed {
    type Err = GencraftError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GencraftError::InvalidConfig {
            message: format!("seed '{s}' is not of the form <state>:<gamma> in hex"),
        };
        let (state, gamma) = s.trim().split_once(':').ok_or_else(invalid)?;
        let state = u64::from_str_radix(state, 16).map_err(|_| invalid())?;
        let gamma = u64::from_str_radix(gamma, 16).map_err(|_| invalid())?;
        Seed::from_parts(state, gamma)
    }
}

/// Iterator returned by [`Seed::splits`].
#[derive(Debug, Clone)]
pub struct Splits {
    seed: Seed,
}

impl Iterator for Splits {
    type Item = Seed;

    fn next(&mut self) -> Option<Seed> {
        let (item, rest) = self.seed.split();
        self.seed = rest;
        Some(item)
    }
}

/// Draw a fresh top-level seed value from system entropy.
pub fn random_seed_value() -> u64 {
    use rand::Rng;
    rand::thread_rng().gen()
}

/// Configuration for property testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of trials to run.
    pub test_limit: usize,

    /// Maximum number of discarded trials before giving up.
    pub discard_limit: usize,

    /// Explicit run seed. `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Treat generator errors as discards instead of stopping the run.
    pub continue_on_generator_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_limit: 100,
            discard_limit: 100,
            seed: None,
            continue_on_generator_error: false,
        }
    }
}

impl Config {
    /// Create a new config with the given number of tests.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.test_limit = tests;
        self
    }

    /// Create a new config with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with the given discard limit.
    pub fn with_discard_limit(mut self, limit: usize) -> Self {
        self.discard_limit = limit;
        self
    }

    /// Keep running after a generator error, counting it as a discard.
    pub fn continue_on_generator_error(mut self) -> Self {
        self.continue_on_generator_error = true;
        self
    }

    /// Build a config from `GENCRAFT_SEED` and `GENCRAFT_TESTS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw.trim().parse().map_err(|_| GencraftError::InvalidConfig {
                message: format!("{SEED_ENV}='{raw}' is not an unsigned 64-bit integer"),
            })?;
            config.seed = Some(seed);
        }

        if let Some(raw) = lookup(TESTS_ENV) {
            let tests = raw.trim().parse().map_err(|_| GencraftError::InvalidConfig {
                message: format!("{TESTS_ENV}='{raw}' is not a trial count"),
            })?;
            config.test_limit = tests;
        }

        Ok(config)
    }

    /// The seed this run will use, drawing one from entropy if unset.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(random_seed_value)
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(z: u64) -> u64 {
    let z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
