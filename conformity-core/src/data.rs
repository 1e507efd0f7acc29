//! Seeds, deterministic draw sources, and bias factors.

use std::fmt;

/// Splittable random seed for deterministic generation.
///
/// Seeds can be split to create independent random streams,
/// ensuring deterministic and reproducible conformance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Create a seed from a signed value.
    ///
    /// Any representable input is accepted, negative or extreme; the
    /// bits are reinterpreted as-is.
    pub fn from_i64(value: i64) -> Self {
        Seed::from_u64(value as u64)
    }

    /// Split a seed into two independent seeds.
    /// Uses SplitMix64 splitting strategy for independence.
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

    /// Generate a bounded random value [0, bound). A zero bound yields zero.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (value, new_seed) = self.next_u64();
        ((value as u128 * bound as u128 >> 64) as u64, new_seed)
    }

    /// Generate a random bool.
    pub fn next_bool(self) -> (bool, Self) {
        let (value, new_seed) = self.next_u64();
        (value & 1 == 1, new_seed)
    }

    /// Sample a seed from ambient entropy.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed(rng.gen(), rng.gen())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.0, self.1)
    }
}

/// Stateful deterministic draw engine.
///
/// A `Source` owns a [`Seed`] and advances it on every draw. Two sources
/// built from equal seeds produce identical, independently consumed draw
/// sequences; sources share no state with each other.
#[derive(Debug, Clone)]
pub struct Source {
    seed: Seed,
}

impl Source {
    /// Create a source positioned at the start of the seed's sequence.
    pub fn new(seed: Seed) -> Self {
        Source { seed }
    }

    /// Shorthand for `Source::new(Seed::from_u64(value))`.
    pub fn from_u64(value: u64) -> Self {
        Source::new(Seed::from_u64(value))
    }

    /// Draw a full-width value.
    pub fn next_u64(&mut self) -> u64 {
        let (value, next) = self.seed.next_u64();
        self.seed = next;
        value
    }

    /// Draw a value in [0, bound). A zero bound draws zero.
    pub fn next_bounded(&mut self, bound: u64) -> u64 {
        let (value, next) = self.seed.next_bounded(bound);
        self.seed = next;
        value
    }

    /// Draw a bool.
    pub fn next_bool(&mut self) -> bool {
        let (value, next) = self.seed.next_bool();
        self.seed = next;
        value
    }

    /// Draw a value in the inclusive range [min, max].
    pub fn next_i64_in(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        let span = max.wrapping_sub(min) as u64;
        if span == u64::MAX {
            return self.next_u64() as i64;
        }
        min.wrapping_add(self.next_bounded(span + 1) as i64)
    }
}

/// Knob that skews draws toward boundary values.
///
/// The factor is the inverse frequency of the skew: a generator handed a
/// factor `f` is expected to draw an edge value roughly one time in `f`.
/// Factors live in `[2, 100]`; an absent factor means unbiased draws.
/// Bias may change only the distribution of drawn values, never which
/// values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasFactor(u64);

impl BiasFactor {
    /// Smallest accepted factor.
    pub const MIN: u64 = 2;

    /// Largest accepted factor.
    pub const MAX: u64 = 100;

    /// Create a bias factor, clamping into `[MIN, MAX]`.
    pub fn new(factor: u64) -> Self {
        BiasFactor(factor.clamp(Self::MIN, Self::MAX))
    }

    /// Get the inner factor.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Flip the edge-value coin: true with probability `1 / factor`.
    pub fn apply(&self, source: &mut Source) -> bool {
        source.next_bounded(self.0) == 0
    }
}

impl fmt::Display for BiasFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BiasFactor({})", self.0)
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
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Gamma must be odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
