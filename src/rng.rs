//! Seedable pseudo-random source
//!
//! Reproducibility over quality: a seeded `Rng` runs a small integer mixing
//! function whose output is folded into [0, 1) with a fixed resolution, so the
//! same seed always replays the same spawn positions, jitter and visual variety.
//! `Rng::from_system_random` opts out of determinism and draws from PCG seeded
//! by the OS.

use glam::Vec2;
use rand::{Rng as _, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Printable ASCII range used for hashing and generating text seeds
const MIN_CHAR_CODE: u8 = 33;
const MAX_CHAR_CODE: u8 = 127;
/// Length of generated text seeds
const RANDOM_SEED_LENGTH: usize = 20;
/// Every `fract()` is a multiple of 1 / RESOLUTION
const RESOLUTION: u32 = 100_000;

/// Seed for a deterministic `Rng`
///
/// Numbers are used directly as the initial state; text is hashed into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u32),
    Text(String),
}

impl Seed {
    /// Generate a random printable text seed
    pub fn random() -> Self {
        let mut os = rand::rng();
        let text = (0..RANDOM_SEED_LENGTH)
            .map(|_| char::from(os.random_range(MIN_CHAR_CODE..MAX_CHAR_CODE)))
            .collect();
        Seed::Text(text)
    }

    /// Initial generator state for this seed
    ///
    /// Text is hashed as its quoted form: a character-code weighted sum where
    /// each code (offset by 33) is multiplied by its 1-based position.
    pub fn to_state(&self) -> u32 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(text) => {
                if let Ok(n) = text.trim().parse::<u32>() {
                    return n;
                }
                let quoted = std::iter::once('"')
                    .chain(text.chars())
                    .chain(std::iter::once('"'));
                let sum: i64 = quoted
                    .enumerate()
                    .map(|(i, c)| (c as i64 - MIN_CHAR_CODE as i64) * (i as i64 + 1))
                    .sum();
                sum.unsigned_abs() as u32
            }
        }
    }
}

impl From<u32> for Seed {
    fn from(n: u32) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_string())
    }
}

impl From<String> for Seed {
    fn from(text: String) -> Self {
        Seed::Text(text)
    }
}

#[derive(Debug, Clone)]
enum Source {
    /// Deterministic integer mixer
    Mixer { state: u32 },
    /// Non-reproducible, OS-seeded
    Entropy(Pcg32),
}

/// Random number generator used by spawners, abilities and effects
#[derive(Debug, Clone)]
pub struct Rng {
    seed: Seed,
    source: Source,
}

impl Rng {
    /// Deterministic generator for the given seed
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        let state = seed.to_state();
        Self {
            seed,
            source: Source::Mixer { state },
        }
    }

    /// Deterministic generator with a freshly generated text seed
    pub fn with_random_seed() -> Self {
        Self::new(Seed::random())
    }

    /// Generator backed by system randomness; sequences are not reproducible
    pub fn from_system_random() -> Self {
        Self {
            seed: Seed::Text(String::new()),
            source: Source::Entropy(Pcg32::from_rng(&mut rand::rng())),
        }
    }

    /// Restart the deterministic sequence from a new seed
    pub fn reseed(&mut self, seed: impl Into<Seed>) -> &mut Self {
        *self = Self::new(seed);
        self
    }

    /// Overwrite the mixer state (switches an entropy-backed generator to the mixer)
    pub fn set_state(&mut self, state: u32) -> &mut Self {
        self.source = Source::Mixer { state };
        self
    }

    /// Current mixer state, `None` for entropy-backed generators
    pub fn state(&self) -> Option<u32> {
        match self.source {
            Source::Mixer { state } => Some(state),
            Source::Entropy(_) => None,
        }
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.source, Source::Mixer { .. })
    }

    /// Random float in [0, 1)
    pub fn fract(&mut self) -> f32 {
        let raw = match &mut self.source {
            Source::Mixer { state } => {
                *state = state.wrapping_add(0xe120_fc15);
                let tmp = *state as u64 * 0x4a39_b70d;
                let m1 = ((tmp >> 32) ^ tmp) as u32;
                let tmp = m1 as u64 * 0x12fa_d5c9;
                ((tmp >> 32) ^ tmp) as u32
            }
            Source::Entropy(pcg) => pcg.random::<u32>(),
        };
        (raw % RESOLUTION) as f32 / RESOLUTION as f32
    }

    /// Random float in [min, max)
    pub fn float(&mut self, min: f32, max: f32) -> f32 {
        self.fract() * (max - min) + min
    }

    /// Random integer in [min, max)
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        let value = self.float(min as f32, max as f32).floor() as i32;
        if max > min { value.clamp(min, max - 1) } else { value }
    }

    /// Random element of `options`, `None` when empty
    pub fn choice<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        let index = self.int(0, options.len() as i32) as usize;
        options.get(index)
    }

    /// `n` random elements of `options`
    ///
    /// With `unique`, repeats are redrawn. The request is rejected up front when
    /// fewer than `n` distinct options exist, since redrawing could never finish.
    pub fn choices<T: Clone + PartialEq>(
        &mut self,
        options: &[T],
        n: usize,
        unique: bool,
    ) -> Result<Vec<T>, ConfigError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let available = if unique {
            distinct_count(options)
        } else if options.is_empty() {
            0
        } else {
            usize::MAX
        };
        if n > available {
            return Err(ConfigError::NotEnoughUniqueOptions {
                requested: n,
                available: distinct_count(options),
            });
        }

        let mut picked: Vec<T> = Vec::with_capacity(n);
        while picked.len() < n {
            let Some(candidate) = self.choice(options) else {
                break;
            };
            if unique && picked.contains(candidate) {
                continue;
            }
            picked.push(candidate.clone());
        }
        Ok(picked)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.fract() < p
    }

    pub fn bool(&mut self) -> bool {
        self.fract() > 0.5
    }

    /// Randomly 1.0 or -1.0
    pub fn sign(&mut self) -> f32 {
        if self.bool() { 1.0 } else { -1.0 }
    }

    /// Pick from `options` with probability proportional to the parallel `weights`
    pub fn weighted_pick<'a, T>(
        &mut self,
        options: &'a [T],
        weights: &[f32],
    ) -> Result<&'a T, ConfigError> {
        if options.len() != weights.len() {
            return Err(ConfigError::WeightMismatch {
                options: options.len(),
                weights: weights.len(),
            });
        }
        let total: f32 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(ConfigError::ZeroTotalWeight);
        }

        let mut pick = self.float(0.0, total);
        for (option, weight) in options.iter().zip(weights) {
            pick -= weight;
            if pick < 0.0 {
                return Ok(option);
            }
        }
        // Float rounding can leave `pick` at exactly zero; settle on the last weighted option
        options
            .iter()
            .zip(weights)
            .rev()
            .find(|(_, w)| **w > 0.0)
            .map(|(option, _)| option)
            .ok_or(ConfigError::ZeroTotalWeight)
    }

    /// Shuffled copy of `items` (every slot swapped with a random slot)
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        let len = shuffled.len();
        for i in 0..len {
            let j = self.int(0, len as i32) as usize;
            shuffled.swap(i, j);
        }
        shuffled
    }

    /// Roll one die with `size` faces (1..=size); a faceless die rolls 0
    pub fn dice(&mut self, size: u32) -> u32 {
        if size == 0 {
            return 0;
        }
        self.int(1, size as i32 + 1) as u32
    }

    /// Roll `count` dice with `size` faces
    pub fn dice_pool(&mut self, size: u32, count: usize) -> Vec<u32> {
        (0..count).map(|_| self.dice(size)).collect()
    }

    /// Random point inside the box spanned by `min` and `max`
    pub fn point(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.float(min.x, max.x), self.float(min.y, max.y))
    }
}

fn distinct_count<T: PartialEq>(options: &[T]) -> usize {
    options
        .iter()
        .enumerate()
        .filter(|(i, item)| !options[..*i].contains(item))
        .count()
}
