use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`. Everything random in the scene goes through here.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let scaled = (self.next_unit() * len as f64) as usize;
        scaled.min(len - 1)
    }

    /// Whole milliseconds in `[min_ms, max_ms)`; returns `min_ms` for an empty range.
    fn range_ms(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        if max_ms <= min_ms {
            return min_ms;
        }
        let span = max_ms - min_ms;
        let offset = (self.next_unit() * span as f64) as u64;
        min_ms + offset.min(span - 1)
    }
}

impl fmt::Debug for dyn RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RandomSource")
    }
}

#[derive(Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Seeded when `seed` is present, entropy otherwise.
pub fn random_source_for(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(StdRandom::seeded(seed)),
        None => Box::new(StdRandom::from_entropy()),
    }
}

/// Replays a fixed list of draws, then keeps returning `fallback`.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self::with_fallback(values, 0.5)
    }

    pub fn with_fallback(values: Vec<f64>, fallback: f64) -> Self {
        Self {
            values: values.into_iter().map(clamp_unit).collect(),
            fallback: clamp_unit(fallback),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0 - f64::EPSILON)
}
