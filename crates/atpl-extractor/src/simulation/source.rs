//! Where the simulation gets its dice rolls from.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random outcomes consumed by the simulation and by question retries.
pub trait OutcomeSource: Send {
    /// A whole number in `min..=max`.
    fn increment(&mut self, min: u32, max: u32) -> u32;

    /// True with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// An index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Builds a fresh source for each simulation task.
pub type SourceFactory = Arc<dyn Fn() -> Box<dyn OutcomeSource> + Send + Sync>;

/// Outcomes drawn from a seeded `StdRng`.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn factory() -> SourceFactory {
        Arc::new(|| Box::new(RandomSource::new()) as Box<dyn OutcomeSource>)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeSource for RandomSource {
    fn increment(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Replays fixed outcomes. Once a queue runs dry it answers with the
/// fallback: `min` for increments, `false` for chances, `0` for picks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    increments: VecDeque<u32>,
    chances: VecDeque<bool>,
    picks: VecDeque<usize>,
    fixed_increment: Option<u32>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every increment returns `value` once the scripted ones are used.
    pub fn always_increment(mut self, value: u32) -> Self {
        self.fixed_increment = Some(value);
        self
    }

    pub fn increments(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.increments.extend(values);
        self
    }

    pub fn chances(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(values);
        self
    }

    pub fn picks(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(values);
        self
    }

    /// A factory handing each task its own copy of this script.
    pub fn factory(self) -> SourceFactory {
        Arc::new(move || Box::new(self.clone()) as Box<dyn OutcomeSource>)
    }
}

impl OutcomeSource for ScriptedSource {
    fn increment(&mut self, min: u32, _max: u32) -> u32 {
        self.increments
            .pop_front()
            .or(self.fixed_increment)
            .unwrap_or(min)
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}
