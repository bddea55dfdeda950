//! Injectable random sources for battle rolls.
//!
//! Every roll the engine makes (accuracy, jam, power surge, deck shuffles)
//! is drawn from a single [`RngSource`] handed to the entrypoint by the
//! caller. Nothing reads ambient entropy, so a seeded source replays an
//! encounter exactly.

use std::collections::VecDeque;

/// Random source consumed by the battle engine.
///
/// Only [`RngSource::next_u32`] is required; the derived helpers define how
/// the engine turns raw bits into probabilities and indices.
pub trait RngSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform roll in `[0, 100)`, used for accuracy checks.
    fn roll_percent(&mut self) -> f64 {
        self.next_f64() * 100.0
    }

    /// Returns true with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform index in `[0, upper)`. Returns 0 when `upper <= 1`.
    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        ((self.next_f64() * upper as f64) as usize).min(upper - 1)
    }
}

impl<R: RngSource + ?Sized> RngSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Fisher–Yates shuffle driven by the given source.
pub fn shuffle<T, R: RngSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed sequence of unit floats, for tests and scripted replays.
///
/// Once the queue is exhausted every further draw returns `fallback`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    /// Values are clamped into `[0, 1)`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().map(clamp_unit).collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = clamp_unit(fallback);
        self
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RngSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * (f64::from(u32::MAX) + 1.0)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0 - f64::EPSILON)
}

/// Adapter running the engine on any `rand` generator.
#[cfg(feature = "rand")]
#[derive(Clone, Debug)]
pub struct RandSource<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::RngCore> RngSource for RandSource<R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}
