//! Bounded random draws for level generation.
//!
//! Every generation stage pulls from a single [`RandomSource`] in a fixed order.
//! Network peers replay the same seed and must arrive at identical levels, so
//! both the number of draws and their bounds are part of the output contract.

use serde::{Deserialize, Serialize};

const MULTIPLIER: i32 = 0x015A_4E35;
const INCREMENT: i32 = 1;

/// Source of bounded integers in `[0, bound)`.
///
/// Implementations must return `0` without consuming anything when
/// `bound <= 0`.
pub trait RandomSource {
    fn next(&mut self, bound: i32) -> i32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next(&mut self, bound: i32) -> i32 {
        (**self).next(bound)
    }
}

/// The engine's 32-bit linear congruential generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRng {
    state: i32,
    draws: u64,
}

impl LevelRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed as i32, draws: 0 }
    }

    /// Number of values consumed since seeding.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.draws += 1;
        self.state.unsigned_abs()
    }
}

impl RandomSource for LevelRng {
    fn next(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        let bound = bound as u32;
        let value = if bound < 0xFFFF { (self.advance() >> 16) % bound } else { self.advance() % bound };
        value as i32
    }
}

/// One consumed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngDraw {
    pub bound: i32,
    pub value: i32,
}

/// Wraps a source and records every value-consuming draw.
#[derive(Debug)]
pub struct RecordingRng<R> {
    inner: R,
    trace: Vec<RngDraw>,
}

impl<R: RandomSource> RecordingRng<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, trace: Vec::new() }
    }

    pub fn trace(&self) -> &[RngDraw] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<RngDraw> {
        self.trace
    }
}

impl<R: RandomSource> RandomSource for RecordingRng<R> {
    fn next(&mut self, bound: i32) -> i32 {
        let value = self.inner.next(bound);
        if bound > 0 {
            self.trace.push(RngDraw { bound, value });
        }
        value
    }
}

/// Plays back a recorded draw sequence.
///
/// Panics when a draw is requested with a different bound than recorded, or
/// after the recording runs out: either means the caller diverged from the
/// sequence that produced the recording.
#[derive(Clone, Debug)]
pub struct ReplayRng {
    draws: Vec<RngDraw>,
    cursor: usize,
}

impl ReplayRng {
    pub fn new(draws: Vec<RngDraw>) -> Self {
        Self { draws, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len() - self.cursor
    }
}

impl RandomSource for ReplayRng {
    fn next(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        let Some(draw) = self.draws.get(self.cursor) else {
            panic!("replay exhausted after {} draws (next bound {bound})", self.cursor);
        };
        assert_eq!(
            draw.bound, bound,
            "replay diverged at draw {}: recorded bound {}, requested {bound}",
            self.cursor, draw.bound
        );
        self.cursor += 1;
        draw.value
    }
}
