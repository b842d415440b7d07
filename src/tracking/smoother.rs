//! Positional smoothing over a short history window
//!
//! A linearly weighted moving average: the sample at position `i` (0 =
//! oldest) gets weight `i + 1`, so recent samples dominate without keeping
//! any exponential-decay state. The window is a small bounded FIFO per wrist.

use glam::Vec2;

use super::arbiter::WristSide;
use crate::consts::HISTORY_DEPTH;

/// Bounded FIFO of raw position samples for one wrist
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    samples: Vec<Vec2>,
}

impl PositionHistory {
    /// Append a raw sample, evicting the oldest once the window is full.
    pub fn push(&mut self, raw: Vec2) {
        self.samples.push(raw);
        if self.samples.len() > HISTORY_DEPTH {
            self.samples.remove(0);
        }
    }

    /// Linearly weighted average of the window, oldest first.
    ///
    /// A single-sample window returns that sample unchanged.
    pub fn weighted_average(&self) -> Option<Vec2> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sum = Vec2::ZERO;
        let mut total = 0.0;
        for (i, sample) in self.samples.iter().enumerate() {
            let weight = (i + 1) as f32;
            sum += *sample * weight;
            total += weight;
        }
        Some(sum / total)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order, oldest first.
    pub fn samples(&self) -> &[Vec2] {
        &self.samples
    }
}

/// Per-wrist smoothing state
#[derive(Debug, Clone, Default)]
pub struct Smoother {
    left: PositionHistory,
    right: PositionHistory,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw sample for one wrist and return the smoothed position.
    pub fn smooth(&mut self, side: WristSide, raw: Vec2) -> Vec2 {
        let history = self.history_mut(side);
        history.push(raw);
        history.weighted_average().unwrap_or(raw)
    }

    pub fn history(&self, side: WristSide) -> &PositionHistory {
        match side {
            WristSide::Left => &self.left,
            WristSide::Right => &self.right,
        }
    }

    fn history_mut(&mut self, side: WristSide) -> &mut PositionHistory {
        match side {
            WristSide::Left => &mut self.left,
            WristSide::Right => &mut self.right,
        }
    }
}
