//! Start-gesture detection
//!
//! While the session is waiting, raising either wrist above the 60% line and
//! holding it for the calibration window starts the game. The timer is
//! all-or-nothing: the instant the gesture drops, all progress is gone.

use super::arbiter::TrackingSnapshot;
use crate::consts::{CALIBRATION_MS, RAISE_LINE_FRAC};

/// Hold-to-start gesture recogniser
#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    started_at: Option<f64>,
    progress: f32,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's snapshot. Returns `true` exactly once, when the hold
    /// completes; calibration state clears itself at that point.
    pub fn observe(&mut self, snapshot: &TrackingSnapshot, field_height: f32, now_ms: f64) -> bool {
        let raise_line = field_height * RAISE_LINE_FRAC;
        let raised = (snapshot.left.active && snapshot.left.pos.y < raise_line)
            || (snapshot.right.active && snapshot.right.pos.y < raise_line);

        if !raised {
            self.clear();
            return false;
        }

        let started = *self.started_at.get_or_insert(now_ms);
        self.progress = (((now_ms - started) / CALIBRATION_MS) as f32).clamp(0.0, 1.0);
        if self.progress >= 1.0 {
            self.clear();
            return true;
        }
        false
    }

    /// Hold progress in [0, 1] for the presentation layer.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn in_progress(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn clear(&mut self) {
        self.started_at = None;
        self.progress = 0.0;
    }
}
