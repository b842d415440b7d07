//! Tracking source arbitration
//!
//! Exactly one source is authoritative per frame: the local pose estimator or
//! the external sensor app. The arbiter gates ingestion on the configured
//! source, smooths every accepted sample, and re-asserts `active` flags each
//! cycle so a stale position never reads as live.
//!
//! Source selection is an explicit configuration value. Per-wrist smoothing
//! history deliberately survives a source switch: the window is keyed by
//! wrist identity, not by where the sample came from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::smoother::{PositionHistory, Smoother};
use crate::consts::WRIST_SCORE_MIN;

/// Logical wrist identity, shared with the wire protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WristSide {
    Left,
    Right,
}

/// Named parts emitted by the pose model.
///
/// The game consumes wrists only; everything else collapses to `Other` and is
/// dropped before it ever reaches the smoother.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypointKind {
    LeftWrist,
    RightWrist,
    Other,
}

/// One detected keypoint from the pose collaborator
#[derive(Debug, Clone, Copy)]
pub struct Keypoint {
    pub part: KeypointKind,
    pub pos: Vec2,
    /// Model confidence in [0, 1]
    pub score: f32,
}

/// Best-known state of one wrist this frame
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TrackedPoint {
    pub pos: Vec2,
    pub active: bool,
}

/// The unified position state gameplay reads every frame
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TrackingSnapshot {
    pub left: TrackedPoint,
    pub right: TrackedPoint,
}

impl TrackingSnapshot {
    pub fn point(&self, side: WristSide) -> &TrackedPoint {
        match side {
            WristSide::Left => &self.left,
            WristSide::Right => &self.right,
        }
    }

    fn point_mut(&mut self, side: WristSide) -> &mut TrackedPoint {
        match side {
            WristSide::Left => &mut self.left,
            WristSide::Right => &mut self.right,
        }
    }
}

/// Which input feed owns the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingSource {
    LocalPose,
    ExternalSensor,
}

/// Readiness as reported to the external consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterStatus {
    Ready,
    /// Pose estimation is unavailable; only external sensor data can drive
    /// the game
    ReadyExternalOnly,
}

impl ArbiterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArbiterStatus::Ready => "ready",
            ArbiterStatus::ReadyExternalOnly => "ready, external-only",
        }
    }
}

/// Normalizes both tracking feeds into one smoothed snapshot
#[derive(Debug)]
pub struct SourceArbiter {
    source: TrackingSource,
    pose_available: bool,
    smoother: Smoother,
    snapshot: TrackingSnapshot,
}

impl Default for SourceArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceArbiter {
    pub fn new() -> Self {
        Self {
            source: TrackingSource::LocalPose,
            pose_available: true,
            smoother: Smoother::new(),
            snapshot: TrackingSnapshot::default(),
        }
    }

    pub fn source(&self) -> TrackingSource {
        self.source
    }

    /// Select the authoritative source.
    ///
    /// Smoothing history is preserved across the switch. Once pose
    /// estimation has been reported unavailable, switching back to it is
    /// refused.
    pub fn set_source(&mut self, source: TrackingSource) {
        if source == TrackingSource::LocalPose && !self.pose_available {
            log::warn!("ignoring switch to local pose: pose estimation unavailable");
            return;
        }
        if source != self.source {
            log::info!("tracking source -> {source:?}");
            self.source = source;
        }
    }

    /// Pose estimation cannot run in this environment; degrade to
    /// external-sensor-only operation.
    pub fn local_pose_unavailable(&mut self) {
        self.pose_available = false;
        self.source = TrackingSource::ExternalSensor;
        log::warn!("pose estimation unavailable, running external-only");
    }

    pub fn status(&self) -> ArbiterStatus {
        if self.pose_available {
            ArbiterStatus::Ready
        } else {
            ArbiterStatus::ReadyExternalOnly
        }
    }

    pub fn snapshot(&self) -> &TrackingSnapshot {
        &self.snapshot
    }

    /// History window for one wrist (diagnostics, tests).
    pub fn history(&self, side: WristSide) -> &PositionHistory {
        self.smoother.history(side)
    }

    /// Start a new ingestion cycle: both wrists read inactive until a source
    /// re-asserts them this frame.
    pub fn begin_cycle(&mut self) {
        self.snapshot.left.active = false;
        self.snapshot.right.active = false;
    }

    /// Consume one pose-estimation result. No-op unless the local source is
    /// authoritative. Only wrist keypoints above the confidence floor are
    /// accepted.
    pub fn ingest_local_pose(&mut self, keypoints: &[Keypoint]) {
        if self.source != TrackingSource::LocalPose {
            return;
        }
        for keypoint in keypoints {
            let side = match keypoint.part {
                KeypointKind::LeftWrist => WristSide::Left,
                KeypointKind::RightWrist => WristSide::Right,
                KeypointKind::Other => continue,
            };
            if keypoint.score <= WRIST_SCORE_MIN {
                continue;
            }
            self.write(side, keypoint.pos);
        }
    }

    /// Consume one external-sensor wrist sample. No-op unless the external
    /// source is authoritative.
    pub fn ingest_external(&mut self, side: WristSide, pos: Vec2, active: bool) {
        if self.source != TrackingSource::ExternalSensor {
            return;
        }
        if active {
            self.write(side, pos);
        } else {
            // Last write wins within a tick: an explicit inactive sample
            // overrides an earlier active one.
            self.snapshot.point_mut(side).active = false;
        }
    }

    fn write(&mut self, side: WristSide, raw: Vec2) {
        let smoothed = self.smoother.smooth(side, raw);
        let point = self.snapshot.point_mut(side);
        point.pos = smoothed;
        point.active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrist(part: KeypointKind, x: f32, y: f32, score: f32) -> Keypoint {
        Keypoint {
            part,
            pos: Vec2::new(x, y),
            score,
        }
    }

    #[test]
    fn test_low_confidence_rejected() {
        let mut arbiter = SourceArbiter::new();
        arbiter.begin_cycle();
        arbiter.ingest_local_pose(&[wrist(KeypointKind::LeftWrist, 10.0, 10.0, 0.1)]);
        assert!(!arbiter.snapshot().left.active);

        arbiter.ingest_local_pose(&[wrist(KeypointKind::LeftWrist, 10.0, 10.0, 0.9)]);
        assert!(arbiter.snapshot().left.active);
    }

    #[test]
    fn test_non_wrist_keypoints_ignored() {
        let mut arbiter = SourceArbiter::new();
        arbiter.begin_cycle();
        arbiter.ingest_local_pose(&[wrist(KeypointKind::Other, 10.0, 10.0, 0.99)]);
        assert!(!arbiter.snapshot().left.active);
        assert!(!arbiter.snapshot().right.active);
        assert!(arbiter.history(WristSide::Left).is_empty());
    }

    #[test]
    fn test_source_gating_both_ways() {
        let mut arbiter = SourceArbiter::new();
        arbiter.begin_cycle();
        // External data while local is authoritative: dropped
        arbiter.ingest_external(WristSide::Right, Vec2::new(50.0, 50.0), true);
        assert!(!arbiter.snapshot().right.active);

        arbiter.set_source(TrackingSource::ExternalSensor);
        // Local pose while external is authoritative: dropped
        arbiter.ingest_local_pose(&[wrist(KeypointKind::RightWrist, 1.0, 1.0, 0.9)]);
        assert!(!arbiter.snapshot().right.active);

        arbiter.ingest_external(WristSide::Right, Vec2::new(50.0, 50.0), true);
        assert!(arbiter.snapshot().right.active);
    }

    #[test]
    fn test_begin_cycle_clears_active() {
        let mut arbiter = SourceArbiter::new();
        arbiter.begin_cycle();
        arbiter.ingest_local_pose(&[wrist(KeypointKind::LeftWrist, 10.0, 10.0, 0.9)]);
        assert!(arbiter.snapshot().left.active);

        arbiter.begin_cycle();
        assert!(!arbiter.snapshot().left.active);
        // Position sticks around, it just no longer reads as live
        assert_eq!(arbiter.snapshot().left.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_inactive_external_sample_overrides() {
        let mut arbiter = SourceArbiter::new();
        arbiter.set_source(TrackingSource::ExternalSensor);
        arbiter.begin_cycle();
        arbiter.ingest_external(WristSide::Left, Vec2::new(5.0, 5.0), true);
        arbiter.ingest_external(WristSide::Left, Vec2::ZERO, false);
        assert!(!arbiter.snapshot().left.active);
    }

    #[test]
    fn test_history_survives_source_switch() {
        let mut arbiter = SourceArbiter::new();
        arbiter.begin_cycle();
        for _ in 0..4 {
            arbiter.ingest_local_pose(&[wrist(KeypointKind::LeftWrist, 100.0, 100.0, 0.9)]);
        }
        assert_eq!(arbiter.history(WristSide::Left).len(), 4);

        arbiter.set_source(TrackingSource::ExternalSensor);
        arbiter.begin_cycle();
        arbiter.ingest_external(WristSide::Left, Vec2::new(200.0, 200.0), true);

        // The old window still weighs in: smoothed output sits between the
        // local cluster and the new external sample.
        let pos = arbiter.snapshot().left.pos;
        assert!(pos.x > 100.0 && pos.x < 200.0);
        assert_eq!(arbiter.history(WristSide::Left).len(), 5);
    }

    #[test]
    fn test_pose_unavailable_degrades_to_external() {
        let mut arbiter = SourceArbiter::new();
        arbiter.local_pose_unavailable();
        assert_eq!(arbiter.source(), TrackingSource::ExternalSensor);
        assert_eq!(arbiter.status(), ArbiterStatus::ReadyExternalOnly);

        // Switching back is refused
        arbiter.set_source(TrackingSource::LocalPose);
        assert_eq!(arbiter.source(), TrackingSource::ExternalSensor);
    }
}
