//! Rate-limited telemetry publication
//!
//! Continuous state flows at roughly 30 updates per second; discrete events
//! (state changes, level changes, hits) go out immediately, ahead of the
//! next throttled frame.

use super::messages::OutboundMessage;
use crate::consts::TELEMETRY_INTERVAL_MS;
use crate::sim::{GameEvent, GameSession};
use crate::tracking::TrackingSnapshot;

/// Consumer of outbound messages: a socket writer thread, or a recording
/// sink in tests.
pub trait TelemetrySink {
    fn publish(&mut self, message: OutboundMessage);
}

/// The natural sink: a channel drained by the socket writer.
impl TelemetrySink for std::sync::mpsc::Sender<OutboundMessage> {
    fn publish(&mut self, message: OutboundMessage) {
        // A gone writer just means nobody is listening anymore
        let _ = self.send(message);
    }
}

impl TelemetrySink for Vec<OutboundMessage> {
    fn publish(&mut self, message: OutboundMessage) {
        self.push(message);
    }
}

/// Throttles continuous updates, passes events straight through
#[derive(Debug)]
pub struct TelemetryPublisher {
    last_update_ms: f64,
}

impl Default for TelemetryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryPublisher {
    pub fn new() -> Self {
        Self {
            last_update_ms: f64::NEG_INFINITY,
        }
    }

    /// Emit queued discrete events immediately, then a throttled update
    /// frame if the interval has elapsed.
    pub fn publish(
        &mut self,
        session: &mut GameSession,
        snapshot: &TrackingSnapshot,
        now_ms: f64,
        sink: &mut dyn TelemetrySink,
    ) {
        for event in session.take_events() {
            sink.publish(event_message(event));
        }
        if now_ms - self.last_update_ms >= TELEMETRY_INTERVAL_MS {
            self.last_update_ms = now_ms;
            sink.publish(OutboundMessage::update(session, snapshot));
        }
    }
}

fn event_message(event: GameEvent) -> OutboundMessage {
    match event {
        GameEvent::StateChange(phase) => OutboundMessage::state_change(phase),
        GameEvent::LevelChange(level) => OutboundMessage::LevelChange { level },
        GameEvent::GameOver { score } => OutboundMessage::GameOver { score },
        GameEvent::BallHit { score } => OutboundMessage::BallHit { score },
    }
}
