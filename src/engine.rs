//! Per-frame orchestration
//!
//! One cooperative tick per rendering frame, in strict order: ingest
//! whatever tracking data arrived since the last frame, update game logic,
//! then publish throttled telemetry. The host calls [`Engine::frame`] from
//! its render loop and reads back whatever it needs to draw.
//!
//! Pose results and sensor messages arrive between frames and are buffered;
//! within a frame the last write per source wins. Nothing here blocks, and
//! no inbound data can break a frame.

use glam::Vec2;

use crate::remote::{
    InboundMessage, OutboundMessage, SensorLink, TelemetryPublisher, TelemetrySink,
};
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameSession, TickInput};
use crate::tracking::{
    ArbiterStatus, GestureDetector, Keypoint, SourceArbiter, TrackingSnapshot, TrackingSource,
};

/// Owns the whole pipeline and drives it once per frame
pub struct Engine {
    settings: Settings,
    arbiter: SourceArbiter,
    detector: GestureDetector,
    session: GameSession,
    publisher: TelemetryPublisher,
    sensor: Option<SensorLink>,
    sink: Option<Box<dyn TelemetrySink>>,
    input: TickInput,
    pending_pose: Option<Vec<Keypoint>>,
}

impl Engine {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut arbiter = SourceArbiter::new();
        if settings.use_external_sensors {
            arbiter.set_source(TrackingSource::ExternalSensor);
        }
        Self {
            settings,
            arbiter,
            detector: GestureDetector::new(),
            session: GameSession::new(seed),
            publisher: TelemetryPublisher::new(),
            sensor: None,
            sink: None,
            input: TickInput::default(),
            pending_pose: None,
        }
    }

    /// Attach the inbound sensor link (socket reader side).
    pub fn attach_sensor(&mut self, link: SensorLink) {
        self.sensor = Some(link);
    }

    /// Attach the outbound telemetry consumer and announce readiness.
    pub fn attach_sink(&mut self, mut sink: Box<dyn TelemetrySink>) {
        sink.publish(OutboundMessage::Connection {
            status: self.arbiter.status().as_str().to_owned(),
        });
        self.sink = Some(sink);
    }

    /// Latest pose-estimation callback result, buffered until the next
    /// frame. Calling twice between frames keeps only the newest result.
    pub fn on_pose(&mut self, keypoints: Vec<Keypoint>) {
        self.pending_pose = Some(keypoints);
    }

    /// Pose estimation cannot run in this environment; degrade to
    /// external-sensor-only operation.
    pub fn on_pose_unavailable(&mut self) {
        self.arbiter.local_pose_unavailable();
    }

    /// Pointer press: start while waiting, collision probe while playing.
    pub fn on_pointer(&mut self, x: f32, y: f32) {
        match self.session.phase {
            GamePhase::Waiting => self.input.start = true,
            GamePhase::Playing => self.input.probe = Some(Vec2::new(x, y)),
            GamePhase::GameOver => {}
        }
    }

    pub fn request_start(&mut self) {
        self.input.start = true;
    }

    pub fn request_reset(&mut self) {
        self.input.reset = true;
    }

    /// Run one frame at the given host timestamp (milliseconds).
    pub fn frame(&mut self, now_ms: f64) {
        // (a) ingestion: sensor messages first, then the pose callback;
        // the arbiter's source gate ensures only one of them writes
        self.arbiter.begin_cycle();
        let messages = match self.sensor.as_mut() {
            Some(link) => link.drain(),
            None => Vec::new(),
        };
        for message in messages {
            self.apply_message(message);
        }
        if let Some(keypoints) = self.pending_pose.take() {
            self.arbiter.ingest_local_pose(&keypoints);
        }

        // (b) game-logic update
        let snapshot = *self.arbiter.snapshot();
        let input = std::mem::take(&mut self.input);
        sim::tick(
            &mut self.session,
            &snapshot,
            &mut self.detector,
            &input,
            &self.settings,
            now_ms,
        );

        if self.settings.debug_mode {
            log::debug!(
                "frame t={now_ms:.0} phase={} score={} balls={}",
                self.session.phase.as_str(),
                self.session.score,
                self.session.balls.len()
            );
        }

        // (c) rendering happens host-side between here and the next frame

        // (d) throttled telemetry; with nobody attached, events are dropped
        // so the queue cannot grow
        match self.sink.as_mut() {
            Some(sink) => {
                self.publisher
                    .publish(&mut self.session, &snapshot, now_ms, sink.as_mut());
            }
            None => {
                self.session.take_events();
            }
        }
    }

    fn apply_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::Ping => {
                if let Some(sink) = self.sink.as_mut() {
                    sink.publish(OutboundMessage::Pong);
                }
            }
            InboundMessage::SetWrist {
                wrist,
                x,
                y,
                active,
            } => {
                if self.arbiter.source() != TrackingSource::ExternalSensor {
                    log::info!("external wrist data arrived; switching tracking source");
                    self.arbiter.set_source(TrackingSource::ExternalSensor);
                    self.settings.use_external_sensors = true;
                }
                self.arbiter.ingest_external(wrist, Vec2::new(x, y), active);
            }
            InboundMessage::Config {
                use_external_sensors,
                debug_mode,
            } => {
                self.settings.apply_config(use_external_sensors, debug_mode);
                if let Some(external) = use_external_sensors {
                    self.arbiter.set_source(if external {
                        TrackingSource::ExternalSensor
                    } else {
                        TrackingSource::LocalPose
                    });
                }
            }
            InboundMessage::StartGame => self.input.start = true,
            InboundMessage::ResetGame => self.input.reset = true,
        }
    }

    // Read accessors for the presentation layer

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn snapshot(&self) -> &TrackingSnapshot {
        self.arbiter.snapshot()
    }

    /// Start-gesture hold progress in [0, 1].
    pub fn calibration_progress(&self) -> f32 {
        self.detector.progress()
    }

    pub fn status(&self) -> ArbiterStatus {
        self.arbiter.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::SensorLink;
    use crate::sim::GamePhase;
    use crate::tracking::WristSide;
    use std::sync::mpsc;

    fn engine_with_plumbing() -> (
        Engine,
        crate::remote::SensorHandle,
        mpsc::Receiver<OutboundMessage>,
    ) {
        let mut engine = Engine::new(Settings::default(), 42);
        let (handle, link) = SensorLink::channel();
        engine.attach_sensor(link);
        let (tx, rx) = mpsc::channel();
        engine.attach_sink(Box::new(tx));
        (engine, handle, rx)
    }

    fn drain(rx: &mpsc::Receiver<OutboundMessage>) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[test]
    fn test_connection_announced_on_attach() {
        let (_, _, rx) = engine_with_plumbing();
        let messages = drain(&rx);
        assert!(matches!(
            &messages[0],
            OutboundMessage::Connection { status } if status == "ready"
        ));
    }

    #[test]
    fn test_ping_answered_with_pong() {
        let (mut engine, handle, rx) = engine_with_plumbing();
        drain(&rx);
        handle.send(InboundMessage::Ping);
        engine.frame(0.0);
        assert!(drain(&rx).iter().any(|m| matches!(m, OutboundMessage::Pong)));
    }

    #[test]
    fn test_start_and_reset_commands_drive_the_session() {
        let (mut engine, handle, rx) = engine_with_plumbing();
        drain(&rx);

        handle.send(InboundMessage::StartGame);
        engine.frame(0.0);
        assert_eq!(engine.session().phase, GamePhase::Playing);
        assert!(drain(&rx).iter().any(|m| matches!(
            m,
            OutboundMessage::GameStateChange { game_state } if game_state == "playing"
        )));

        handle.send(InboundMessage::ResetGame);
        engine.frame(16.0);
        assert_eq!(engine.session().phase, GamePhase::Waiting);
    }

    #[test]
    fn test_first_wrist_sample_switches_source_and_tracks() {
        let (mut engine, handle, rx) = engine_with_plumbing();
        drain(&rx);

        handle.send(InboundMessage::SetWrist {
            wrist: WristSide::Right,
            x: 320.0,
            y: 100.0,
            active: true,
        });
        engine.frame(0.0);

        assert!(engine.settings().use_external_sensors);
        assert!(engine.snapshot().right.active);
        assert_eq!(engine.snapshot().right.pos, Vec2::new(320.0, 100.0));
    }

    #[test]
    fn test_held_external_wrist_starts_game_through_engine() {
        let (mut engine, handle, rx) = engine_with_plumbing();
        drain(&rx);

        // Raised wrist held across the calibration window, one frame per ~16ms
        let mut now = 0.0;
        while now <= 2100.0 {
            handle.send(InboundMessage::SetWrist {
                wrist: WristSide::Left,
                x: 320.0,
                y: 100.0,
                active: true,
            });
            engine.frame(now);
            now += 16.0;
        }

        assert_eq!(engine.session().phase, GamePhase::Playing);
        assert!(engine.session().balls.len() >= 5);
    }

    #[test]
    fn test_pointer_probe_scores_while_playing() {
        let (mut engine, _, rx) = engine_with_plumbing();
        drain(&rx);

        engine.request_start();
        engine.frame(0.0);
        assert_eq!(engine.session().phase, GamePhase::Playing);

        let target = engine.session().balls[0].pos;
        engine.on_pointer(target.x, target.y);
        engine.frame(16.0);
        // At least the targeted ball pops; neighbors within the padded
        // radius may go with it
        assert!(engine.session().score >= 1);

        engine.request_reset();
        engine.frame(32.0);
        assert_eq!(engine.session().phase, GamePhase::Waiting);
        assert_eq!(engine.session().score, 0);
    }

    #[test]
    fn test_malformed_frames_never_reach_the_engine() {
        let (mut engine, handle, rx) = engine_with_plumbing();
        drain(&rx);
        assert!(!handle.feed_json(r#"{"type":"setWrist","wrist":"up"}"#));
        engine.frame(0.0);
        assert_eq!(engine.session().phase, GamePhase::Waiting);
    }
}
