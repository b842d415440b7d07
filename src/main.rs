//! WristPop demo entry point
//!
//! Drives the core against a simulated sensor feed: the fake player holds a
//! wrist raised through the calibration window to start, then sweeps it
//! across the field popping balls. Useful for exercising the whole pipeline
//! without a camera or sensor app attached.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use wristpop::Engine;
use wristpop::Settings;
use wristpop::remote::{InboundMessage, OutboundMessage, SensorHandle, SensorLink};
use wristpop::tracking::WristSide;

fn main() {
    env_logger::init();
    log::info!("wristpop demo starting (simulated sensor feed)");

    let settings = Settings {
        use_external_sensors: true,
        ..Settings::default()
    };
    let field_width = settings.field_width;
    let field_height = settings.field_height;
    let mut engine = Engine::new(settings, 0xC0FFEE);

    let (handle, link) = SensorLink::channel();
    engine.attach_sensor(link);

    let (tx, rx) = mpsc::channel::<OutboundMessage>();
    engine.attach_sink(Box::new(tx));

    thread::spawn(move || simulate_player(handle, field_width, field_height));

    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(20) {
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        engine.frame(now_ms);

        // Drain telemetry the way a socket writer would
        while let Ok(message) = rx.try_recv() {
            match message {
                OutboundMessage::GameStateChange { game_state } => {
                    log::info!("telemetry: game state -> {game_state}");
                }
                OutboundMessage::LevelChange { level } => {
                    log::info!("telemetry: level -> {level}");
                }
                OutboundMessage::GameOver { score } => {
                    log::info!("telemetry: game over, score {score}");
                }
                _ => {}
            }
        }

        thread::sleep(Duration::from_millis(16));
    }

    let session = engine.session();
    log::info!(
        "demo finished: level {} score {} ({} balls on field)",
        session.level,
        session.score,
        session.balls.len()
    );
}

/// Fake player: hold the right wrist raised, then sweep it back and forth
/// through the middle of the field.
fn simulate_player(handle: SensorHandle, field_width: f32, field_height: f32) {
    let start = Instant::now();
    loop {
        let elapsed = start.elapsed().as_secs_f32();
        let (x, y) = if elapsed < 2.5 {
            // Hold raised for the calibration window
            (field_width * 0.5, field_height * 0.3)
        } else {
            // Sweep across the interaction zone
            let phase = (elapsed - 2.5) * 1.2;
            (
                field_width * (0.5 + 0.45 * phase.sin()),
                field_height * (0.5 + 0.2 * (phase * 0.7).cos()),
            )
        };

        let sent = handle.send(InboundMessage::SetWrist {
            wrist: WristSide::Right,
            x,
            y,
            active: true,
        });
        if !sent {
            // Engine side is gone; we're done
            return;
        }
        thread::sleep(Duration::from_millis(16));
    }
}
