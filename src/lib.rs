//! WristPop - a webcam motion-interaction game core
//!
//! Players raise a hand to start, then pop falling balls by moving their
//! wrists. Wrist positions arrive from one of two sources: an in-process
//! pose-estimation callback or an external motion-sensing application over a
//! local socket.
//!
//! Core modules:
//! - `tracking`: dual-source wrist pipeline (smoothing, source arbitration,
//!   start-gesture detection)
//! - `sim`: game session state machine and ball/entity management
//! - `remote`: wire protocol, sensor link, rate-limited telemetry publisher
//! - `engine`: per-frame orchestration tying the pieces together
//!
//! Rendering, camera capture and the raw socket are collaborators outside
//! this crate; the engine exposes read accessors and sink/link attach points
//! for them.

pub mod engine;
pub mod remote;
pub mod settings;
pub mod sim;
pub mod tracking;

pub use engine::Engine;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default play-field size in pixels (matches the camera canvas)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Minimum pose-estimation confidence for a wrist sample to be accepted
    pub const WRIST_SCORE_MIN: f32 = 0.2;
    /// Raw samples kept per wrist for the weighted moving average
    pub const HISTORY_DEPTH: usize = 5;

    /// Fraction of field height; a wrist above this line counts as raised
    pub const RAISE_LINE_FRAC: f32 = 0.6;
    /// How long the start gesture must be held (ms)
    pub const CALIBRATION_MS: f64 = 2000.0;

    /// Delay before game over automatically returns to waiting (ms)
    pub const GAME_OVER_RESET_MS: f64 = 3000.0;

    /// Ball population policy
    pub const SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const MIN_BALLS: usize = 5;
    pub const FORCE_SPAWN_BELOW: usize = 3;
    pub const MAX_BALLS: usize = 15;

    /// Collision probe padding - generous, so noisy tracking still feels fair
    pub const HIT_PADDING: f32 = 60.0;
    /// A popped ball grows and speeds up before it falls off the field
    pub const POP_SIZE_MULT: f32 = 1.5;
    pub const POP_SPEED_MULT: f32 = 1.5;

    /// Level 1 parameters
    pub const BASE_BALL_COUNT: u32 = 5;
    pub const BASE_BALL_SPEED: f32 = 2.0;
    pub const BASE_BALL_SIZE: f32 = 50.0;
    /// Per-level difficulty steps and their limits
    pub const LEVEL_BALL_COUNT_STEP: u32 = 2;
    pub const LEVEL_BALL_COUNT_CAP: u32 = 15;
    pub const LEVEL_SPEED_STEP: f32 = 0.5;
    pub const LEVEL_SPEED_CAP: f32 = 5.0;
    pub const LEVEL_SIZE_STEP: f32 = 2.0;
    pub const LEVEL_SIZE_FLOOR: f32 = 20.0;

    /// Pop feedback entities
    pub const MAX_PARTICLES: usize = 150;
    pub const PARTICLES_PER_POP: usize = 8;
    pub const PARTICLE_LIFE_DECAY: f32 = 0.025;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const SCORE_TEXT_MAX_AGE: u32 = 60;
    pub const SCORE_TEXT_RISE: f32 = 1.0;

    /// Outbound telemetry pacing (~30 updates/second)
    pub const TELEMETRY_INTERVAL_MS: f64 = 33.0;
}
