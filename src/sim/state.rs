//! Game session state and entity types
//!
//! Everything the state machine mutates lives here; `sim/tick.rs` drives the
//! transitions. One live session per process, fully reset on every return to
//! waiting.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Idle, watching for the start gesture
    Waiting,
    /// Active gameplay
    Playing,
    /// Run ended; auto-resets to waiting after a fixed delay
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "waiting",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// A falling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Diameter in pixels
    pub size: f32,
    /// Fall speed in pixels per tick
    pub speed: f32,
    /// One-way latch: a popped ball never scores again
    pub touched: bool,
}

impl Ball {
    /// Fully below the bottom edge, ready for retirement.
    pub fn off_screen(&self, field_height: f32) -> bool {
        self.pos.y > field_height + self.size
    }

    /// Latch the touch and give the pop its visual kick: the ball grows and
    /// accelerates before it leaves the field.
    pub fn pop(&mut self) {
        self.touched = true;
        self.size *= POP_SIZE_MULT;
        self.speed *= POP_SPEED_MULT;
    }
}

/// A burst particle from a popped ball
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 down to 0.0, fixed decay per tick
    pub life: f32,
}

/// Floating score feedback above a popped ball
#[derive(Debug, Clone)]
pub struct ScoreText {
    pub pos: Vec2,
    pub age: u32,
    pub max_age: u32,
}

/// Per-level difficulty parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Balls spawned over the course of the level
    pub ball_count: u32,
    /// Base fall speed in pixels per tick
    pub speed: f32,
    /// Base ball diameter in pixels
    pub ball_size: f32,
}

impl LevelParams {
    pub fn first() -> Self {
        Self {
            ball_count: BASE_BALL_COUNT,
            speed: BASE_BALL_SPEED,
            ball_size: BASE_BALL_SIZE,
        }
    }

    /// Advance one level: more, faster, smaller - each within its limit.
    pub fn advance(&mut self) {
        self.ball_count = (self.ball_count + LEVEL_BALL_COUNT_STEP).min(LEVEL_BALL_COUNT_CAP);
        self.speed = (self.speed + LEVEL_SPEED_STEP).min(LEVEL_SPEED_CAP);
        self.ball_size = (self.ball_size - LEVEL_SIZE_STEP).max(LEVEL_SIZE_FLOOR);
    }
}

/// Discrete happenings other components react to (telemetry, host UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StateChange(GamePhase),
    LevelChange(u32),
    GameOver { score: u32 },
    BallHit { score: u32 },
}

/// The one live game session
#[derive(Debug)]
pub struct GameSession {
    pub phase: GamePhase,
    pub score: u32,
    /// 1-based level counter
    pub level: u32,
    pub params: LevelParams,
    pub balls: Vec<Ball>,
    pub particles: Vec<Particle>,
    pub score_texts: Vec<ScoreText>,
    /// Balls spawned so far this level; the level's spawn budget is
    /// `params.ball_count`
    pub(crate) spawned: u32,
    /// Untouched balls that fell off the bottom this level
    pub(crate) missed: u32,
    pub(crate) last_spawn_ms: f64,
    /// Pending gameOver -> waiting deadline; any manual reset clears it
    pub(crate) auto_reset_at: Option<f64>,
    pub(crate) time_ticks: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Fresh session in the waiting phase.
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Waiting,
            score: 0,
            level: 1,
            params: LevelParams::first(),
            balls: Vec::new(),
            particles: Vec::new(),
            score_texts: Vec::new(),
            spawned: 0,
            missed: 0,
            last_spawn_ms: 0.0,
            auto_reset_at: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain events queued since the last call. The telemetry publisher
    /// pulls these once per frame; with no consumer attached the engine
    /// drains and discards them.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_params_respect_limits() {
        let mut params = LevelParams::first();
        let mut prev = params;
        for _ in 0..25 {
            params.advance();
            // Monotone within the limits
            assert!(params.ball_count >= prev.ball_count);
            assert!(params.speed >= prev.speed);
            assert!(params.ball_size <= prev.ball_size);
            prev = params;
        }
        assert_eq!(params.ball_count, LEVEL_BALL_COUNT_CAP);
        assert_eq!(params.speed, LEVEL_SPEED_CAP);
        assert_eq!(params.ball_size, LEVEL_SIZE_FLOOR);
    }

    #[test]
    fn test_ball_pop_latches_and_grows() {
        let mut ball = Ball {
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            speed: 2.0,
            touched: false,
        };
        ball.pop();
        assert!(ball.touched);
        assert!(ball.size > 40.0);
        assert!(ball.speed > 2.0);
    }

    #[test]
    fn test_ball_off_screen_includes_own_size() {
        let ball = Ball {
            pos: Vec2::new(0.0, 500.0),
            size: 40.0,
            speed: 2.0,
            touched: false,
        };
        // 500 < 480 + 40: still partially visible
        assert!(!ball.off_screen(480.0));
        let gone = Ball {
            pos: Vec2::new(0.0, 521.0),
            ..ball
        };
        assert!(gone.off_screen(480.0));
    }

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(GamePhase::Waiting.as_str(), "waiting");
        assert_eq!(GamePhase::GameOver.as_str(), "gameOver");
        let json = serde_json::to_string(&GamePhase::GameOver).unwrap();
        assert_eq!(json, "\"gameOver\"");
    }
}
