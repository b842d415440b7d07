//! Per-frame game update
//!
//! One call per rendering frame drives the whole state machine: gesture
//! watching while waiting, ball population management and collision probes
//! while playing, and the deferred auto-reset after game over.

use glam::Vec2;
use rand::Rng;

use super::collision::check_collision;
use super::state::{Ball, GameEvent, GamePhase, GameSession};
use crate::consts::*;
use crate::settings::Settings;
use crate::tracking::{GestureDetector, TrackingSnapshot, WristSide};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Start request: tap/click/key while waiting, or the external command
    pub start: bool,
    /// Reset request: dedicated control, honored in any state
    pub reset: bool,
    /// Pointer collision probe (while playing)
    pub probe: Option<Vec2>,
}

/// Advance the session by one frame.
pub fn tick(
    session: &mut GameSession,
    snapshot: &TrackingSnapshot,
    detector: &mut GestureDetector,
    input: &TickInput,
    settings: &Settings,
    now_ms: f64,
) {
    // Manual reset wins over everything, including a pending auto-reset.
    if input.reset {
        detector.clear();
        reset_game(session);
        return;
    }

    session.time_ticks += 1;

    match session.phase {
        GamePhase::Waiting => {
            let gesture_done = detector.observe(snapshot, settings.field_height, now_ms);
            if input.start || gesture_done {
                detector.clear();
                start_game(session, settings, now_ms);
            }
        }

        GamePhase::Playing => {
            // Wrist probes first, then any pointer probe from the host
            for side in [WristSide::Left, WristSide::Right] {
                let point = snapshot.point(side);
                if point.active {
                    check_collision(session, point.pos.x, point.pos.y);
                }
            }
            if let Some(probe) = input.probe {
                check_collision(session, probe.x, probe.y);
            }

            update_balls(session, settings);
            update_particles(session);
            update_score_texts(session);
            spawn_balls(session, settings, now_ms);
            evaluate_transitions(session, settings, now_ms);
        }

        GamePhase::GameOver => {
            // Leftover pop feedback keeps fading out
            update_particles(session);
            update_score_texts(session);
            if let Some(deadline) = session.auto_reset_at {
                if now_ms >= deadline {
                    reset_game(session);
                }
            }
        }
    }
}

/// `waiting -> playing`. No-op outside the waiting phase.
pub fn start_game(session: &mut GameSession, settings: &Settings, now_ms: f64) {
    if session.phase != GamePhase::Waiting {
        return;
    }
    session.phase = GamePhase::Playing;
    session.score = 0;
    seed_balls(session, settings, now_ms);
    session.emit(GameEvent::StateChange(GamePhase::Playing));
    log::info!("game started (level {})", session.level);
}

/// Return to `waiting` from any state, cancelling a pending auto-reset.
/// Idempotent: resetting an already-waiting session changes nothing and
/// emits nothing.
pub fn reset_game(session: &mut GameSession) {
    session.auto_reset_at = None;
    let was = session.phase;
    session.phase = GamePhase::Waiting;
    session.score = 0;
    session.level = 1;
    session.params = super::state::LevelParams::first();
    session.balls.clear();
    session.particles.clear();
    session.score_texts.clear();
    session.spawned = 0;
    session.missed = 0;
    session.last_spawn_ms = 0.0;
    if was != GamePhase::Waiting {
        session.emit(GameEvent::StateChange(GamePhase::Waiting));
        log::info!("session reset to waiting");
    }
}

/// `playing -> playing` with side effects: bump difficulty, reseed balls.
fn level_up(session: &mut GameSession, settings: &Settings, now_ms: f64) {
    session.level += 1;
    session.params.advance();
    seed_balls(session, settings, now_ms);
    session.emit(GameEvent::LevelChange(session.level));
    log::info!(
        "level {} ({} balls, speed {:.1})",
        session.level,
        session.params.ball_count,
        session.params.speed
    );
}

/// `playing -> gameOver`, arming the deferred return to waiting.
fn game_over(session: &mut GameSession, now_ms: f64) {
    session.phase = GamePhase::GameOver;
    session.auto_reset_at = Some(now_ms + GAME_OVER_RESET_MS);
    session.emit(GameEvent::StateChange(GamePhase::GameOver));
    session.emit(GameEvent::GameOver {
        score: session.score,
    });
    log::info!("game over at score {}", session.score);
}

/// Clear the field and spawn the opening population for the current level.
fn seed_balls(session: &mut GameSession, settings: &Settings, now_ms: f64) {
    session.balls.clear();
    session.spawned = 0;
    session.missed = 0;
    session.last_spawn_ms = now_ms;
    let seed_count = (session.params.ball_count as usize).min(MIN_BALLS);
    for _ in 0..seed_count {
        spawn_ball(session, settings, now_ms, false);
    }
}

fn can_spawn(session: &GameSession) -> bool {
    session.spawned < session.params.ball_count && session.balls.len() < MAX_BALLS
}

/// Top-up policy: interval- or population-driven top-edge spawns, plus a
/// forced mid-field spawn when the field is about to look empty. All spawns
/// stop once the level's budget is spent.
fn spawn_balls(session: &mut GameSession, settings: &Settings, now_ms: f64) {
    if session.balls.len() < FORCE_SPAWN_BELOW && can_spawn(session) {
        spawn_ball(session, settings, now_ms, true);
    }
    let due = now_ms - session.last_spawn_ms > SPAWN_INTERVAL_MS
        || session.balls.len() < MIN_BALLS;
    if due && can_spawn(session) {
        spawn_ball(session, settings, now_ms, false);
    }
}

fn spawn_ball(session: &mut GameSession, settings: &Settings, now_ms: f64, mid_field: bool) {
    let params = session.params;
    let size = (params.ball_size * session.rng.random_range(0.9..1.1)).max(LEVEL_SIZE_FLOOR);
    let speed = params.speed * session.rng.random_range(0.8..1.2);
    let x = session
        .rng
        .random_range(size * 0.5..settings.field_width - size * 0.5);
    let y = if mid_field {
        // Straight into the upper half so the field never looks empty
        session.rng.random_range(0.0..settings.field_height * 0.5)
    } else {
        // Above the top edge, staggered so arrivals trickle in
        -size - session.rng.random_range(0.0..settings.field_height * 0.5)
    };
    session.balls.push(Ball {
        pos: Vec2::new(x, y),
        size,
        speed,
        touched: false,
    });
    session.spawned += 1;
    session.last_spawn_ms = now_ms;
}

fn update_balls(session: &mut GameSession, settings: &Settings) {
    // Horizontal jitter runs on a throttled cadence, not every tick
    let drift_tick = session.time_ticks % 3 == 0;
    for ball in &mut session.balls {
        ball.pos.y += ball.speed;
        if drift_tick {
            ball.pos.x += session.rng.random_range(-1.5..1.5f32);
        }
    }

    let field_height = settings.field_height;
    let mut missed = 0u32;
    session.balls.retain(|ball| {
        if ball.off_screen(field_height) {
            if !ball.touched {
                missed += 1;
            }
            false
        } else {
            true
        }
    });
    session.missed += missed;
}

fn update_particles(session: &mut GameSession) {
    for particle in &mut session.particles {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= PARTICLE_LIFE_DECAY;
    }
    session.particles.retain(|p| p.life > 0.0);
}

fn update_score_texts(session: &mut GameSession) {
    for text in &mut session.score_texts {
        text.pos.y -= SCORE_TEXT_RISE;
        text.age += 1;
    }
    session.score_texts.retain(|t| t.age < t.max_age);
}

/// Level-complete and game-over checks, run after the spawn pass so a freshly
/// replenished field never reads as drained.
fn evaluate_transitions(session: &mut GameSession, settings: &Settings, now_ms: f64) {
    let all_touched = !session.balls.is_empty() && session.balls.iter().all(|b| b.touched);
    let drained =
        session.balls.is_empty() && session.spawned >= session.params.ball_count;

    if all_touched || (drained && session.missed == 0) {
        level_up(session, settings, now_ms);
    } else if drained {
        game_over(session, now_ms);
    }
}
