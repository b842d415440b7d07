//! Collision probes against the ball population
//!
//! A probe is a single point - a smoothed wrist position or a pointer press.
//! Every untouched ball within the padded radius pops; the padding is
//! generous so noisy tracking still feels responsive.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GamePhase, GameSession, Particle, ScoreText};
use crate::consts::*;

/// Check a probe point against every untouched ball.
///
/// Invalid (NaN/infinite) coordinates are rejected outright. A single probe
/// may pop several overlapping balls in one call; there is no early exit.
/// Returns the number of balls popped.
pub fn check_collision(session: &mut GameSession, x: f32, y: f32) -> usize {
    if !x.is_finite() || !y.is_finite() {
        return 0;
    }
    let probe = Vec2::new(x, y);

    let mut popped = Vec::new();
    for ball in &mut session.balls {
        if ball.touched {
            continue;
        }
        let reach = ball.size / 2.0 + HIT_PADDING;
        if probe.distance_squared(ball.pos) <= reach * reach {
            ball.pop();
            popped.push(ball.pos);
        }
    }

    for pos in &popped {
        if session.phase == GamePhase::Playing {
            session.score += 1;
            session.emit(GameEvent::BallHit {
                score: session.score,
            });
        }
        spawn_burst(session, *pos);
        session.score_texts.push(ScoreText {
            pos: *pos,
            age: 0,
            max_age: SCORE_TEXT_MAX_AGE,
        });
    }
    popped.len()
}

/// Scatter a bounded handful of particles from a pop, evicting the oldest
/// once the population cap is reached.
fn spawn_burst(session: &mut GameSession, center: Vec2) {
    for _ in 0..PARTICLES_PER_POP {
        if session.particles.len() >= MAX_PARTICLES {
            session.particles.remove(0);
        }
        let angle = session.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = session.rng.random_range(1.0..4.0f32);
        session.particles.push(Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            size: session.rng.random_range(2.0..6.0f32),
            life: 1.0,
        });
    }
}
