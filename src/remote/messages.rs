//! Wire protocol with the external motion-sensing application
//!
//! Inbound control/sensor messages and outbound telemetry, both as closed
//! tagged unions over JSON. Anything the peer sends that does not parse is
//! logged and dropped at the transport edge; it never reaches the tick loop.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameSession};
use crate::tracking::{TrackedPoint, TrackingSnapshot, WristSide};

/// Messages the sensor app sends us
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Liveness check; answered with [`OutboundMessage::Pong`]
    Ping,
    /// One wrist sample from the external sensor
    SetWrist {
        wrist: WristSide,
        x: f32,
        y: f32,
        active: bool,
    },
    /// Partial settings update; absent fields keep their value
    #[serde(rename_all = "camelCase")]
    Config {
        #[serde(default)]
        use_external_sensors: Option<bool>,
        #[serde(default)]
        debug_mode: Option<bool>,
    },
    StartGame,
    ResetGame,
}

/// Messages we publish to the external consumer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Pong,
    Connection {
        status: String,
    },
    #[serde(rename_all = "camelCase")]
    GameStateChange {
        game_state: String,
    },
    LevelChange {
        level: u32,
    },
    GameOver {
        score: u32,
    },
    BallHit {
        score: u32,
    },
    /// Throttled reduced snapshot of game and tracking state
    #[serde(rename_all = "camelCase")]
    Update {
        wrists: WristsView,
        score: u32,
        level: u32,
        game_state: String,
        balls: Vec<BallView>,
    },
}

/// One wrist as published over the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WristView {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl From<&TrackedPoint> for WristView {
    fn from(point: &TrackedPoint) -> Self {
        Self {
            x: point.pos.x,
            y: point.pos.y,
            active: point.active,
        }
    }
}

/// Both wrists as published over the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WristsView {
    pub left: WristView,
    pub right: WristView,
}

/// A ball as published over the wire; coordinates rounded to integers to
/// keep the payload small
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub x: i32,
    pub y: i32,
    pub touched: bool,
}

impl OutboundMessage {
    /// Build the reduced snapshot frame from live state.
    pub fn update(session: &GameSession, snapshot: &TrackingSnapshot) -> Self {
        OutboundMessage::Update {
            wrists: WristsView {
                left: WristView::from(&snapshot.left),
                right: WristView::from(&snapshot.right),
            },
            score: session.score,
            level: session.level,
            game_state: session.phase.as_str().to_owned(),
            balls: session
                .balls
                .iter()
                .map(|ball| BallView {
                    x: ball.pos.x.round() as i32,
                    y: ball.pos.y.round() as i32,
                    touched: ball.touched,
                })
                .collect(),
        }
    }

    pub fn state_change(phase: GamePhase) -> Self {
        OutboundMessage::GameStateChange {
            game_state: phase.as_str().to_owned(),
        }
    }
}
