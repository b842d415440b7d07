//! Game session simulation
//!
//! The state machine and entity management. Pure game logic: no rendering,
//! no sockets, no clocks - the host supplies time and input every frame.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::check_collision;
pub use state::{Ball, GameEvent, GamePhase, GameSession, LevelParams, Particle, ScoreText};
pub use tick::{TickInput, reset_game, start_game, tick};
