//! Head-controlled Pong.
//!
//! [`PongEngine`] owns one [`GameState`] and advances it once per tick;
//! [`players`] decides who is ready and which face drives which paddle.

pub mod physics;
pub mod players;
pub mod state;

pub use physics::{ControlTuning, GameMode, PaddleInput, PongEngine, TickEvents};
pub use players::{paddle_input, readiness, Readiness};
pub use state::{GameParams, GameState, Phase, Side};
