//! Game state owned by one [`PongEngine`](super::PongEngine) session.

use crate::constants::{BALL_SIZE, PADDLE_HEIGHT, PADDLE_WIDTH};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Which side of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left paddle / left goal
    Left,
    /// Right paddle / right goal
    Right,
}

impl Side {
    /// Horizontal direction pointing toward this side
    pub const fn direction(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for players to be ready and an explicit start
    #[default]
    StartScreen,
    /// Simulation advancing every tick
    Playing,
    /// Simulation frozen
    Paused,
}

/// Field and ball tuning of one game variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    /// Field width in pixels
    pub width: f64,
    /// Field height in pixels
    pub height: f64,
    /// Paddle thickness in pixels
    pub paddle_width: f64,
    /// Paddle height in pixels
    pub paddle_height: f64,
    /// Ball collision size in pixels
    pub ball_size: f64,
    /// Base ball speed in pixels per tick
    pub ball_speed: f64,
}

impl GameParams {
    /// Tuning of the single-player (versus AI) variant
    #[must_use]
    pub const fn single_player() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            ball_size: BALL_SIZE,
            ball_speed: 6.0,
        }
    }

    /// Tuning of the two-player variant
    #[must_use]
    pub const fn two_player() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            ball_size: BALL_SIZE,
            ball_speed: 7.0,
        }
    }

    /// Half the paddle span
    pub fn paddle_half_height(&self) -> f64 {
        self.paddle_height / 2.0
    }

    /// Field center
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Mutable state of one game session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Ball center in pixels
    pub ball_position: Point2<f64>,
    /// Ball velocity in pixels per tick
    pub ball_velocity: Vector2<f64>,
    /// Left paddle center y
    pub left_paddle_y: f64,
    /// Right paddle center y
    pub right_paddle_y: f64,
    /// Points won by the left side
    pub left_score: u32,
    /// Points won by the right side
    pub right_score: u32,
    /// Current phase
    pub phase: Phase,
}

impl GameState {
    /// Centered ball moving diagonally down-right, paddles centered, no score
    #[must_use]
    pub fn new(params: &GameParams) -> Self {
        Self {
            ball_position: params.center(),
            ball_velocity: Vector2::new(params.ball_speed, params.ball_speed),
            left_paddle_y: params.height / 2.0,
            right_paddle_y: params.height / 2.0,
            left_score: 0,
            right_score: 0,
            phase: Phase::StartScreen,
        }
    }

    /// Score of one side
    pub const fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    /// Center y of one paddle
    pub const fn paddle_y(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_paddle_y,
            Side::Right => self.right_paddle_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let params = GameParams::two_player();
        let state = GameState::new(&params);
        assert_eq!(state.ball_position, Point2::new(500.0, 300.0));
        assert_eq!(state.ball_velocity, Vector2::new(7.0, 7.0));
        assert_eq!(state.paddle_y(Side::Left), 300.0);
        assert_eq!(state.score(Side::Right), 0);
        assert_eq!(state.phase, Phase::StartScreen);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Left.direction(), -1.0);
        assert_eq!(Side::Right.direction(), 1.0);
        assert_eq!(GameParams::single_player().paddle_half_height(), 45.0);
    }
}
