//! Ball and paddle simulation.
//!
//! One call to [`PongEngine::update`] is one tick: explicit Euler with a unit
//! step per frame. All easing and speed-up constants are per tick, so the
//! game speeds up with the frame rate.

use super::state::{GameParams, GameState, Phase, Side};
use crate::{
    constants::{
        DEFAULT_AI_CORRECTION_RATE, DEFAULT_CONTROL_GAIN, DEFAULT_CONTROL_SENSITIVITY,
        HIT_OFFSET_DEFLECTION, MAX_SPEED_FACTOR, PADDLE_HIT_SPEEDUP, SERVE_ANGLE_SPREAD,
        WALL_BOUNCE_AMPLIFICATION,
    },
    control::PaddleController,
    Error, Result,
};
use log::{debug, info};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Who drives the left paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// AI on the left, head control on the right
    SinglePlayer,
    /// Head control on both sides
    TwoPlayer,
}

impl GameMode {
    /// Default field tuning of this mode
    pub const fn params(self) -> GameParams {
        match self {
            Self::SinglePlayer => GameParams::single_player(),
            Self::TwoPlayer => GameParams::two_player(),
        }
    }
}

/// Per-tick gains for head control and the AI opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTuning {
    /// Head control sensitivity
    pub sensitivity: f64,
    /// Fixed per-tick fraction of the head control step
    pub gain: f64,
    /// Per-tick fraction the AI paddle closes on its prediction
    pub ai_correction_rate: f64,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_CONTROL_SENSITIVITY,
            gain: DEFAULT_CONTROL_GAIN,
            ai_correction_rate: DEFAULT_AI_CORRECTION_RATE,
        }
    }
}

/// Raw normalized control samples for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddleInput {
    /// Left player's nose y in [0, 1]; ignored in single-player
    pub left: Option<f64>,
    /// Right player's nose y in [0, 1]
    pub right: Option<f64>,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Ball reflected off the top or bottom wall
    pub wall_bounce: bool,
    /// Paddle that returned the ball
    pub paddle_hit: Option<Side>,
    /// Side that won a point
    pub scored: Option<Side>,
}

/// Deterministic (given a seed) Pong simulation
pub struct PongEngine {
    mode: GameMode,
    params: GameParams,
    tuning: ControlTuning,
    state: GameState,
    left_control: PaddleController,
    right_control: PaddleController,
    rng: StdRng,
}

impl PongEngine {
    /// Create an engine with the mode's default field and default tuning
    #[must_use]
    pub fn new(mode: GameMode, seed: Option<u64>) -> Self {
        Self::with_params(mode, mode.params(), ControlTuning::default(), seed)
    }

    /// Create an engine with explicit field and tuning
    #[must_use]
    pub fn with_params(mode: GameMode, params: GameParams, tuning: ControlTuning, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let controller = || PaddleController::with_tuning(params.height, tuning.sensitivity, tuning.gain);
        Self {
            mode,
            params,
            tuning,
            state: GameState::new(&params),
            left_control: controller(),
            right_control: controller(),
            rng,
        }
    }

    /// Current state
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state, for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Field tuning
    pub const fn params(&self) -> &GameParams {
        &self.params
    }

    /// Game mode
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current phase
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Leave the start screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the players are not ready or the game already started
    pub fn start(&mut self, players_ready: bool) -> Result<()> {
        if self.state.phase != Phase::StartScreen {
            return Err(Error::GameTransition(format!(
                "Cannot start from {:?}",
                self.state.phase
            )));
        }
        if !players_ready {
            return Err(Error::GameTransition("Players are not ready".to_string()));
        }
        info!("Game started ({:?})", self.mode);
        self.state.phase = Phase::Playing;
        Ok(())
    }

    /// Switch between playing and paused, returning the new phase
    ///
    /// # Errors
    ///
    /// Returns an error on the start screen
    pub fn toggle_pause(&mut self) -> Result<Phase> {
        self.state.phase = match self.state.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::StartScreen => {
                return Err(Error::GameTransition("Cannot pause before the game starts".to_string()));
            }
        };
        info!("Game {:?}", self.state.phase);
        Ok(self.state.phase)
    }

    /// Advance one tick. A no-op outside [`Phase::Playing`].
    pub fn update(&mut self, input: PaddleInput) -> TickEvents {
        let mut events = TickEvents::default();
        if self.state.phase != Phase::Playing {
            return events;
        }

        match self.mode {
            GameMode::SinglePlayer => self.move_ai_paddle(),
            GameMode::TwoPlayer => {
                self.state.left_paddle_y = self.left_control.update(self.state.left_paddle_y, input.left);
            }
        }
        self.state.right_paddle_y = self.right_control.update(self.state.right_paddle_y, input.right);

        self.state.ball_position += self.state.ball_velocity;

        events.wall_bounce = self.bounce_off_walls();
        events.paddle_hit = self.collide_with_paddles();
        self.cap_speed();
        events.scored = self.check_score();

        events
    }

    /// Extrapolate the ball's y linearly, ignoring wall bounces, and ease the
    /// left paddle toward it
    fn move_ai_paddle(&mut self) {
        let ball = self.state.ball_position;
        let velocity = self.state.ball_velocity;
        let predicted_y = ball.y + velocity.y * (ball.x / self.params.ball_speed);
        self.state.left_paddle_y += (predicted_y - self.state.left_paddle_y) * self.tuning.ai_correction_rate;
    }

    fn bounce_off_walls(&mut self) -> bool {
        let y = self.state.ball_position.y;
        let vy = self.state.ball_velocity.y;
        let at_top = y <= self.params.ball_size && vy < 0.0;
        let at_bottom = y >= self.params.height - self.params.ball_size && vy > 0.0;
        if at_top || at_bottom {
            self.state.ball_velocity.y = -vy * WALL_BOUNCE_AMPLIFICATION;
            true
        } else {
            false
        }
    }

    fn collide_with_paddles(&mut self) -> Option<Side> {
        let ball = self.state.ball_position;
        let reach_left = ball.x - self.params.ball_size <= self.params.paddle_width;
        let reach_right = ball.x + self.params.ball_size >= self.params.width - self.params.paddle_width;

        let mut hit = None;
        if reach_left {
            if let Some(offset) = self.hit_offset(self.state.left_paddle_y) {
                self.deflect(Side::Right, offset);
                hit = Some(Side::Left);
            }
        }
        if reach_right {
            if let Some(offset) = self.hit_offset(self.state.right_paddle_y) {
                self.deflect(Side::Left, offset);
                hit = Some(Side::Right);
            }
        }
        if let Some(side) = hit {
            debug!("{side:?} paddle hit, velocity {:?}", self.state.ball_velocity);
        }
        hit
    }

    /// Ball position along the paddle span in [-1, 1], `None` outside it
    fn hit_offset(&self, paddle_y: f64) -> Option<f64> {
        let half = self.params.paddle_half_height();
        let delta = self.state.ball_position.y - paddle_y;
        (delta.abs() <= half).then(|| delta / half)
    }

    fn deflect(&mut self, toward: Side, offset: f64) {
        let velocity = &mut self.state.ball_velocity;
        velocity.x = toward.direction() * velocity.x.abs() * PADDLE_HIT_SPEEDUP;
        velocity.y += offset * HIT_OFFSET_DEFLECTION;
    }

    fn cap_speed(&mut self) {
        let cap = self.params.ball_speed * MAX_SPEED_FACTOR;
        let speed = self.state.ball_velocity.norm();
        if speed > cap {
            self.state.ball_velocity *= cap / speed;
        }
    }

    fn check_score(&mut self) -> Option<Side> {
        let x = self.state.ball_position.x;
        let (scorer, conceded) = if x <= 0.0 {
            (Side::Right, Side::Left)
        } else if x >= self.params.width {
            (Side::Left, Side::Right)
        } else {
            return None;
        };

        match scorer {
            Side::Left => self.state.left_score += 1,
            Side::Right => self.state.right_score += 1,
        }
        info!(
            "{scorer:?} scores: {} - {}",
            self.state.left_score, self.state.right_score
        );
        self.serve(Some(conceded));
        Some(scorer)
    }

    /// Recenter the ball and launch it at a random angle toward `toward`, or
    /// toward a random side
    pub fn serve(&mut self, toward: Option<Side>) {
        let side = toward.unwrap_or_else(|| if self.rng.gen_bool(0.5) { Side::Right } else { Side::Left });
        let angle: f64 = self.rng.gen_range(-SERVE_ANGLE_SPREAD..=SERVE_ANGLE_SPREAD);
        let speed = self.params.ball_speed;
        self.state.ball_position = self.params.center();
        self.state.ball_velocity = Vector2::new(speed * side.direction() * angle.cos(), speed * angle.sin());
    }
}
