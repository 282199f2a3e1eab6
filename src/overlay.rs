//! Draw-command emission.
//!
//! Nothing here touches pixels. Each frame the HUD and the game screens are
//! turned into a list of [`DrawCommand`]s that an [`OverlaySink`] renders or
//! records. Coordinates are integer pixels, colors are RGB.

use crate::{
    config::{Config, Rgb},
    game::{GameMode, GameParams, GameState, Phase, Readiness},
    tracker::SmoothedTarget,
    utils::{
        pixel_point,
        safe_cast::{to_pixel, u32_to_i32},
    },
    Result,
};
use log::debug;

/// Approximate glyph advance of the HUD font at scale 1.0
const GLYPH_WIDTH: f64 = 20.0;
/// Approximate cap height of the HUD font at scale 1.0
const GLYPH_HEIGHT: f64 = 22.0;
/// Padding around text backgrounds
const TEXT_PADDING: i32 = 5;

const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];
const READY: Rgb = [0, 255, 0];
const WAITING: Rgb = [255, 165, 0];

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Circle outline, or a filled disc when `filled`
    Circle {
        /// Center
        center: (i32, i32),
        /// Radius
        radius: i32,
        /// Color
        color: Rgb,
        /// Stroke thickness, ignored when filled
        thickness: i32,
        /// Fill the disc
        filled: bool,
    },
    /// Line segment
    Line {
        /// Start point
        from: (i32, i32),
        /// End point
        to: (i32, i32),
        /// Color
        color: Rgb,
        /// Stroke thickness
        thickness: i32,
    },
    /// Axis-aligned filled rectangle
    FilledRect {
        /// Top-left corner
        top_left: (i32, i32),
        /// Bottom-right corner
        bottom_right: (i32, i32),
        /// Color
        color: Rgb,
    },
    /// Text anchored at its baseline origin
    Text {
        /// Content
        text: String,
        /// Bottom-left of the first glyph
        origin: (i32, i32),
        /// Font scale
        scale: f64,
        /// Color
        color: Rgb,
        /// Stroke thickness
        thickness: i32,
    },
}

/// Appearance settings for every overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// HUD font scale
    pub font_scale: f64,
    /// Base stroke thickness
    pub line_thickness: i32,
    /// Draw the FPS counter
    pub show_fps: bool,
    /// Crosshair arm length
    pub crosshair_size: i32,
    /// Number of crosshair glow strokes
    pub glow_intensity: u32,
    /// Head circle color
    pub circle: Rgb,
    /// Crosshair color
    pub crosshair: Rgb,
    /// Distance label color
    pub distance_text: Rgb,
    /// HUD text color
    pub text: Rgb,
    /// Paddle color
    pub paddle: Rgb,
    /// Ball color
    pub ball: Rgb,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl OverlayStyle {
    /// Style from the display, crosshair and color sections
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            font_scale: config.display.font_scale,
            line_thickness: config.display.line_thickness,
            show_fps: config.display.show_fps,
            crosshair_size: config.crosshair.size,
            glow_intensity: config.crosshair.glow_intensity,
            circle: config.colors.circle,
            crosshair: config.colors.crosshair,
            distance_text: config.colors.distance_text,
            text: config.colors.text,
            paddle: config.colors.paddle,
            ball: config.colors.ball,
        }
    }
}

/// Consumer of one frame's draw commands
pub trait OverlaySink {
    /// Render or record one frame
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the frame
    fn present(&mut self, commands: &[DrawCommand]) -> Result<()>;
}

/// Sink that only logs what would be drawn
#[derive(Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl LogSink {
    /// Frames presented so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl OverlaySink for LogSink {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<()> {
        self.frames += 1;
        debug!("Overlay frame {}: {} command(s)", self.frames, commands.len());
        for command in commands {
            if let DrawCommand::Text { text, .. } = command {
                debug!("  text: {text}");
            }
        }
        Ok(())
    }
}

/// Sink that keeps every frame in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Presented frames in order
    pub frames: Vec<Vec<DrawCommand>>,
}

impl OverlaySink for RecordingSink {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<()> {
        self.frames.push(commands.to_vec());
        Ok(())
    }
}

fn text(content: impl Into<String>, origin: (i32, i32), scale: f64, color: Rgb, thickness: i32) -> DrawCommand {
    DrawCommand::Text {
        text: content.into(),
        origin,
        scale,
        color,
        thickness,
    }
}

/// Estimated pixel extent of `content` at `scale`
#[must_use]
#[allow(clippy::cast_precision_loss)] // HUD strings are short
pub fn text_extent(content: &str, scale: f64) -> (i32, i32) {
    let chars = content.chars().count() as f64;
    (to_pixel(chars * GLYPH_WIDTH * scale), to_pixel(GLYPH_HEIGHT * scale))
}

/// Text on a padded black background
pub fn text_with_background(content: &str, origin: (i32, i32), style: &OverlayStyle) -> [DrawCommand; 2] {
    let (w, h) = text_extent(content, style.font_scale);
    [
        DrawCommand::FilledRect {
            top_left: (origin.0 - TEXT_PADDING, origin.1 - h - TEXT_PADDING),
            bottom_right: (origin.0 + w + TEXT_PADDING, origin.1 + TEXT_PADDING),
            color: BLACK,
        },
        text(content, origin, style.font_scale, style.text, style.line_thickness),
    ]
}

/// Head circle, glowing crosshair and distance label for every target
pub fn render_targets(targets: &[SmoothedTarget], style: &OverlayStyle) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for target in targets {
        let center = pixel_point(&target.center);
        let radius = to_pixel(target.radius);
        commands.push(DrawCommand::Circle {
            center,
            radius,
            color: style.circle,
            thickness: style.line_thickness,
            filled: false,
        });

        let (tx, ty) = (to_pixel(target.target_point.x), to_pixel(target.target_point.y));
        let arm = style.crosshair_size;
        for glow in 0..style.glow_intensity {
            let thickness = style
                .line_thickness
                .saturating_add(i32::try_from(glow).unwrap_or(i32::MAX));
            commands.push(DrawCommand::Line {
                from: (tx.saturating_sub(arm), ty),
                to: (tx.saturating_add(arm), ty),
                color: style.crosshair,
                thickness,
            });
            commands.push(DrawCommand::Line {
                from: (tx, ty.saturating_sub(arm)),
                to: (tx, ty.saturating_add(arm)),
                color: style.crosshair,
                thickness,
            });
        }

        if let Some(distance) = target.distance {
            commands.push(text(
                format!("{distance:.1}cm"),
                (center.0 - 30, center.1 - radius - 10),
                0.5,
                style.distance_text,
                2,
            ));
        }
    }
    commands
}

/// FPS counter, target count and quit hint
pub fn render_hud(fps: f64, targets: usize, frame_height: u32, style: &OverlayStyle) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    if style.show_fps {
        commands.extend(text_with_background(&format!("FPS: {fps:.0}"), (10, 30), style));
    }
    commands.extend(text_with_background(&format!("Targets: {targets}"), (10, 70), style));
    let bottom = u32_to_i32(frame_height).unwrap_or(i32::MAX) - 10;
    commands.extend(text_with_background("Press 'q' to quit", (10, bottom), style));
    commands
}

fn paddle(x: f64, center_y: f64, params: &GameParams, color: Rgb) -> DrawCommand {
    let half = params.paddle_half_height();
    DrawCommand::FilledRect {
        top_left: (to_pixel(x), to_pixel(center_y - half)),
        bottom_right: (to_pixel(x + params.paddle_width), to_pixel(center_y + half)),
        color,
    }
}

/// Paddles, ball with a short trail, and both scores
pub fn render_game(state: &GameState, params: &GameParams, style: &OverlayStyle) -> Vec<DrawCommand> {
    let mut commands = vec![
        paddle(0.0, state.left_paddle_y, params, style.paddle),
        paddle(params.width - params.paddle_width, state.right_paddle_y, params, style.paddle),
    ];

    // Trail: current position first, then one and two ticks back, shrinking.
    let ball_radius = to_pixel(params.ball_size);
    for step in 0..3 {
        let back = f64::from(step);
        let position = state.ball_position - state.ball_velocity * back;
        commands.push(DrawCommand::Circle {
            center: pixel_point(&position),
            radius: (ball_radius - step * 2).max(1),
            color: style.ball,
            thickness: 0,
            filled: true,
        });
    }

    let right_x = to_pixel(params.width) - 80;
    for (score, x) in [(state.left_score, 50), (state.right_score, right_x)] {
        let label = score.to_string();
        commands.push(text(label.clone(), (x, 50), 2.0, BLACK, 4));
        commands.push(text(label, (x, 50), 2.0, WHITE, 2));
    }

    if state.phase == Phase::Paused {
        let origin = (to_pixel(params.width / 2.0) - 70, to_pixel(params.height / 2.0));
        commands.extend(text_with_background("PAUSED", origin, style));
    }
    commands
}

/// Title, per-player readiness and the start prompt
pub fn render_start_screen(mode: GameMode, readiness: Readiness, params: &GameParams) -> Vec<DrawCommand> {
    let (cx, cy) = (to_pixel(params.width / 2.0), to_pixel(params.height / 2.0));
    let (title, title_offset) = match mode {
        GameMode::SinglePlayer => ("Single Player Pong", 180),
        GameMode::TwoPlayer => ("Two Player Pong", 150),
    };
    let title_origin = (cx - title_offset, cy - 50);

    let mut commands = Vec::new();
    for glow in 0..3u8 {
        let offset = i32::from(glow);
        commands.push(text(
            title,
            (title_origin.0 - offset, title_origin.1),
            1.5,
            [0, 255 - glow * 30, 0],
            5 - offset,
        ));
    }
    commands.push(text(title, title_origin, 1.5, WHITE, 2));

    let status = |ready: bool, waiting: &str| -> (String, Rgb) {
        if ready {
            ("Ready!".to_string(), READY)
        } else {
            (waiting.to_string(), WAITING)
        }
    };
    let lines = match mode {
        GameMode::SinglePlayer => {
            let (label, color) = status(readiness.right, "Stand in front of camera");
            vec![(format!("Player: {label}"), (cx - 200, cy + 50), color)]
        }
        GameMode::TwoPlayer => {
            let (left, left_color) = status(readiness.left, "Stand on left");
            let (right, right_color) = status(readiness.right, "Stand on right");
            vec![
                (format!("Player 1: {left}"), (50, cy + 50), left_color),
                (format!("Player 2: {right}"), (to_pixel(params.width) - 350, cy + 50), right_color),
            ]
        }
    };
    for (label, origin, color) in lines {
        commands.push(text(label.clone(), origin, 1.0, BLACK, 3));
        commands.push(text(label, origin, 1.0, color, 2));
    }

    if readiness.all() {
        let top = cy + 100;
        commands.push(DrawCommand::FilledRect {
            top_left: (cx - 100, top),
            bottom_right: (cx + 100, top + 60),
            color: [0, 200, 0],
        });
        commands.push(text("SPACE to Start", (cx - 90, top + 40), 1.0, WHITE, 2));
    }
    commands
}
